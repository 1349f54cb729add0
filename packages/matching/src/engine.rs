//! Donor eligibility and matching.
//!
//! The engine is a pure computation over a snapshot of donor data. Callers
//! check the request with [`MatchingEngine::scope`] before touching any store,
//! fetch the hospital roster and the self-registered profiles, resolve the
//! donation history of the profiles that [`MatchingEngine::profiles_to_resolve`]
//! selects, and hand everything to [`MatchingEngine::evaluate`].

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::blood_group::normalize_blood_group;
use crate::candidate::CandidateDonor;
use crate::dedup::{CandidateSet, merge_candidates};
use crate::donor::{BloodRequest, DonationHistory, DonorProfile, DonorRecord};
use crate::eligibility::{EligibilityPolicy, days_since, is_eligible};
use crate::rank::{RankedCandidate, rank};
use crate::urgency::UrgencyLevel;

/// Upper bound on suggestions returned to callers.
pub const MAX_SUGGESTIONS: usize = 10;

/// A request the engine refuses to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Blood request is missing hospital information")]
    MissingHospital,
    #[error("Blood request is missing a blood group")]
    MissingBloodGroup,
}

/// A request that passed precondition checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    pub hospital_id: Uuid,
    /// Normalized blood group.
    pub blood_group: String,
    pub urgency: UrgencyLevel,
}

impl RequestScope {
    pub fn matches(&self, blood_group: &str) -> bool {
        normalize_blood_group(blood_group) == self.blood_group
    }
}

/// Outcome of one evaluation, partitioned and ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub threshold_days: i64,
    pub eligible: Vec<RankedCandidate>,
    pub ineligible: Vec<RankedCandidate>,
}

/// Ranked suggestions plus partition sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSet {
    pub suggestions: Vec<RankedCandidate>,
    pub total_donors: usize,
    pub eligible_donors: usize,
    pub ineligible_donors: usize,
    pub threshold_days: i64,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.eligible.len() + self.ineligible.len()
    }

    /// Everyone who should be alerted, best match first.
    pub fn alert_candidates(&self) -> &[RankedCandidate] {
        &self.eligible
    }

    /// Eligible then ineligible, truncated to `limit`.
    pub fn into_suggestions(self, limit: usize) -> SuggestionSet {
        let total_donors = self.total();
        let eligible_donors = self.eligible.len();
        let ineligible_donors = self.ineligible.len();
        let suggestions = self
            .eligible
            .into_iter()
            .chain(self.ineligible)
            .take(limit)
            .collect();

        SuggestionSet {
            suggestions,
            total_donors,
            eligible_donors,
            ineligible_donors,
            threshold_days: self.threshold_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingEngine {
    policy: EligibilityPolicy,
}

impl MatchingEngine {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EligibilityPolicy {
        self.policy
    }

    /// Check that the request can be matched at all.
    pub fn scope(&self, request: &BloodRequest) -> Result<RequestScope, Precondition> {
        let hospital_id = request.hospital_id.ok_or(Precondition::MissingHospital)?;
        let blood_group = normalize_blood_group(&request.blood_group);
        if blood_group.is_empty() {
            return Err(Precondition::MissingBloodGroup);
        }
        Ok(RequestScope {
            hospital_id,
            blood_group,
            urgency: request.urgency_level,
        })
    }

    /// Profiles whose blood group matches and whose identity no matching hospital
    /// record already claims. Only these need a history lookup; the rest would be
    /// dropped as duplicates by [`MatchingEngine::evaluate`].
    pub fn profiles_to_resolve<'a>(
        &self,
        scope: &RequestScope,
        hospital_donors: &[DonorRecord],
        profiles: &'a [DonorProfile],
    ) -> Vec<&'a DonorProfile> {
        let mut roster = CandidateSet::new();
        for record in hospital_donors
            .iter()
            .filter(|record| scope.matches(&record.blood_group))
        {
            roster.insert(CandidateDonor::from_record(record.clone()));
        }

        profiles
            .iter()
            .filter(|profile| scope.matches(&profile.blood_group))
            .filter(|profile| !roster.is_claimed(&profile.identity_keys()))
            .collect()
    }

    pub fn threshold_days(&self, scope: &RequestScope) -> i64 {
        self.policy.threshold_days(scope.urgency)
    }

    /// Filter, unify, deduplicate, partition and rank.
    ///
    /// Inputs that do not match the scope's blood group are ignored, so the
    /// caller may pass unfiltered lists.
    pub fn evaluate(
        &self,
        scope: &RequestScope,
        hospital_donors: Vec<DonorRecord>,
        profiles: Vec<(DonorProfile, DonationHistory)>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let threshold_days = self.threshold_days(scope);

        let hospital_managed = hospital_donors
            .into_iter()
            .filter(|record| scope.matches(&record.blood_group))
            .map(CandidateDonor::from_record);
        let self_registered = profiles
            .into_iter()
            .filter(|(profile, _)| scope.matches(&profile.blood_group))
            .map(|(profile, history)| CandidateDonor::from_profile(profile, history));

        let (mut eligible, mut ineligible): (Vec<_>, Vec<_>) =
            merge_candidates(hospital_managed, self_registered)
                .into_iter()
                .map(|candidate| {
                    let days = days_since(candidate.last_donation_date, now);
                    RankedCandidate::new(candidate, days, is_eligible(days, threshold_days))
                })
                .partition(|ranked| ranked.is_eligible);

        rank(&mut eligible);
        rank(&mut ineligible);

        Evaluation {
            threshold_days,
            eligible,
            ineligible,
        }
    }
}
