use std::cmp::Ordering;

use crate::candidate::CandidateDonor;

/// Base score for an eligible donor.
const ELIGIBLE_SCORE: u8 = 60;
/// Score added per lifetime donation.
const DONATION_SCORE_STEP: u8 = 5;
/// Donations beyond this count no longer raise the score.
const DONATION_SCORE_CAP: u32 = 8;

/// A candidate with its eligibility verdict for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub candidate: CandidateDonor,
    /// `None` when the donor never donated.
    pub days_since_last_donation: Option<i64>,
    pub is_eligible: bool,
    /// Heuristic match score in `0..=100`.
    pub score: u8,
}

impl RankedCandidate {
    pub fn new(
        candidate: CandidateDonor,
        days_since_last_donation: Option<i64>,
        is_eligible: bool,
    ) -> Self {
        let score = match_score(is_eligible, candidate.donation_count);
        Self {
            candidate,
            days_since_last_donation,
            is_eligible,
            score,
        }
    }

    /// Days waited, with "never donated" as the longest possible wait.
    fn wait_days(&self) -> i64 {
        self.days_since_last_donation.unwrap_or(i64::MAX)
    }
}

/// Eligible donors start at 60; every donation up to eight adds 5.
pub fn match_score(is_eligible: bool, donation_count: u32) -> u8 {
    let base = if is_eligible { ELIGIBLE_SCORE } else { 0 };
    // At most 8 * 5 = 40, so the sum never exceeds 100.
    base + DONATION_SCORE_STEP * donation_count.min(DONATION_SCORE_CAP) as u8
}

/// Ranking order within one eligibility partition.
///
/// 1. More lifetime donations first.
/// 2. Longer wait since the last donation first; never donated counts as the longest wait.
/// 3. Identity key, so the order does not depend on how the stores returned rows.
pub fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.candidate
        .donation_count
        .cmp(&a.candidate.donation_count)
        .then_with(|| b.wait_days().cmp(&a.wait_days()))
        .then_with(|| a.candidate.identity_key().cmp(&b.candidate.identity_key()))
}

/// Stable sort by [`compare_ranked`].
pub fn rank(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(compare_ranked);
}
