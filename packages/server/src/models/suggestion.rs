use matching::{CandidateSource, RankedCandidate};
use serde::Serialize;
use uuid::Uuid;

/// One ranked donor in a suggestion list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedDonor {
    /// Record id for hospital-managed donors, user id otherwise.
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub donation_count: u32,
    /// `null` when the donor has never donated.
    pub days_since_last_donation: Option<i64>,
    pub is_eligible: bool,
    pub is_hospital_managed: bool,
    pub user_id: Option<Uuid>,
    #[schema(example = 85)]
    pub score: u8,
    /// Underlying donor record or profile, tagged by `source`.
    #[schema(value_type = Object)]
    pub donor: CandidateSource,
}

impl From<RankedCandidate> for SuggestedDonor {
    fn from(ranked: RankedCandidate) -> Self {
        let candidate = ranked.candidate;
        Self {
            id: candidate.id(),
            user_id: candidate.user_id(),
            is_hospital_managed: candidate.is_hospital_managed(),
            name: candidate.full_name,
            phone: candidate.phone,
            location: candidate.location,
            donation_count: candidate.donation_count,
            days_since_last_donation: ranked.days_since_last_donation,
            is_eligible: ranked.is_eligible,
            score: ranked.score,
            donor: candidate.source,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub suggestions: Vec<SuggestedDonor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    pub total_donors: usize,
    pub eligible_donors: usize,
    pub ineligible_donors: usize,
    pub threshold_days: i64,
}

impl SuggestionReport {
    pub fn rejected(reason: impl ToString, threshold_days: i64) -> Self {
        Self {
            success: false,
            reason: Some(reason.to_string()),
            message: None,
            suggestions: Vec::new(),
            ai_analysis: None,
            total_donors: 0,
            eligible_donors: 0,
            ineligible_donors: 0,
            threshold_days,
        }
    }
}
