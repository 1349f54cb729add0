//! Optional text-generation advisor that explains a suggestion list.

mod http;

use async_trait::async_trait;
use matching::{BloodRequest, SuggestionSet};
use serde::Serialize;
use thiserror::Error;

pub use http::HttpAdvisor;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant specializing in blood donation \
matching. Provide clear, actionable recommendations.";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("provider response had no text")]
    EmptyResponse,
}

#[async_trait]
pub trait SuggestionAdvisor: Send + Sync {
    /// Free-text analysis for `prompt`.
    async fn analyze(&self, prompt: &str) -> Result<String, AdvisorError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DonorSummary<'a> {
    id: String,
    name: &'a str,
    location: &'a str,
    donation_count: u32,
    days_since_last_donation: Option<i64>,
    is_eligible: bool,
    score: u8,
}

/// Prompt describing the request and the already-ranked shortlist.
pub fn build_prompt(request: &BloodRequest, set: &SuggestionSet) -> String {
    let donors: Vec<DonorSummary<'_>> = set
        .suggestions
        .iter()
        .map(|ranked| DonorSummary {
            id: ranked.candidate.id().to_string(),
            name: &ranked.candidate.full_name,
            location: &ranked.candidate.location,
            donation_count: ranked.candidate.donation_count,
            days_since_last_donation: ranked.days_since_last_donation,
            is_eligible: ranked.is_eligible,
            score: ranked.score,
        })
        .collect();
    let donor_json = serde_json::to_string_pretty(&donors).unwrap_or_else(|_| "[]".into());

    format!(
        "You are an AI assistant helping to match blood donors for emergency requests.\n\
         \n\
         Blood Request Details:\n\
         - Patient: {patient}\n\
         - Blood Group: {bg}\n\
         - Units Needed: {units}\n\
         - Urgency: {urgency}\n\
         - Patient Contact: {contact}\n\
         \n\
         Available Donors ({shown} shown of {total} total):\n\
         {donor_json}\n\
         \n\
         Analyze these donors and rank the top 5 best matches based on:\n\
         1. Eligibility (must have waited at least {threshold} days since last donation; \
         null days means never donated)\n\
         2. Donation history (higher donation count = more reliable)\n\
         3. Time since last donation within the eligible range\n\
         4. Location proximity (if available)\n\
         \n\
         Provide your analysis in a structured format with:\n\
         - Donor ID\n\
         - Reasoning for the ranking (2-3 sentences)\n\
         - A match score (0-100)\n\
         \n\
         Focus on donors who are eligible and have a good track record.",
        patient = request.patient_name,
        bg = request.blood_group,
        units = request.units_needed,
        urgency = request.urgency_level,
        contact = request.patient_contact,
        shown = donors.len(),
        total = set.total_donors,
        threshold = set.threshold_days,
    )
}
