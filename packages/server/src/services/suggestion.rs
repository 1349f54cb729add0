use chrono::Utc;
use matching::{BloodRequest, MatchingEngine};
use tracing::{error, info, instrument, warn};

use super::DONOR_FETCH_FAILED;
use super::candidates::gather_candidates;
use crate::advisor::{SuggestionAdvisor, build_prompt};
use crate::config::MatchingConfig;
use crate::models::suggestion::{SuggestedDonor, SuggestionReport};
use crate::store::DonorStore;

pub const ADVISOR_NOT_CONFIGURED: &str =
    "AI analysis is not configured. Showing heuristic-based donor matches.";
pub const ADVISOR_UNAVAILABLE: &str =
    "AI suggestions are temporarily unavailable. Showing top donors based on donation history.";

/// Ranks donors for one request and optionally asks the advisor to explain the list.
pub struct SuggestionService<'a> {
    store: &'a dyn DonorStore,
    advisor: Option<&'a dyn SuggestionAdvisor>,
    matching: &'a MatchingConfig,
}

impl<'a> SuggestionService<'a> {
    pub fn new(
        store: &'a dyn DonorStore,
        advisor: Option<&'a dyn SuggestionAdvisor>,
        matching: &'a MatchingConfig,
    ) -> Self {
        Self {
            store,
            advisor,
            matching,
        }
    }

    /// Every failure comes back as a report with `success: false`.
    #[instrument(skip_all, fields(request_id = %request.id))]
    pub async fn suggest(&self, request: &BloodRequest) -> SuggestionReport {
        let engine = MatchingEngine::new(self.matching.ranking_policy());
        let threshold_days = engine.policy().threshold_days(request.urgency_level);
        let scope = match engine.scope(request) {
            Ok(scope) => scope,
            Err(precondition) => {
                warn!(%precondition, "Request cannot be matched");
                return SuggestionReport::rejected(precondition, threshold_days);
            }
        };

        let pool =
            match gather_candidates(self.store, &engine, &scope, self.matching.lookup_concurrency)
                .await
            {
                Ok(pool) => pool,
                Err(e) => {
                    error!(error = %e, "Hospital donor fetch failed");
                    return SuggestionReport::rejected(DONOR_FETCH_FAILED, threshold_days);
                }
            };
        let set = engine
            .evaluate(&scope, pool.hospital_donors, pool.profiles, Utc::now())
            .into_suggestions(self.matching.suggestion_limit());

        info!(
            total = set.total_donors,
            eligible = set.eligible_donors,
            threshold_days = set.threshold_days,
            "Ranked donor suggestions"
        );

        if set.total_donors == 0 {
            return SuggestionReport {
                success: true,
                reason: None,
                message: Some(format!(
                    "No donors found with blood group {}",
                    request.blood_group
                )),
                suggestions: Vec::new(),
                ai_analysis: None,
                total_donors: 0,
                eligible_donors: 0,
                ineligible_donors: 0,
                threshold_days: set.threshold_days,
            };
        }

        let ai_analysis = match self.advisor {
            None => ADVISOR_NOT_CONFIGURED.to_string(),
            Some(advisor) => match advisor.analyze(&build_prompt(request, &set)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Suggestion advisor failed");
                    ADVISOR_UNAVAILABLE.to_string()
                }
            },
        };

        SuggestionReport {
            success: true,
            reason: None,
            message: None,
            total_donors: set.total_donors,
            eligible_donors: set.eligible_donors,
            ineligible_donors: set.ineligible_donors,
            threshold_days: set.threshold_days,
            suggestions: set.suggestions.into_iter().map(SuggestedDonor::from).collect(),
            ai_analysis: Some(ai_analysis),
        }
    }
}
