use axum::Json;
use axum::extract::State;
use matching::UrgencyLevel;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::models::auth::MATCHING_ROLES;
use crate::models::suggestion::SuggestionReport;
use crate::services::suggestion::SuggestionService;
use crate::state::AppState;
use crate::utils::request::{REQUEST_NOT_FOUND, authorize_request, load_request};

#[utoipa::path(
    post,
    path = "/{id}/suggestions",
    tag = "Suggestions",
    operation_id = "suggestDonors",
    summary = "Rank donors for a request",
    description = "Returns up to 10 donors with a matching blood group, eligible donors first. \
        The eligibility window is 90 days, or 60 days for urgent and critical requests. \
        Includes a free-text analysis when an advisor is configured. Unknown requests and \
        requests that cannot be matched return `success: false` with a `reason`. \
        Requires the `hospital` or `admin` role.",
    params(("id" = Uuid, Path, description = "Blood request ID")),
    responses(
        (status = 200, description = "Ranked suggestions", body = SuggestionReport),
        (status = 400, description = "Malformed request ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or invalid token (TOKEN_MISSING, TOKEN_INVALID)",
            body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Another hospital's request (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn suggest_donors(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<SuggestionReport>, AppError> {
    auth_user.require_role(MATCHING_ROLES)?;

    let Some(request) = load_request(state.store.as_ref(), id).await else {
        let threshold_days = state
            .config
            .matching
            .ranking_policy()
            .threshold_days(UrgencyLevel::Normal);
        return Ok(Json(SuggestionReport::rejected(
            REQUEST_NOT_FOUND,
            threshold_days,
        )));
    };
    authorize_request(&auth_user, &request)?;

    let report = SuggestionService::new(
        state.store.as_ref(),
        state.advisor.as_deref(),
        &state.config.matching,
    )
    .suggest(&request)
    .await;

    Ok(Json(report))
}
