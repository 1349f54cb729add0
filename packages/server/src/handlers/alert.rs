use axum::Json;
use axum::extract::State;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::path::AppPath;
use crate::models::alert::AlertReport;
use crate::models::auth::MATCHING_ROLES;
use crate::services::alert::AlertDispatcher;
use crate::state::AppState;
use crate::utils::request::{REQUEST_NOT_FOUND, authorize_request, load_request};

#[utoipa::path(
    post,
    path = "/{id}/alerts",
    tag = "Alerts",
    operation_id = "sendDonorAlerts",
    summary = "Alert eligible donors",
    description = "Notifies every eligible donor with a matching blood group by SMS and email, \
        then marks the request `alert_sent`. Donors qualify after 56 days since their last \
        donation. Unknown requests and requests that cannot be matched return \
        `success: false` with a `reason`. \
        Requires the `hospital` or `admin` role.",
    params(("id" = Uuid, Path, description = "Blood request ID")),
    responses(
        (status = 200, description = "Alert dispatch result", body = AlertReport),
        (status = 400, description = "Malformed request ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Missing or invalid token (TOKEN_MISSING, TOKEN_INVALID)",
            body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Another hospital's request (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn send_alerts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<AlertReport>, AppError> {
    auth_user.require_role(MATCHING_ROLES)?;

    let Some(request) = load_request(state.store.as_ref(), id).await else {
        return Ok(Json(AlertReport::rejected(
            REQUEST_NOT_FOUND,
            state.notifier.sms_enabled(),
            state.notifier.email_enabled(),
        )));
    };
    authorize_request(&auth_user, &request)?;

    let report = AlertDispatcher::new(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &state.config.matching,
        &state.config.notify,
    )
    .dispatch(&request)
    .await;

    Ok(Json(report))
}
