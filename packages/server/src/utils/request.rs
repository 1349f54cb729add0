use matching::BloodRequest;
use tracing::error;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::auth::AppRole;
use crate::store::DonorStore;

/// Reason reported when a blood request cannot be loaded.
pub const REQUEST_NOT_FOUND: &str = "Blood request not found";

/// Load a blood request. A failed lookup is logged and treated as missing.
pub async fn load_request(store: &dyn DonorStore, id: Uuid) -> Option<BloodRequest> {
    match store.fetch_request(id).await {
        Ok(request) => request,
        Err(e) => {
            error!(request_id = %id, error = %e, "Blood request lookup failed");
            None
        }
    }
}

/// Hospitals may only act on their own requests. Requests without an owner are
/// left to the precondition check so the caller gets a structured reason.
///
/// Another hospital's request is reported as not found.
pub fn authorize_request(user: &AuthUser, request: &BloodRequest) -> Result<(), AppError> {
    match (user.role, request.hospital_id) {
        (AppRole::Admin, _) => Ok(()),
        (AppRole::Hospital, None) => Ok(()),
        (AppRole::Hospital, Some(owner)) if owner == user.user_id => Ok(()),
        (AppRole::Hospital, Some(_)) => Err(AppError::NotFound(REQUEST_NOT_FOUND.into())),
        (AppRole::Donor, _) => Err(AppError::PermissionDenied),
    }
}
