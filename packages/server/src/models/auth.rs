use serde::{Deserialize, Serialize};

/// Account role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    Hospital,
    Donor,
}

/// Roles allowed to trigger matching for a blood request.
pub const MATCHING_ROLES: &[AppRole] = &[AppRole::Hospital, AppRole::Admin];
