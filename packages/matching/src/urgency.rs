#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a blood request.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "normal"))]
    Normal,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "urgent"))]
    Urgent,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "critical"))]
    Critical,
}

impl UrgencyLevel {
    /// Urgent and critical requests use the shorter ranking threshold.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Urgent | Self::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
