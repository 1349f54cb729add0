use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::urgency::UrgencyLevel;

/// Minimum days since the last donation before a donor is alerted.
pub const ALERT_ELIGIBILITY_DAYS: i64 = 56;
/// Ranking threshold for normal requests.
pub const NORMAL_RANKING_DAYS: i64 = 90;
/// Ranking threshold for urgent and critical requests.
pub const URGENT_RANKING_DAYS: i64 = 60;

/// How many days must pass after a donation before a donor is eligible again.
///
/// Alert dispatch and suggestion ranking use different policies; each call
/// site passes its own into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Same threshold regardless of urgency.
    Fixed { days: i64 },
    /// Shorter threshold for urgent and critical requests.
    UrgencyScaled { normal_days: i64, urgent_days: i64 },
}

impl EligibilityPolicy {
    pub const fn alert() -> Self {
        Self::Fixed {
            days: ALERT_ELIGIBILITY_DAYS,
        }
    }

    pub const fn ranking() -> Self {
        Self::UrgencyScaled {
            normal_days: NORMAL_RANKING_DAYS,
            urgent_days: URGENT_RANKING_DAYS,
        }
    }

    pub fn threshold_days(&self, urgency: UrgencyLevel) -> i64 {
        match *self {
            Self::Fixed { days } => days,
            Self::UrgencyScaled {
                normal_days,
                urgent_days,
            } => {
                if urgency.is_elevated() {
                    urgent_days
                } else {
                    normal_days
                }
            }
        }
    }
}

/// Whole days between the last donation and `now`, or `None` if the donor never donated.
pub fn days_since(last_donation: Option<NaiveDate>, now: DateTime<Utc>) -> Option<i64> {
    last_donation.map(|date| now.date_naive().signed_duration_since(date).num_days())
}

/// A donor is eligible if they never donated or waited at least `threshold_days`.
pub fn is_eligible(days_since_last_donation: Option<i64>, threshold_days: i64) -> bool {
    days_since_last_donation.is_none_or(|days| days >= threshold_days)
}
