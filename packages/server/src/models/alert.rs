use serde::Serialize;

/// Result of an alert dispatch.
///
/// Precondition failures come back as `success: false` with a `reason`
/// rather than as an HTTP error.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub success: bool,
    #[schema(example = "Alerts sent to 3 matching donors (SMS: 3, Email: 1)")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Blood request is missing hospital information")]
    pub reason: Option<String>,
    /// Donors reached by at least one channel.
    pub notified: usize,
    /// Eligible donors an alert was attempted for.
    pub total: usize,
    /// Donors with a matching blood group, eligible or not.
    pub matching_donors: usize,
    pub sms_success_count: usize,
    pub email_success_count: usize,
    pub failed_count: usize,
    pub sms_configured: bool,
    pub email_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 56)]
    pub threshold_days: Option<i64>,
}

impl AlertReport {
    pub fn rejected(reason: impl ToString, sms_configured: bool, email_configured: bool) -> Self {
        let reason = reason.to_string();
        Self {
            success: false,
            message: reason.clone(),
            reason: Some(reason),
            notified: 0,
            total: 0,
            matching_donors: 0,
            sms_success_count: 0,
            email_success_count: 0,
            failed_count: 0,
            sms_configured,
            email_configured,
            threshold_days: None,
        }
    }
}
