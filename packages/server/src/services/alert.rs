use chrono::Utc;
use futures::{StreamExt, stream};
use matching::{BloodRequest, HospitalContact, MatchingEngine};
use tracing::{error, info, instrument, warn};

use super::DONOR_FETCH_FAILED;
use super::candidates::gather_candidates;
use crate::config::{MatchingConfig, NotifyConfig};
use crate::models::alert::AlertReport;
use crate::notify::{AlertMessage, DeliveryOutcome, Notifier};
use crate::store::DonorStore;

/// Sends one request's alert to every eligible donor.
pub struct AlertDispatcher<'a> {
    store: &'a dyn DonorStore,
    notifier: &'a dyn Notifier,
    matching: &'a MatchingConfig,
    notify: &'a NotifyConfig,
}

impl<'a> AlertDispatcher<'a> {
    pub fn new(
        store: &'a dyn DonorStore,
        notifier: &'a dyn Notifier,
        matching: &'a MatchingConfig,
        notify: &'a NotifyConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            matching,
            notify,
        }
    }

    fn rejected(&self, reason: impl ToString) -> AlertReport {
        AlertReport::rejected(
            reason,
            self.notifier.sms_enabled(),
            self.notifier.email_enabled(),
        )
    }

    async fn hospital_contact(&self, hospital_id: uuid::Uuid) -> HospitalContact {
        match self.store.fetch_hospital_contact(hospital_id).await {
            Ok(Some(contact)) => contact,
            Ok(None) => HospitalContact::default(),
            Err(e) => {
                warn!(%hospital_id, error = %e, "Hospital profile lookup failed, using defaults");
                HospitalContact::default()
            }
        }
    }

    /// The request is marked `alert_sent` whenever matching ran, even if nobody was eligible.
    ///
    /// Every failure comes back as a report with `success: false`.
    #[instrument(skip_all, fields(request_id = %request.id))]
    pub async fn dispatch(&self, request: &BloodRequest) -> AlertReport {
        if request.status.is_closed() {
            info!(status = %request.status, "Request is closed, not alerting");
            return self.rejected(format!("Blood request is already {}", request.status));
        }

        let engine = MatchingEngine::new(self.matching.alert_policy());
        let scope = match engine.scope(request) {
            Ok(scope) => scope,
            Err(precondition) => {
                warn!(%precondition, "Request cannot be matched");
                return self.rejected(precondition);
            }
        };

        let pool =
            match gather_candidates(self.store, &engine, &scope, self.matching.lookup_concurrency)
                .await
            {
                Ok(pool) => pool,
                Err(e) => {
                    error!(error = %e, "Hospital donor fetch failed");
                    return self.rejected(DONOR_FETCH_FAILED);
                }
            };
        let evaluation = engine.evaluate(&scope, pool.hospital_donors, pool.profiles, Utc::now());
        let matching_donors = evaluation.total();
        let threshold_days = evaluation.threshold_days;
        let recipients = evaluation.alert_candidates();

        info!(
            matching_donors,
            eligible = recipients.len(),
            threshold_days,
            "Evaluated donors for alert"
        );

        let sms_configured = self.notifier.sms_enabled();
        let email_configured = self.notifier.email_enabled();

        if recipients.is_empty() {
            self.mark_alert_sent(request).await;
            return AlertReport {
                success: true,
                message: format!(
                    "No eligible donors found. Found {matching_donors} donors with blood group {}, \
                     but none have waited {threshold_days}+ days since their last donation.",
                    request.blood_group
                ),
                reason: None,
                notified: 0,
                total: 0,
                matching_donors,
                sms_success_count: 0,
                email_success_count: 0,
                failed_count: 0,
                sms_configured,
                email_configured,
                threshold_days: Some(threshold_days),
            };
        }

        let contact = self.hospital_contact(scope.hospital_id).await;
        let message = AlertMessage::compose(request, &contact);

        let deliveries: Vec<_> = recipients
            .iter()
            .map(|ranked| self.notifier.notify(&ranked.candidate, &message))
            .collect();
        let outcomes: Vec<DeliveryOutcome> = stream::iter(deliveries)
            .buffer_unordered(self.notify.concurrency.max(1))
            .collect()
            .await;

        let notified = outcomes.iter().filter(|o| o.delivered()).count();
        let sms_success_count = outcomes.iter().filter(|o| o.sms).count();
        let email_success_count = outcomes.iter().filter(|o| o.email).count();
        let failed_count = outcomes.len() - notified;

        self.mark_alert_sent(request).await;

        if !sms_configured {
            warn!("SMS channel is not configured, only email alerts were attempted");
        }
        info!(
            notified,
            sms_success_count, email_success_count, failed_count, "Alert dispatch finished"
        );

        let message = if sms_configured {
            format!(
                "Alerts sent to {notified} matching donors \
                 (SMS: {sms_success_count}, Email: {email_success_count})"
            )
        } else {
            format!(
                "Alerts sent to {notified} matching donors (Email: {email_success_count}). \
                 SMS disabled - SMS provider not configured."
            )
        };

        AlertReport {
            success: true,
            message,
            reason: None,
            notified,
            total: outcomes.len(),
            matching_donors,
            sms_success_count,
            email_success_count,
            failed_count,
            sms_configured,
            email_configured,
            threshold_days: Some(threshold_days),
        }
    }

    /// Alerts already went out, so a failed status write is logged rather than returned.
    async fn mark_alert_sent(&self, request: &BloodRequest) {
        if let Err(e) = self.store.mark_alert_sent(request.id).await {
            error!(request_id = %request.id, error = %e, "Failed to mark request as alert_sent");
        }
    }
}
