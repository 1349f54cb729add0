//! Donor notification channels.

mod email;
mod message;
mod sms;

use std::sync::Arc;

use async_trait::async_trait;
use matching::CandidateDonor;
use matching::phone::{PhoneError, format_phone_number};
use thiserror::Error;
use tracing::{debug, warn};

pub use email::ResendEmail;
pub use message::AlertMessage;
pub use sms::TwilioSms;

use crate::config::NotifyConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("message not delivered: {0}")]
    Undelivered(String),
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),
}

/// Per-recipient result. A recipient counts as notified if any channel succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub sms: bool,
    pub email: bool,
}

impl DeliveryOutcome {
    pub fn delivered(&self) -> bool {
        self.sms || self.email
    }
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    /// `to` is already in E.164 form.
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError>;
}

/// Delivers one alert to one donor. Failures are absorbed into the outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn sms_enabled(&self) -> bool;
    fn email_enabled(&self) -> bool;
    async fn notify(&self, donor: &CandidateDonor, message: &AlertMessage) -> DeliveryOutcome;
}

/// Tries SMS first, then email, over whichever channels are configured.
#[derive(Clone, Default)]
pub struct ChannelNotifier {
    sms: Option<Arc<dyn SmsSender>>,
    email: Option<Arc<dyn EmailSender>>,
}

impl ChannelNotifier {
    pub fn new(sms: Option<Arc<dyn SmsSender>>, email: Option<Arc<dyn EmailSender>>) -> Self {
        Self { sms, email }
    }

    pub fn from_config(config: &NotifyConfig, client: reqwest::Client) -> Self {
        let sms = config
            .sms
            .clone()
            .map(|c| Arc::new(TwilioSms::new(client.clone(), c)) as Arc<dyn SmsSender>);
        let email = config
            .email
            .clone()
            .map(|c| Arc::new(ResendEmail::new(client, c)) as Arc<dyn EmailSender>);
        Self::new(sms, email)
    }

    async fn try_sms(
        &self,
        sender: &dyn SmsSender,
        donor: &CandidateDonor,
        message: &AlertMessage,
    ) -> Result<(), NotifyError> {
        let to = format_phone_number(&donor.phone)?;
        sender.send_sms(&to, &message.sms_body).await
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    fn sms_enabled(&self) -> bool {
        self.sms.is_some()
    }

    fn email_enabled(&self) -> bool {
        self.email.is_some()
    }

    async fn notify(&self, donor: &CandidateDonor, message: &AlertMessage) -> DeliveryOutcome {
        let mut outcome = DeliveryOutcome::default();

        if let Some(sender) = &self.sms {
            match self.try_sms(sender.as_ref(), donor, message).await {
                Ok(()) => outcome.sms = true,
                Err(e) => warn!(donor = %donor.full_name, error = %e, "SMS not sent"),
            }
        }

        if let (Some(sender), Some(address)) = (&self.email, donor.email.as_deref()) {
            let html = message.email_html(&donor.full_name);
            match sender.send_email(address, &message.email_subject, &html).await {
                Ok(()) => outcome.email = true,
                Err(e) => warn!(donor = %donor.full_name, error = %e, "Email not sent"),
            }
        }

        debug!(donor = %donor.full_name, ?outcome, "Notification attempted");
        outcome
    }
}
