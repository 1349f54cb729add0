use async_trait::async_trait;
use serde::Deserialize;

use super::{NotifyError, SmsSender};
use crate::config::SmsConfig;

/// Subset of the provider's message resource we inspect.
#[derive(Debug, Deserialize)]
struct MessageResource {
    status: Option<String>,
    error_code: Option<i64>,
    error_message: Option<String>,
}

/// SMS over the Twilio Messages API.
pub struct TwilioSms {
    client: reqwest::Client,
    config: SmsConfig,
}

impl TwilioSms {
    pub fn new(client: reqwest::Client, config: SmsConfig) -> Self {
        Self { client, config }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

/// Accepted statuses count as sent; anything else is a delivery failure.
fn check_resource(resource: MessageResource) -> Result<(), NotifyError> {
    if resource.error_code.is_some() || resource.error_message.is_some() {
        return Err(NotifyError::Undelivered(format!(
            "provider error {}: {}",
            resource.error_code.unwrap_or_default(),
            resource.error_message.unwrap_or_default()
        )));
    }
    match resource.status.as_deref() {
        Some("queued" | "accepted" | "sending" | "sent" | "delivered") | None => Ok(()),
        Some(other) => Err(NotifyError::Undelivered(format!("message status {other}"))),
    }
}

#[async_trait]
impl SmsSender for TwilioSms {
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", to), ("From", &self.config.from_number), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        // A 2xx without a JSON body is still an accepted message.
        match serde_json::from_str::<MessageResource>(&text) {
            Ok(resource) => check_resource(resource),
            Err(_) => Ok(()),
        }
    }
}
