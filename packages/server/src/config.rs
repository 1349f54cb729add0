use config::{Config, ConfigError, Environment, File};
use matching::EligibilityPolicy;
use matching::eligibility::{ALERT_ELIGIBILITY_DAYS, NORMAL_RANKING_DAYS, URGENT_RANKING_DAYS};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret shared with the auth provider for verifying bearer tokens.
    pub jwt_secret: String,
}

/// Eligibility thresholds and limits for the matching engine.
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Fixed threshold for alert dispatch. Default: 56.
    #[serde(default = "default_alert_eligibility_days")]
    pub alert_eligibility_days: i64,
    /// Ranking threshold for normal requests. Default: 90.
    #[serde(default = "default_normal_ranking_days")]
    pub normal_ranking_days: i64,
    /// Ranking threshold for urgent and critical requests. Default: 60.
    #[serde(default = "default_urgent_ranking_days")]
    pub urgent_ranking_days: i64,
    /// Maximum suggestions returned. Default and upper bound: 10.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Concurrent donation-history lookups per request. Default: 8.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

fn default_alert_eligibility_days() -> i64 {
    ALERT_ELIGIBILITY_DAYS
}
fn default_normal_ranking_days() -> i64 {
    NORMAL_RANKING_DAYS
}
fn default_urgent_ranking_days() -> i64 {
    URGENT_RANKING_DAYS
}
fn default_max_suggestions() -> usize {
    matching::MAX_SUGGESTIONS
}
fn default_lookup_concurrency() -> usize {
    8
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            alert_eligibility_days: default_alert_eligibility_days(),
            normal_ranking_days: default_normal_ranking_days(),
            urgent_ranking_days: default_urgent_ranking_days(),
            max_suggestions: default_max_suggestions(),
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}

impl MatchingConfig {
    pub fn alert_policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::Fixed {
            days: self.alert_eligibility_days,
        }
    }

    pub fn ranking_policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::UrgencyScaled {
            normal_days: self.normal_ranking_days,
            urgent_days: self.urgent_ranking_days,
        }
    }

    /// Configured suggestion count, never above [`matching::MAX_SUGGESTIONS`].
    pub fn suggestion_limit(&self) -> usize {
        self.max_suggestions.min(matching::MAX_SUGGESTIONS)
    }
}

/// Twilio-style SMS credentials.
#[derive(Debug, Deserialize, Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com/2010-04-01".into()
}

/// Resend-style email credentials.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default = "default_email_from")]
    pub from: String,
    #[serde(default = "default_email_api_base")]
    pub api_base: String,
}

fn default_email_from() -> String {
    "HEMO LINK <onboarding@resend.dev>".into()
}
fn default_email_api_base() -> String {
    "https://api.resend.com".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    /// Concurrent donor notifications per alert. Default: 8.
    #[serde(default = "default_notify_concurrency")]
    pub concurrency: usize,
    /// SMS channel; disabled when absent.
    #[serde(default)]
    pub sms: Option<SmsConfig>,
    /// Email channel; disabled when absent.
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

fn default_notify_concurrency() -> usize {
    8
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            concurrency: default_notify_concurrency(),
            sms: None,
            email: None,
        }
    }
}

/// Text-generation backend used to explain suggestions.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Google,
    Anthropic,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: AiProvider,
    /// Advisor is disabled when no key is configured.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Provider-specific model name; each provider has its own default.
    #[serde(default)]
    pub model: Option<String>,
    /// Override for the provider's API base URL.
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HEMOLINK_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., HEMOLINK__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("HEMOLINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
