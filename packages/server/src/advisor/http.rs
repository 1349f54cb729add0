use async_trait::async_trait;
use serde_json::{Value, json};

use super::{AdvisorError, SYSTEM_PROMPT, SuggestionAdvisor};
use crate::config::{AiConfig, AiProvider};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 4096;

impl AiProvider {
    fn default_model(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Google => "gemini-1.5-flash",
            AiProvider::Anthropic => "claude-3-5-sonnet-20241022",
        }
    }

    fn default_api_base(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1",
            AiProvider::Google => "https://generativelanguage.googleapis.com/v1beta",
            AiProvider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    /// Where the generated text sits in the provider's response body.
    fn text_pointer(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "/choices/0/message/content",
            AiProvider::Google => "/candidates/0/content/parts/0/text",
            AiProvider::Anthropic => "/content/0/text",
        }
    }
}

fn extract_text(provider: AiProvider, body: &Value) -> Result<String, AdvisorError> {
    body.pointer(provider.text_pointer())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(AdvisorError::EmptyResponse)
}

/// Advisor backed by a hosted chat model.
pub struct HttpAdvisor {
    client: reqwest::Client,
    provider: AiProvider,
    api_key: String,
    model: String,
    api_base: String,
}

impl HttpAdvisor {
    /// `None` when no API key is configured.
    pub fn from_config(config: &AiConfig, client: reqwest::Client) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|key| !key.is_empty())?;
        let provider = config.provider;
        Some(Self {
            client,
            provider,
            api_key,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| provider.default_api_base().to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        match self.provider {
            AiProvider::OpenAi => self
                .client
                .post(format!("{}/chat/completions", self.api_base))
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": self.model,
                    "messages": [
                        { "role": "system", "content": SYSTEM_PROMPT },
                        { "role": "user", "content": prompt },
                    ],
                })),
            AiProvider::Google => self
                .client
                .post(format!(
                    "{}/models/{}:generateContent",
                    self.api_base, self.model
                ))
                .query(&[("key", &self.api_key)])
                .json(&json!({
                    "contents": [{
                        "role": "user",
                        "parts": [{ "text": format!("System: {SYSTEM_PROMPT}\n\n{prompt}") }],
                    }],
                })),
            AiProvider::Anthropic => self
                .client
                .post(format!("{}/messages", self.api_base))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&json!({
                    "model": self.model,
                    "max_tokens": ANTHROPIC_MAX_TOKENS,
                    "system": SYSTEM_PROMPT,
                    "messages": [{ "role": "user", "content": prompt }],
                })),
        }
    }
}

#[async_trait]
impl SuggestionAdvisor for HttpAdvisor {
    async fn analyze(&self, prompt: &str) -> Result<String, AdvisorError> {
        let response = self.request(prompt).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let body: Value = response.json().await?;
        extract_text(self.provider, &body)
    }
}
