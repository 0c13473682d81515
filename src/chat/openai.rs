//! OpenAI chat completions client
//!
//! See: https://platform.openai.com/docs/api-reference/chat

use async_trait::async_trait;

use super::dto::{Message, OpenAiRequest, OpenAiResponse};
use super::{ChatError, ChatPrompt, ChatProvider};
use crate::config::ChatConfig;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI-compatible chat provider
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, config: &ChatConfig) -> Result<Self, ChatError> {
        Ok(Self {
            http_client: super::http_client(config)?,
            api_key: api_key.to_string(),
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Create a provider for testing with a custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let config = ChatConfig {
            base_url: Some(base_url.into()),
            timeout_secs: 2,
            ..Default::default()
        };
        Self::new("test-key", &config).expect("test provider")
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = OpenAiRequest {
            model: &self.model,
            messages: vec![Message::system(&prompt.system), Message::user(&prompt.user)],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        tracing::debug!(model = %self.model, "OpenAI request");

        let response: OpenAiResponse = super::send_json(
            self.http_client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body),
        )
        .await?;

        super::non_empty(
            response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }
}
