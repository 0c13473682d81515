//! Anthropic messages API client
//!
//! See: https://docs.anthropic.com/en/api/messages

use async_trait::async_trait;

use super::dto::{AnthropicRequest, AnthropicResponse, Message};
use super::{ChatError, ChatPrompt, ChatProvider};
use crate::config::ChatConfig;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
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
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = AnthropicRequest {
            model: &self.model,
            system: &prompt.system,
            messages: vec![Message::user(&prompt.user)],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        tracing::debug!(model = %self.model, "Anthropic request");

        let response: AnthropicResponse = super::send_json(
            self.http_client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body),
        )
        .await?;

        // Join all text blocks; other block types are skipped
        let text: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        super::non_empty(Some(text.join("\n")))
    }
}
