//! Local Ollama chat client
//!
//! See: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion

use async_trait::async_trait;

use super::dto::{Message, OllamaOptions, OllamaRequest, OllamaResponse};
use super::{ChatError, ChatPrompt, ChatProvider};
use crate::config::ChatConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

/// Chat provider for a local Ollama server (no API key)
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        Ok(Self {
            http_client: super::http_client(config)?,
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
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaRequest {
            model: &self.model,
            messages: vec![Message::system(&prompt.system), Message::user(&prompt.user)],
            stream: false,
            options: OllamaOptions {
                num_predict: prompt.max_tokens,
                temperature: prompt.temperature,
            },
        };

        let response: OllamaResponse =
            super::send_json(self.http_client.post(&url).json(&body)).await?;

        super::non_empty(response.message.map(|m| m.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "mistral",
                "stream": false,
                "options": {"num_predict": 200}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "message": {"role": "assistant", "content": "Read Emma."},
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ChatConfig {
            base_url: Some(server.uri()),
            model: Some("mistral".to_string()),
            ..Default::default()
        };
        let provider = OllamaProvider::new(&config).unwrap();
        let prompt = ChatPrompt {
            system: "sys".to_string(),
            user: "what next?".to_string(),
            max_tokens: 200,
            temperature: 0.2,
        };

        assert_eq!(provider.complete(&prompt).await.unwrap(), "Read Emma.");
    }

    #[tokio::test]
    async fn test_server_down_is_unavailable() {
        // Nothing listens on port 9 (discard) in the test environment
        let config = ChatConfig {
            base_url: Some("http://127.0.0.1:9".to_string()),
            timeout_secs: 1,
            ..Default::default()
        };
        let provider = OllamaProvider::new(&config).unwrap();
        let prompt = ChatPrompt {
            system: String::new(),
            user: "hi".to_string(),
            max_tokens: 10,
            temperature: 0.0,
        };

        let err = provider.complete(&prompt).await.unwrap_err();
        assert!(matches!(err, ChatError::Unavailable(_)));
    }
}
