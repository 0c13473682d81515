//! Reading assistant chat module - talks to a hosted or local LLM.
//!
//! # Architecture
//!
//! - **Provider trait** ([`ChatProvider`]) - One completion call, nothing else
//! - **API DTOs** (`dto.rs`) - Request/response shapes for each backend
//! - **Providers** (`openai.rs`, `anthropic.rs`, `ollama.rs`) - HTTP clients
//! - **Assistant** (`assistant.rs`) - Prompt building and reply parsing
//!
//! Which provider runs is decided by configuration through [`build_provider`].
//!
//! # Usage
//!
//! ```ignore
//! let provider = chat::build_provider(&config.chat)?;
//! let assistant = ReadingAssistant::new(provider, &config.chat);
//! match assistant.ask("Add Dune to my to-read list", &books).await? {
//!     AssistantReply::AddBook(book) => store.put(None, book).await?,
//!     AssistantReply::Text(text) => println!("{text}"),
//! }
//! ```

mod anthropic;
pub mod assistant;
pub mod dto;
mod ollama;
mod openai;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::{ChatConfig, ChatProviderKind};

pub use anthropic::AnthropicProvider;
pub use assistant::{AssistantReply, ReadingAssistant};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// One system + user exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Errors from a chat provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("Chat provider not configured: {0}")]
    NotConfigured(String),

    #[error("Chat provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid chat response: {0}")]
    InvalidResponse(String),

    #[error("Chat provider returned an empty reply")]
    EmptyReply,

    #[error("Message is empty")]
    EmptyMessage,
}

/// A chat completion backend.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short name for logs ("openai", ...)
    fn name(&self) -> &'static str;

    /// Send the prompt and return the assistant's reply text.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError>;
}

/// Build the provider named in `config`.
///
/// Hosted providers without an API key are [`ChatError::NotConfigured`].
pub fn build_provider(config: &ChatConfig) -> Result<Box<dyn ChatProvider>, ChatError> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    if config.provider.requires_api_key() && api_key.is_none() {
        return Err(ChatError::NotConfigured(format!(
            "{} API key not configured",
            config.provider
        )));
    }
    let api_key = api_key.unwrap_or_default();

    let provider: Box<dyn ChatProvider> = match config.provider {
        ChatProviderKind::OpenAi => Box::new(OpenAiProvider::new(api_key, config)?),
        ChatProviderKind::Anthropic => Box::new(AnthropicProvider::new(api_key, config)?),
        ChatProviderKind::Ollama => Box::new(OllamaProvider::new(config)?),
    };

    tracing::debug!("Using chat provider {}", provider.name());
    Ok(provider)
}

fn http_client(config: &ChatConfig) -> Result<reqwest::Client, ChatError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| ChatError::Unavailable(format!("failed to build HTTP client: {}", e)))
}

/// Send a prepared request and decode the JSON body.
async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ChatError> {
    let response = request
        .send()
        .await
        .map_err(|e| ChatError::Unavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ChatError::Unavailable(format!(
            "HTTP {}: {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body.chars().take(200).collect::<String>()
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ChatError::InvalidResponse(e.to_string()))
}

/// Trim a reply and reject blank ones.
fn non_empty(reply: Option<String>) -> Result<String, ChatError> {
    reply
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or(ChatError::EmptyReply)
}

/// Mock provider for testing.
#[cfg(test)]
pub mod mocks {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// Returns a canned reply (or error) and records the prompts it saw.
    pub struct MockChat {
        pub reply: Result<String, ChatError>,
        pub prompts: Mutex<Vec<ChatPrompt>>,
    }

    impl MockChat {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: ChatError) -> Self {
            Self {
                reply: Err(error),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn last_prompt(&self) -> Option<ChatPrompt> {
            self.prompts.lock().last().cloned()
        }
    }

    #[async_trait]
    impl ChatProvider for MockChat {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
            self.prompts.lock().push(prompt.clone());
            self.reply.clone()
        }
    }

    /// Lets a test keep a handle on the mock after boxing it.
    #[async_trait]
    impl ChatProvider for Arc<MockChat> {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ChatError> {
            self.as_ref().complete(prompt).await
        }
    }
}
