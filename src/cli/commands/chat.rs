//! Reading assistant command.

use tokio::runtime::Runtime;

use crate::chat::{self, AssistantReply, ReadingAssistant};
use crate::config::{ChatConfig, ChatProviderKind, Config};
use crate::library::BookStore;

use super::{open_store, print_book};

/// Ask the assistant a question about the library
pub fn cmd_ask(rt: &Runtime, config: &Config, message: &str, save: bool) -> anyhow::Result<()> {
    let chat_config = with_env_api_key(config.chat.clone(), |name| std::env::var(name).ok());
    let provider = chat::build_provider(&chat_config)?;
    let assistant = ReadingAssistant::new(provider, &chat_config);

    rt.block_on(async {
        let store = open_store(config).await?;
        let books = store.all().await?;

        match assistant.ask(message, &books).await? {
            AssistantReply::Text(text) => println!("{}", text),
            AssistantReply::AddBook(book) => {
                println!("The assistant suggests adding:\n");
                print_book(&book);
                if save {
                    let id = store.put(None, book).await?;
                    println!("\n✓ Saved to library (id {})", id);
                } else {
                    println!("\nRun again with --save to add it.");
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Environment variable the provider's own SDKs read the key from
fn provider_key_var(provider: ChatProviderKind) -> Option<&'static str> {
    match provider {
        ChatProviderKind::OpenAi => Some("OPENAI_API_KEY"),
        ChatProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
        ChatProviderKind::Ollama => None,
    }
}

/// Fill a missing API key from the provider's usual environment variable.
fn with_env_api_key(
    mut config: ChatConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ChatConfig {
    let missing = config
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty());

    if missing && let Some(var) = provider_key_var(config.provider) {
        config.api_key = lookup(var);
    }
    config
}
