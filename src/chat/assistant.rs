//! Reading assistant - prompt construction and reply interpretation.
//!
//! The model is told to answer book-adding requests with a small JSON object:
//!
//! ```json
//! {"action": "add_book", "book": {"title": "...", "author": "...", ...}}
//! ```
//!
//! Replies are scanned for that object (models like to wrap it in prose or a
//! code fence); anything else is plain conversation.

use serde::Deserialize;
use serde_json::Value;

use super::{ChatError, ChatPrompt, ChatProvider};
use crate::config::ChatConfig;
use crate::model::LocalBook;

/// Titles from the library included in the prompt for context
const RECENT_TITLES_IN_PROMPT: usize = 10;

/// What the assistant wants to do with the user's message
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    /// The model proposed a book for the library
    AddBook(LocalBook),
    /// Conversational answer
    Text(String),
}

/// Chat front end for questions about the user's library
pub struct ReadingAssistant {
    provider: Box<dyn ChatProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl ReadingAssistant {
    pub fn new(provider: Box<dyn ChatProvider>, config: &ChatConfig) -> Self {
        Self {
            provider,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Ask a question with `books` (most recent first) as context.
    pub async fn ask<B: AsRef<LocalBook>>(
        &self,
        message: &str,
        books: &[B],
    ) -> Result<AssistantReply, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let prompt = ChatPrompt {
            system: system_prompt(books),
            user: message.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::info!(provider = self.provider.name(), "Asking reading assistant");
        let reply = self.provider.complete(&prompt).await?;
        Ok(parse_reply(&reply))
    }
}

fn system_prompt<B: AsRef<LocalBook>>(books: &[B]) -> String {
    let mut prompt = format!(
        "You are a helpful reading assistant. You help manage a personal reading library \
         and provide book recommendations.\n\n\
         Current library contains {} books.",
        books.len()
    );

    let recent: Vec<String> = books
        .iter()
        .take(RECENT_TITLES_IN_PROMPT)
        .map(|b| {
            let book = b.as_ref();
            match book.display_authors() {
                authors if authors.is_empty() => format!("- {}", book.title),
                authors => format!("- {} by {}", book.title, authors),
            }
        })
        .collect();
    if !recent.is_empty() {
        prompt.push_str(" Most recent:\n");
        prompt.push_str(&recent.join("\n"));
    }

    prompt.push_str(
        r#"

When adding books, respond with a JSON object containing the book details in this format:
{
  "action": "add_book",
  "book": {
    "title": "Book Title",
    "author": "Author Name",
    "isbn": "1234567890",
    "pages": 300,
    "publisher": "Publisher Name",
    "year": 2024,
    "shelf": "to-read",
    "date_added": "2024/01/15",
    "date_read": null,
    "rating": null,
    "notes": ""
  }
}

For other queries, provide helpful conversational responses about books and reading."#,
    );
    prompt
}

/// Book as the model describes it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestedBook {
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    pages: Option<u32>,
    publisher: Option<String>,
    year: Option<i32>,
    #[serde(alias = "status")]
    shelf: Option<String>,
    #[serde(alias = "dateAdded")]
    date_added: Option<String>,
    #[serde(alias = "dateCompleted")]
    date_read: Option<String>,
    rating: Option<u8>,
    notes: Option<String>,
}

impl SuggestedBook {
    fn into_local_book(self) -> Option<LocalBook> {
        let present = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        Some(LocalBook {
            title: present(self.title)?,
            author: present(self.author),
            isbn: present(self.isbn),
            pages: self.pages.filter(|&p| p > 0),
            publisher: present(self.publisher),
            first_publish_year: self.year,
            shelf: present(self.shelf),
            date_added: present(self.date_added),
            date_read: present(self.date_read),
            rating: self.rating,
            notes: present(self.notes),
            ..Default::default()
        })
    }
}

/// Interpret a model reply.
pub fn parse_reply(reply: &str) -> AssistantReply {
    extract_add_book(reply)
        .map(AssistantReply::AddBook)
        .unwrap_or_else(|| AssistantReply::Text(reply.trim().to_string()))
}

fn extract_add_book(reply: &str) -> Option<LocalBook> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&reply[start..=end]).ok()?;
    if value.get("action").and_then(Value::as_str) != Some("add_book") {
        return None;
    }

    let book: SuggestedBook = serde_json::from_value(value.get("book")?.clone()).ok()?;
    book.into_local_book()
}
