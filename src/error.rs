//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`CatalogError`], [`EnrichmentError`],
//!   [`ChatError`], [`StoreError`], [`ConfigError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use crate::error::{Result, ResultExt};
//!
//! async fn import(path: &Path, store: &dyn BookStore) -> Result<usize> {
//!     let books = load_books(path).with_context("reading import file")?;
//!     Ok(store.replace_all(books).await?)
//! }
//! ```

use crate::catalog::CatalogError;
use crate::chat::ChatError;
use crate::config::ConfigError;
use crate::enrichment::EnrichmentError;
use crate::library::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Open Library request failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Input rejected by the enrichment engine
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// Reading assistant failure
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Book storage or import/export failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bad command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("author key must look like OL23919A");
        assert!(err.to_string().contains("OL23919A"));
    }

    #[test]
    fn test_subsystem_errors_convert() {
        let err: Error = CatalogError::Unavailable("timeout".to_string()).into();
        assert!(matches!(err, Error::Catalog(_)));
        assert!(err.to_string().contains("timeout"));

        let err: Error = StoreError::NotFound(3).into();
        assert!(err.to_string().contains("No book with id 3"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ChatError::EmptyReply).context("while asking assistant");
        let msg = err.to_string();
        assert!(msg.contains("while asking assistant"));
        assert!(msg.contains("empty reply"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), StoreError> = Err(StoreError::NotFound(1));
        let with_ctx = result.with_context("updating book");
        assert!(with_ctx.unwrap_err().to_string().contains("updating book"));

        let result: Result<()> = Err(Error::invalid_input("x"));
        assert!(result.with_context("outer").is_err());
    }
}
