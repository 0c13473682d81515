//! The user's book collection.
//!
//! Storage sits behind the [`BookStore`] trait so the CLI and assistant can
//! run against SQLite ([`crate::db::SqliteBookStore`]) or memory
//! ([`InMemoryBookStore`]) alike. Also home to JSON import/export and the
//! reading statistics.

pub mod import;
mod memory;
pub mod stats;

use async_trait::async_trait;

use crate::model::{LocalBook, StoredBook};

pub use memory::InMemoryBookStore;

/// Errors from a book store or import file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Malformed book record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No book with id {0}")]
    NotFound(i64),
}

/// Persistent collection of books.
///
/// Listing order is most recently read first; books without a read date
/// come last, in insertion order.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every stored book
    async fn all(&self) -> Result<Vec<StoredBook>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<StoredBook>, StoreError>;

    /// Insert (`id = None`) or replace an existing book. Returns the book's id.
    ///
    /// Replacing an id that does not exist is [`StoreError::NotFound`].
    async fn put(&self, id: Option<i64>, book: LocalBook) -> Result<i64, StoreError>;

    /// Delete a book. Returns false if there was nothing to delete.
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;

    /// Swap the whole collection for `books`. Returns the new count.
    async fn replace_all(&self, books: Vec<LocalBook>) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Yearly reading goal (number of books), if one is set
    async fn goal(&self, year: i32) -> Result<Option<u32>, StoreError>;

    async fn set_goal(&self, year: i32, target: u32) -> Result<(), StoreError>;
}

/// Order used by every store when listing.
///
/// Compares parsed read dates, so `2024/5/1` comes after `2024/12/1`. Books
/// with a missing or unparseable date sort last.
pub(crate) fn listing_order(a: &StoredBook, b: &StoredBook) -> std::cmp::Ordering {
    let date_a = stats::read_date(&a.book);
    let date_b = stats::read_date(&b.book);
    // Option orders None first, so the reversed compare puts undated books last
    date_b.cmp(&date_a).then(a.id.cmp(&b.id))
}
