//! Test utilities and fixtures for reading-tracker tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{temp_store, sample_books};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (store, _dir) = temp_store().await;
//!     store.replace_all(sample_books()).await.unwrap();
//! }
//! ```

use tempfile::TempDir;

use crate::db::SqliteBookStore;
use crate::model::LocalBook;

/// Creates a SQLite book store in a temporary directory.
///
/// Keep the returned `TempDir` alive for the duration of the test; the
/// database is deleted when it is dropped.
pub async fn temp_store() -> (SqliteBookStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let store = SqliteBookStore::open(&db_url)
        .await
        .expect("Failed to initialize test database");

    (store, dir)
}

/// A small library spanning two years, one unread book included.
pub fn sample_books() -> Vec<LocalBook> {
    let read = |title: &str, author: &str, pages: u32, date: &str| LocalBook {
        author: Some(author.to_string()),
        pages: Some(pages),
        date_read: Some(date.to_string()),
        shelf: Some("read".to_string()),
        ..LocalBook::new(title)
    };

    vec![
        read("Dune", "Frank Herbert", 535, "2024/01/15"),
        read("Emma", "Jane Austen", 474, "2024/03/02"),
        read("Neuromancer", "William Gibson", 271, "2023/11/20"),
        read("Beloved", "Toni Morrison", 0, "2024/03/28"),
        LocalBook {
            author: Some("Ursula K. Le Guin".to_string()),
            shelf: Some("to-read".to_string()),
            ..LocalBook::new("The Dispossessed")
        },
    ]
}
