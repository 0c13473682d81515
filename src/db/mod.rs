//! Database module for book persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. Each book is kept
//! as its JSON form in a `data` column, so fields added to [`LocalBook`] (or
//! unknown fields carried in from imports) need no schema change. `title`,
//! `date_read` and `shelf` are copied into their own columns for ad-hoc
//! queries; listing order is applied after decoding (see [`listing_order`]).
//!
//! # Example
//!
//! ```ignore
//! use reading_tracker::db::SqliteBookStore;
//!
//! let store = SqliteBookStore::open("sqlite:library.db?mode=rwc").await?;
//! let id = store.put(None, LocalBook::new("Dune")).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::library::{BookStore, StoreError, listing_order};
use crate::model::{LocalBook, StoredBook};

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, switches the file to WAL mode and runs all
/// pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, StoreError> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// [`BookStore`] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Open (and create/migrate if needed) the database at `db_url`.
    pub async fn open(db_url: &str) -> Result<Self, StoreError> {
        let pool = init_db(db_url).await?;
        tracing::debug!("Opened book database {}", db_url);
        Ok(Self { pool })
    }
}

fn decode(id: i64, data: &str) -> Result<StoredBook, StoreError> {
    Ok(StoredBook {
        id,
        book: serde_json::from_str(data)?,
    })
}

async fn insert(
    executor: impl sqlx::SqliteExecutor<'_>,
    book: &LocalBook,
    now: &str,
) -> Result<i64, StoreError> {
    let data = serde_json::to_string(book)?;
    let result = sqlx::query(
        "INSERT INTO books (title, date_read, shelf, data, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&book.title)
    .bind(&book.date_read)
    .bind(&book.shelf)
    .bind(data)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn all(&self) -> Result<Vec<StoredBook>, StoreError> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, data FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        // Read dates are free-form text, so order them once parsed
        let mut books = rows
            .iter()
            .map(|(id, data)| decode(*id, data))
            .collect::<Result<Vec<_>, _>>()?;
        books.sort_by(listing_order);
        Ok(books)
    }

    async fn get(&self, id: i64) -> Result<Option<StoredBook>, StoreError> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT id, data FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(id, data)| decode(id, &data)).transpose()
    }

    async fn put(&self, id: Option<i64>, book: LocalBook) -> Result<i64, StoreError> {
        let now = Utc::now().to_rfc3339();

        let Some(id) = id else {
            return insert(&self.pool, &book, &now).await;
        };

        let data = serde_json::to_string(&book)?;
        let result = sqlx::query(
            "UPDATE books SET title = ?, date_read = ?, shelf = ?, data = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.date_read)
        .bind(&book.shelf)
        .bind(data)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(id)
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(&self, books: Vec<LocalBook>) -> Result<usize, StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM books").execute(&mut *tx).await?;
        for book in &books {
            insert(&mut *tx, book, &now).await?;
        }

        tx.commit().await?;
        tracing::info!("Replaced library with {} books", books.len());
        Ok(books.len())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn goal(&self, year: i32) -> Result<Option<u32>, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT book_target FROM goals WHERE year = ?")
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.and_then(|(target,)| u32::try_from(target).ok()))
    }

    async fn set_goal(&self, year: i32, target: u32) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO goals (year, book_target, created_at) VALUES (?, ?, ?)
             ON CONFLICT(year) DO UPDATE SET book_target = excluded.book_target",
        )
        .bind(year)
        .bind(i64::from(target))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_books, temp_store};

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite:{}", db_path.display());

        let store = SqliteBookStore::open(&db_url).await.expect("Failed to init db");
        assert!(db_path.exists());

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, _dir) = temp_store().await;
        let book = LocalBook {
            author: Some("Frank Herbert".to_string()),
            isbn: Some("9780441172719".to_string()),
            ..LocalBook::new("Dune")
        };

        let id = store.put(None, book.clone()).await.unwrap();
        assert!(id > 0);

        let stored = store.get(id).await.unwrap().expect("book should exist");
        assert_eq!(stored.id, id);
        assert_eq!(stored.book, book);

        assert!(store.get(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_fields_survive_storage() {
        let (store, _dir) = temp_store().await;
        let book: LocalBook =
            serde_json::from_str(r#"{"title": "Dune", "format": "hardcover"}"#).unwrap();

        let id = store.put(None, book).await.unwrap();
        let stored = store.get(id).await.unwrap().unwrap();

        assert_eq!(stored.book.extra["format"], "hardcover");
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let (store, _dir) = temp_store().await;
        let id = store.put(None, LocalBook::new("Draft")).await.unwrap();

        let same = store.put(Some(id), LocalBook::new("Final")).await.unwrap();
        assert_eq!(same, id);
        assert_eq!(store.get(id).await.unwrap().unwrap().book.title, "Final");
        assert_eq!(store.count().await.unwrap(), 1);

        let err = store.put(Some(9999), LocalBook::new("Ghost")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(9999)));
    }

    #[tokio::test]
    async fn test_all_orders_unpadded_dates_by_value() {
        let (store, _dir) = temp_store().await;
        let read_on = |title: &str, date: &str| LocalBook {
            date_read: Some(date.to_string()),
            ..LocalBook::new(title)
        };
        store
            .replace_all(vec![
                read_on("May", "2024/5/1"),
                read_on("Garbled", "sometime"),
                read_on("Dec", "2024/12/1"),
                read_on("Year only", "2023"),
            ])
            .await
            .unwrap();

        let titles: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.book.title)
            .collect();

        assert_eq!(titles, vec!["Dec", "May", "Year only", "Garbled"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _dir) = temp_store().await;
        let id = store.put(None, LocalBook::new("Gone")).await.unwrap();

        assert!(store.remove(id).await.unwrap());
        assert!(!store.remove(id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_all_orders_most_recent_first() {
        let (store, _dir) = temp_store().await;
        store.replace_all(sample_books()).await.unwrap();

        let dates: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.book.date_read)
            .collect();

        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
        assert_eq!(dates.last(), Some(&None));
    }

    #[tokio::test]
    async fn test_replace_all() {
        let (store, _dir) = temp_store().await;
        let old = store.put(None, LocalBook::new("Old")).await.unwrap();

        let count = store.replace_all(sample_books()).await.unwrap();

        assert_eq!(count, sample_books().len());
        assert_eq!(store.count().await.unwrap(), count);
        assert!(store.get(old).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_goals() {
        let (store, _dir) = temp_store().await;
        assert_eq!(store.goal(2025).await.unwrap(), None);

        store.set_goal(2025, 24).await.unwrap();
        store.set_goal(2025, 30).await.unwrap();

        assert_eq!(store.goal(2025).await.unwrap(), Some(30));
    }
}
