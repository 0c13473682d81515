use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{BookStore, StoreError, listing_order};
use crate::model::{LocalBook, StoredBook};

#[derive(Debug, Default)]
struct Inner {
    books: Vec<StoredBook>,
    goals: BTreeMap<i32, u32>,
    next_id: i64,
}

/// Book store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `books`, ids assigned from 1.
    pub fn with_books(books: impl IntoIterator<Item = LocalBook>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for book in books {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.books.push(StoredBook { id, book });
            }
        }
        store
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn all(&self) -> Result<Vec<StoredBook>, StoreError> {
        let mut books = self.inner.read().books.clone();
        books.sort_by(listing_order);
        Ok(books)
    }

    async fn get(&self, id: i64) -> Result<Option<StoredBook>, StoreError> {
        Ok(self.inner.read().books.iter().find(|b| b.id == id).cloned())
    }

    async fn put(&self, id: Option<i64>, book: LocalBook) -> Result<i64, StoreError> {
        let mut inner = self.inner.write();
        match id {
            Some(id) => {
                let slot = inner
                    .books
                    .iter_mut()
                    .find(|b| b.id == id)
                    .ok_or(StoreError::NotFound(id))?;
                slot.book = book;
                Ok(id)
            }
            None => {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.books.push(StoredBook { id, book });
                Ok(id)
            }
        }
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let before = inner.books.len();
        inner.books.retain(|b| b.id != id);
        Ok(inner.books.len() != before)
    }

    async fn replace_all(&self, books: Vec<LocalBook>) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        inner.books.clear();
        for book in books {
            inner.next_id += 1;
            let id = inner.next_id;
            inner.books.push(StoredBook { id, book });
        }
        Ok(inner.books.len())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().books.len())
    }

    async fn goal(&self, year: i32) -> Result<Option<u32>, StoreError> {
        Ok(self.inner.read().goals.get(&year).copied())
    }

    async fn set_goal(&self, year: i32, target: u32) -> Result<(), StoreError> {
        self.inner.write().goals.insert(year, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_on(title: &str, date: Option<&str>) -> LocalBook {
        LocalBook {
            date_read: date.map(str::to_string),
            ..LocalBook::new(title)
        }
    }

    #[tokio::test]
    async fn test_put_assigns_increasing_ids() {
        let store = InMemoryBookStore::new();

        let a = store.put(None, LocalBook::new("A")).await.unwrap();
        let b = store.put(None, LocalBook::new("B")).await.unwrap();

        assert!(b > a);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = InMemoryBookStore::with_books([LocalBook::new("Old")]);

        let id = store.put(Some(1), LocalBook::new("New")).await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(store.get(1).await.unwrap().unwrap().book.title, "New");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_unknown_id_fails() {
        let store = InMemoryBookStore::new();

        let err = store.put(Some(42), LocalBook::new("X")).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryBookStore::with_books([LocalBook::new("A")]);

        assert!(store.remove(1).await.unwrap());
        assert!(!store.remove(1).await.unwrap());
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_all_orders_by_date_read() {
        let store = InMemoryBookStore::with_books([
            read_on("Unread", None),
            read_on("Old", Some("2021/03/01")),
            read_on("New", Some("2024/01/15")),
        ]);

        let titles: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.book.title)
            .collect();

        assert_eq!(titles, vec!["New", "Old", "Unread"]);
    }

    #[tokio::test]
    async fn test_all_compares_parsed_dates() {
        let store = InMemoryBookStore::with_books([
            read_on("May", Some("2024/5/1")),
            read_on("Dec", Some("2024/12/1")),
            read_on("Bad", Some("not a date")),
            read_on("Dec again", Some("2024/12/01")),
        ]);

        let titles: Vec<_> = store
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.book.title)
            .collect();

        assert_eq!(titles, vec!["Dec", "Dec again", "May", "Bad"]);
    }

    #[tokio::test]
    async fn test_replace_all_does_not_reuse_ids() {
        let store = InMemoryBookStore::with_books([LocalBook::new("A"), LocalBook::new("B")]);

        let count = store.replace_all(vec![LocalBook::new("C")]).await.unwrap();

        assert_eq!(count, 1);
        let all = store.all().await.unwrap();
        assert_eq!(all[0].id, 3);
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_goals() {
        let store = InMemoryBookStore::new();
        assert_eq!(store.goal(2024).await.unwrap(), None);

        store.set_goal(2024, 24).await.unwrap();
        store.set_goal(2024, 30).await.unwrap();

        assert_eq!(store.goal(2024).await.unwrap(), Some(30));
        assert_eq!(store.goal(2025).await.unwrap(), None);
    }
}
