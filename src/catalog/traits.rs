//! Trait definition for the catalog.
//!
//! The enrichment engine is written against [`CatalogApi`] so tests can swap
//! in a mock instead of talking to Open Library.

use async_trait::async_trait;

use super::client::OpenLibraryClient;
use super::domain::{
    CatalogAuthorDetail, CatalogAuthorSummary, CatalogBookDetail, CatalogBookSummary,
    CatalogError, IdType,
};

/// Catalog lookups.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search works by title, best match first.
    async fn search_by_title(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<CatalogBookSummary>, CatalogError>;

    /// Search authors by name.
    async fn search_authors_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<CatalogAuthorSummary>, CatalogError>;

    /// Fetch a single edition. `Ok(None)` means no such record.
    async fn get_book_by_identifier(
        &self,
        id_type: IdType,
        id_value: &str,
    ) -> Result<Option<CatalogBookDetail>, CatalogError>;

    /// Fetch an author record. `Ok(None)` means no such author.
    async fn get_author_detail(
        &self,
        author_key: &str,
    ) -> Result<Option<CatalogAuthorDetail>, CatalogError>;
}

#[async_trait]
impl CatalogApi for OpenLibraryClient {
    async fn search_by_title(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<CatalogBookSummary>, CatalogError> {
        self.search_by_title(title, limit).await
    }

    async fn search_authors_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<CatalogAuthorSummary>, CatalogError> {
        self.search_authors_by_name(name).await
    }

    async fn get_book_by_identifier(
        &self,
        id_type: IdType,
        id_value: &str,
    ) -> Result<Option<CatalogBookDetail>, CatalogError> {
        self.get_book_by_identifier(id_type, id_value).await
    }

    async fn get_author_detail(
        &self,
        author_key: &str,
    ) -> Result<Option<CatalogAuthorDetail>, CatalogError> {
        self.get_author_detail(author_key).await
    }
}
