//! Bibliographic catalog module - looks up books and authors on Open Library.
//!
//! # Architecture
//!
//! Same split as the other external integrations:
//! - **Domain models** (`domain.rs`) - The stable shapes the rest of the app sees
//! - **API DTOs** (`dto.rs`) - Exact Open Library response shapes
//! - **Adapter** (`adapter.rs`) - Converts DTOs to domain models, applies list caps
//! - **Client** (`client.rs`) - HTTP client for the catalog
//! - **Covers** (`covers.rs`) - Pure cover/photo URL construction
//! - **Traits** (`traits.rs`) - [`CatalogApi`] seam for mocking
//!
//! # Usage
//!
//! ```ignore
//! use catalog::{OpenLibraryClient, IdType};
//!
//! let client = OpenLibraryClient::new(&config.catalog)?;
//! let hits = client.search_by_title("Dune", 10).await?;
//! let edition = client.get_book_by_identifier(IdType::Isbn, "9780441172719").await?;
//! ```

pub mod domain;
pub mod dto;
mod adapter;
mod client;
pub mod covers;
pub mod traits;

pub use client::OpenLibraryClient;
pub use domain::{
    AuthorLink, CatalogAuthorDetail, CatalogAuthorSummary, CatalogBookDetail,
    CatalogBookSummary, CatalogError, CoverKey, CoverSize, IdType, is_valid_author_key,
};
pub use traits::CatalogApi;
