//! Book enrichment module - fills in a partially entered book from the catalog.
//!
//! # Architecture
//!
//! - **Domain** (`domain.rs`) - Outcome and error types
//! - **Merge** (`merge.rs`) - The never-overwrite merge policy, pure and testable
//! - **Service** (`service.rs`) - Orchestrates title search and edition lookup
//!
//! The service only sees the catalog through [`crate::catalog::CatalogApi`],
//! so any catalog (or a mock) can be plugged in.
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::EnrichmentService;
//!
//! let service = EnrichmentService::new(OpenLibraryClient::new(&config.catalog)?);
//! let book = service.enrich(LocalBook::new("Dune")).await?;
//! println!("ISBN: {:?}, authors: {:?}", book.isbn, book.authors);
//! ```

pub mod domain;
mod merge;
pub mod service;

pub use domain::{EnrichmentError, EnrichmentOutcome, EnrichmentSource};
pub use service::{EnrichmentConfig, EnrichmentService};
