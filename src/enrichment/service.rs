//! Enrichment service - fills the gaps in a local book from the catalog
//!
//! The flow for a single book:
//! 1. Validate the title
//! 2. Search the catalog by title and fold in the best hit
//! 3. If an ISBN is known by now, fetch that edition and fold it in
//!
//! Catalog failures at steps 2 and 3 are logged and skipped. The caller always
//! gets a record back unless the input itself is unusable.

use std::time::Duration;

use crate::catalog::{CatalogApi, IdType, OpenLibraryClient};
use crate::enrichment::{
    domain::{EnrichmentError, EnrichmentOutcome, EnrichmentSource},
    merge::{self, Blank},
};
use crate::model::LocalBook;

/// Shortest ISBN worth a lookup (ISBN-10)
const MIN_ISBN_LEN: usize = 10;

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// How many title-search hits to request (only the first is used)
    pub search_limit: usize,
    /// Whether to fetch the edition record once an ISBN is known
    pub lookup_identifiers: bool,
    /// Pause between books in [`EnrichmentService::enrich_many`]
    pub batch_delay: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            search_limit: 10,
            lookup_identifiers: true,
            batch_delay: Duration::from_millis(100),
        }
    }
}

/// Service for enriching local books from the catalog
pub struct EnrichmentService<C: CatalogApi = OpenLibraryClient> {
    config: EnrichmentConfig,
    catalog: C,
}

impl<C: CatalogApi> EnrichmentService<C> {
    /// Create a service with default settings
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, EnrichmentConfig::default())
    }

    pub fn with_config(catalog: C, config: EnrichmentConfig) -> Self {
        Self { config, catalog }
    }

    /// The catalog this service talks to
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Enrich a book, keeping every field the caller supplied.
    ///
    /// Fails only with [`EnrichmentError::InvalidInput`] for a blank title.
    pub async fn enrich(&self, book: LocalBook) -> Result<LocalBook, EnrichmentError> {
        self.enrich_with_sources(book).await.map(|outcome| outcome.book)
    }

    /// Like [`enrich`](Self::enrich), but also reports which catalog steps
    /// contributed.
    pub async fn enrich_with_sources(
        &self,
        original: LocalBook,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let title = original.title.trim();
        if title.is_empty() {
            return Err(EnrichmentError::InvalidInput(
                "title is required".to_string(),
            ));
        }

        let mut book = original.clone();
        let mut sources = Vec::new();

        // Step 1: Title search
        match self.catalog.search_by_title(title, self.config.search_limit).await {
            Ok(hits) => match hits.first() {
                Some(hit) => {
                    tracing::debug!("Title search for '{}' matched {}", title, hit.work_key);
                    merge::apply_search_hit(&mut book, hit);
                    sources.push(EnrichmentSource::TitleSearch);
                }
                None => tracing::debug!("No catalog match for '{}'", title),
            },
            Err(e) => {
                // Keep going - the ISBN may still be known
                tracing::warn!("Catalog search failed for '{}': {}", title, e);
            }
        }

        // Step 2: Edition lookup by ISBN
        let isbn = book
            .isbn
            .as_deref()
            .map(str::trim)
            .filter(|isbn| isbn.chars().count() >= MIN_ISBN_LEN)
            .map(str::to_string);

        if self.config.lookup_identifiers
            && let Some(isbn) = isbn
        {
            match self.catalog.get_book_by_identifier(IdType::Isbn, &isbn).await {
                Ok(Some(detail)) => {
                    merge::apply_detail(&mut book, &original, &detail);
                    sources.push(EnrichmentSource::IdentifierLookup);
                }
                Ok(None) => tracing::debug!("No edition found for ISBN {}", isbn),
                Err(e) => {
                    tracing::warn!("Edition lookup failed for ISBN {}: {}", isbn, e);
                }
            }
        }

        debug_assert!(original.isbn.is_blank() || book.isbn == original.isbn);

        Ok(EnrichmentOutcome { book, sources })
    }

    /// Enrich several books one after another.
    ///
    /// Returns results in input order.
    pub async fn enrich_many(
        &self,
        books: Vec<LocalBook>,
    ) -> Vec<Result<EnrichmentOutcome, EnrichmentError>> {
        let total = books.len();
        let mut results = Vec::with_capacity(total);

        for (i, book) in books.into_iter().enumerate() {
            results.push(self.enrich_with_sources(book).await);

            if (i + 1) % 10 == 0 {
                tracing::info!("Enriched {}/{} books", i + 1, total);
            }

            // Be polite to the public catalog
            if i + 1 < total && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        results
    }
}
