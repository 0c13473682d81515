//! Enrichment results and errors.

use serde::Serialize;

use crate::model::LocalBook;

/// Which catalog step contributed data to an enriched book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
    /// Best hit of the title search
    TitleSearch,
    /// Edition record fetched by ISBN
    IdentifierLookup,
}

/// An enriched book plus what went into it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentOutcome {
    pub book: LocalBook,
    /// Empty when the catalog had nothing (or was unreachable)
    pub sources: Vec<EnrichmentSource>,
}

impl EnrichmentOutcome {
    /// True if any catalog data made it into the book
    pub fn is_enriched(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Errors that can occur during enrichment.
///
/// Catalog failures never show up here: the engine absorbs them and returns
/// the best record it could build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
