//! Open Library HTTP client
//!
//! Handles communication with the Open Library web service.
//! See: https://openlibrary.org/developers/api
//!
//! Open Library asks integrators to send a descriptive User-Agent. The client
//! carries no state beyond its configuration, so one instance can be cloned
//! and shared between concurrent callers.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::domain::{
    CatalogAuthorDetail, CatalogAuthorSummary, CatalogBookDetail, CatalogBookSummary,
    CatalogError, CoverKey, CoverSize, IdType,
};
use super::{adapter, covers, dto};
use crate::config::CatalogConfig;

/// Open Library API client
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    /// Create a client from catalog settings
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for testing with custom base URLs
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let config = CatalogConfig {
            base_url: base_url.into(),
            timeout_secs: 2,
            ..Default::default()
        };
        Self::new(&config).expect("test client")
    }

    /// Search works by title. No hits is an empty vec, not an error.
    pub async fn search_by_title(
        &self,
        title: &str,
        limit: usize,
    ) -> Result<Vec<CatalogBookSummary>, CatalogError> {
        let url = format!("{}/search.json", self.base_url);
        let limit = limit.to_string();
        let response: dto::SearchResponse = self
            .get_json(&url, &[("title", title), ("limit", &limit)])
            .await?
            .ok_or_else(|| CatalogError::Unavailable(format!("HTTP 404 for {}", url)))?;

        tracing::debug!(title, hits = response.docs.len(), "Title search complete");
        Ok(adapter::to_book_summaries(response, &self.covers_url))
    }

    /// Search authors by name. No hits is an empty vec, not an error.
    pub async fn search_authors_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<CatalogAuthorSummary>, CatalogError> {
        let url = format!("{}/search/authors.json", self.base_url);
        let response: dto::AuthorSearchResponse = self
            .get_json(&url, &[("q", name)])
            .await?
            .ok_or_else(|| CatalogError::Unavailable(format!("HTTP 404 for {}", url)))?;

        tracing::debug!(name, hits = response.docs.len(), "Author search complete");
        Ok(adapter::to_author_summaries(response))
    }

    /// Fetch one edition by a typed identifier.
    ///
    /// Returns `Ok(None)` when the catalog has no such record, whether it says
    /// so with a 404 or with an empty `records` object.
    pub async fn get_book_by_identifier(
        &self,
        id_type: IdType,
        id_value: &str,
    ) -> Result<Option<CatalogBookDetail>, CatalogError> {
        let url = format!(
            "{}/api/volumes/brief/{}/{}.json",
            self.base_url,
            id_type,
            urlencoding::encode(id_value)
        );

        match self.get_json::<dto::VolumesResponse>(&url, &[]).await? {
            Some(response) => adapter::to_book_detail(response),
            None => Ok(None),
        }
    }

    /// Fetch an author record by key (e.g. "OL23919A").
    ///
    /// The key is passed through as-is; shape validation is the caller's job.
    pub async fn get_author_detail(
        &self,
        author_key: &str,
    ) -> Result<Option<CatalogAuthorDetail>, CatalogError> {
        let url = format!(
            "{}/authors/{}.json",
            self.base_url,
            urlencoding::encode(author_key)
        );

        Ok(self
            .get_json::<dto::AuthorResponse>(&url, &[])
            .await?
            .map(adapter::to_author_detail))
    }

    /// Cover image URL for a book. Pure, no request is made.
    pub fn cover_image_url(&self, key: CoverKey, value: &str, size: CoverSize) -> String {
        covers::book_cover_url(&self.covers_url, key, value, size)
    }

    /// Author photo URL. Pure, no request is made.
    pub fn author_photo_url(&self, author_key: &str) -> String {
        covers::author_photo_url(&self.covers_url, author_key)
    }

    /// GET a JSON document. 404 maps to `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        tracing::debug!(url, "Catalog request");

        let mut request = self.http_client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Unavailable(format!(
                "HTTP {}: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}
