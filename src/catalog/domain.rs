//! Internal catalog models.
//!
//! These are OUR types - they don't change when the Open Library response
//! shapes change. Every upstream payload is converted into one of these by
//! the adapter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of ISBNs kept on a search hit
pub const MAX_SUMMARY_ISBNS: usize = 3;
/// Maximum number of publishers kept on a search hit
pub const MAX_SUMMARY_PUBLISHERS: usize = 3;
/// Maximum number of subjects kept on a search hit
pub const MAX_SUMMARY_SUBJECTS: usize = 5;

/// A title-search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBookSummary {
    pub title: String,
    /// Author display names, upstream order
    pub authors: Vec<String>,
    pub first_publish_year: Option<i32>,
    /// Work key, e.g. "/works/OL893415W"
    pub work_key: String,
    pub edition_count: u32,
    pub cover_url: Option<String>,
    pub isbns: Vec<String>,
    pub publishers: Vec<String>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
}

/// An author-search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogAuthorSummary {
    pub key: String,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub top_work: Option<String>,
    pub work_count: u32,
    pub top_subjects: Vec<String>,
}

/// A single edition fetched by identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBookDetail {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publishers: Vec<String>,
    pub publish_date: Option<String>,
    pub number_of_pages: Option<u32>,
    pub isbn_10: Vec<String>,
    pub isbn_13: Vec<String>,
    pub lccn: Vec<String>,
    pub oclc: Vec<String>,
    pub olid: Vec<String>,
    pub edition_key: Option<String>,
    pub cover_url: Option<String>,
    pub info_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Full author record fetched by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogAuthorDetail {
    pub name: Option<String>,
    pub personal_name: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    /// Always plain text, whatever shape upstream used
    pub bio: Option<String>,
    pub alternate_names: Vec<String>,
    /// Cover service photo ids
    pub photos: Vec<i64>,
    pub key: String,
    /// Provider name -> id (wikidata, viaf, goodreads, ...)
    pub remote_ids: BTreeMap<String, String>,
    pub links: Vec<AuthorLink>,
}

/// External link attached to an author record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorLink {
    pub title: Option<String>,
    pub url: String,
}

/// Identifier kinds accepted by the volume lookup endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    Isbn,
    Lccn,
    Oclc,
    Olid,
}

impl IdType {
    /// Path segment used by the catalog
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Isbn => "isbn",
            IdType::Lccn => "lccn",
            IdType::Oclc => "oclc",
            IdType::Olid => "olid",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdType {
    type Err = ParseKindError;

    /// Case-insensitive, so "ISBN" and "isbn" both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isbn" => Ok(IdType::Isbn),
            "lccn" => Ok(IdType::Lccn),
            "oclc" => Ok(IdType::Oclc),
            "olid" => Ok(IdType::Olid),
            _ => Err(ParseKindError {
                input: s.to_string(),
                expected: "isbn, lccn, oclc, olid",
            }),
        }
    }
}

/// Identifier kinds accepted by the cover service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverKey {
    Isbn,
    Oclc,
    Lccn,
    Olid,
    /// Internal cover id (the `cover_i` of a search hit)
    Id,
}

impl CoverKey {
    /// Upper-case token as users and upstream docs spell it
    pub fn token(&self) -> &'static str {
        match self {
            CoverKey::Isbn => "ISBN",
            CoverKey::Oclc => "OCLC",
            CoverKey::Lccn => "LCCN",
            CoverKey::Olid => "OLID",
            CoverKey::Id => "ID",
        }
    }
}

impl FromStr for CoverKey {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ISBN" => Ok(CoverKey::Isbn),
            "OCLC" => Ok(CoverKey::Oclc),
            "LCCN" => Ok(CoverKey::Lccn),
            "OLID" => Ok(CoverKey::Olid),
            "ID" => Ok(CoverKey::Id),
            _ => Err(ParseKindError {
                input: s.to_string(),
                expected: "ISBN, OCLC, LCCN, OLID, ID",
            }),
        }
    }
}

/// Cover image size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl CoverSize {
    /// Single-letter suffix used in cover URLs
    pub fn suffix(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

impl FromStr for CoverSize {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(CoverSize::Small),
            "M" => Ok(CoverSize::Medium),
            "L" => Ok(CoverSize::Large),
            _ => Err(ParseKindError {
                input: s.to_string(),
                expected: "S, M, L",
            }),
        }
    }
}

/// Unrecognised identifier kind or size token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not one of: {expected}")]
pub struct ParseKindError {
    pub input: String,
    pub expected: &'static str,
}

/// Errors talking to the catalog.
///
/// "No such record" is not an error: lookups return `Ok(None)` for that.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Transport failure: DNS, timeout, connection reset, non-success status
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog answered but the body could not be decoded
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Check an author key has the catalog's shape (`OL<digits>A`).
///
/// The client itself accepts any key; this is for callers that want to
/// reject obvious typos before making a request.
pub fn is_valid_author_key(key: &str) -> bool {
    let Some(digits) = key.strip_prefix("OL").and_then(|k| k.strip_suffix('A')) else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
