//! Open Library API Data Transfer Objects
//!
//! These types match what the Open Library endpoints return.
//! DO NOT use these types outside the catalog module - convert to domain types.
//!
//! API Reference: https://openlibrary.org/developers/api
//!
//! Endpoints covered:
//! - `/search.json` (title search)
//! - `/search/authors.json` (author search)
//! - `/api/volumes/brief/{type}/{value}.json` (identifier lookup)
//! - `/authors/{key}.json` (author record)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title search response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// A single work returned by title search
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchDoc {
    /// Work key, e.g. "/works/OL893415W"
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub first_publish_year: Option<i32>,
    pub edition_count: Option<u32>,
    /// Internal cover id
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub isbn: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
}

/// Author search response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorSearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<AuthorDoc>,
}

/// A single author returned by author search
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorDoc {
    /// Bare key, e.g. "OL23919A"
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub top_work: Option<String>,
    pub work_count: Option<u32>,
    #[serde(default)]
    pub top_subjects: Vec<String>,
}

/// Identifier lookup response
///
/// `records` is keyed by an opaque record path. Order matters: the first
/// record is the one we use, which is why serde_json runs with `preserve_order`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub records: serde_json::Map<String, serde_json::Value>,
}

/// One record inside `records`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumeRecord {
    pub data: VolumeData,
}

/// The `data` block of a volume record (same shape as `jscmd=data`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VolumeData {
    pub title: Option<String>,
    /// Edition path, e.g. "/books/OL7353617M"
    pub key: Option<String>,
    /// Human-facing edition page
    pub url: Option<String>,
    #[serde(default)]
    pub authors: Vec<NamedRef>,
    #[serde(default)]
    pub publishers: Vec<NamedRef>,
    pub publish_date: Option<String>,
    pub number_of_pages: Option<u32>,
    #[serde(default)]
    pub identifiers: Identifiers,
    pub cover: Option<Cover>,
    #[serde(default)]
    pub ebooks: Vec<Ebook>,
}

/// `{name, url}` pair used for authors and publishers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
    pub url: Option<String>,
}

/// Identifier sets on a volume
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Identifiers {
    #[serde(default)]
    pub isbn_10: Vec<String>,
    #[serde(default)]
    pub isbn_13: Vec<String>,
    #[serde(default)]
    pub lccn: Vec<String>,
    #[serde(default)]
    pub oclc: Vec<String>,
    #[serde(default)]
    pub openlibrary: Vec<String>,
}

/// Cover URLs on a volume
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Cover {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

/// Readable/borrowable edition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Ebook {
    pub preview_url: Option<String>,
    pub availability: Option<String>,
}

/// Author record from `/authors/{key}.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthorResponse {
    /// Full path, e.g. "/authors/OL23919A"
    #[serde(default)]
    pub key: String,
    pub name: Option<String>,
    pub personal_name: Option<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub bio: Option<Bio>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub photos: Vec<i64>,
    #[serde(default)]
    pub remote_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Author bio: older records use a bare string, newer ones a typed text block
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bio {
    Plain(String),
    Typed(TypedText),
}

/// `{"type": "/type/text", "value": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TypedText {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: String,
}

/// Link on an author record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Link {
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "numFound": 1,
            "start": 0,
            "docs": [{
                "key": "/works/OL893415W",
                "title": "Dune",
                "author_name": ["Frank Herbert"],
                "first_publish_year": 1965,
                "edition_count": 97,
                "cover_i": 11481354,
                "isbn": ["9780441172719", "0441172717"],
                "publisher": ["Ace"],
                "language": ["eng"],
                "subject": ["Science fiction"]
            }]
        }"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse search response");

        assert_eq!(response.num_found, 1);
        let doc = &response.docs[0];
        assert_eq!(doc.key, "/works/OL893415W");
        assert_eq!(doc.author_name, vec!["Frank Herbert"]);
        assert_eq!(doc.cover_i, Some(11481354));
        assert_eq!(doc.edition_count, Some(97));
    }

    #[test]
    fn test_parse_sparse_search_doc() {
        let json = r#"{"docs": [{"key": "/works/OL1W", "title": "Untitled"}]}"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse sparse doc");

        let doc = &response.docs[0];
        assert!(doc.author_name.is_empty());
        assert!(doc.isbn.is_empty());
        assert!(doc.first_publish_year.is_none());
        assert!(doc.cover_i.is_none());
    }

    #[test]
    fn test_parse_author_search_response() {
        let json = r#"{
            "numFound": 1,
            "docs": [{
                "key": "OL79034A",
                "name": "Frank Herbert",
                "alternate_names": ["Franklin Patrick Herbert"],
                "birth_date": "8 October 1920",
                "death_date": "11 February 1986",
                "top_work": "Dune",
                "work_count": 233,
                "top_subjects": ["Science fiction", "Fiction"]
            }]
        }"#;

        let response: AuthorSearchResponse =
            serde_json::from_str(json).expect("Should parse author search");

        let doc = &response.docs[0];
        assert_eq!(doc.key, "OL79034A");
        assert_eq!(doc.work_count, Some(233));
        assert_eq!(doc.top_subjects.len(), 2);
    }

    #[test]
    fn test_parse_volume_record() {
        let json = r#"{
            "data": {
                "url": "https://openlibrary.org/books/OL7353617M/Dune",
                "key": "/books/OL7353617M",
                "title": "Dune",
                "authors": [{"url": "https://openlibrary.org/authors/OL79034A", "name": "Frank Herbert"}],
                "number_of_pages": 528,
                "identifiers": {"isbn_13": ["9780441172719"], "openlibrary": ["OL7353617M"]},
                "publishers": [{"name": "Ace"}],
                "publish_date": "1990",
                "cover": {"small": "s.jpg", "medium": "m.jpg", "large": "l.jpg"},
                "ebooks": [{"preview_url": "https://archive.org/details/dune", "availability": "borrow"}]
            }
        }"#;

        let record: VolumeRecord = serde_json::from_str(json).expect("Should parse record");

        assert_eq!(record.data.title.as_deref(), Some("Dune"));
        assert_eq!(record.data.authors[0].name, "Frank Herbert");
        assert_eq!(record.data.identifiers.isbn_13, vec!["9780441172719"]);
        assert!(record.data.identifiers.lccn.is_empty());
        assert_eq!(record.data.number_of_pages, Some(528));
    }

    #[test]
    fn test_parse_empty_records() {
        let json = r#"{"records": {}, "items": []}"#;
        let response: VolumesResponse = serde_json::from_str(json).unwrap();
        assert!(response.records.is_empty());

        // Unknown identifiers come back as a bare empty object
        let response: VolumesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.records.is_empty());
    }

    #[test]
    fn test_parse_author_with_plain_bio() {
        let json = r#"{"key": "/authors/OL1A", "name": "A", "bio": "Plain text"}"#;
        let author: AuthorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(author.bio, Some(Bio::Plain("Plain text".to_string())));
    }

    #[test]
    fn test_parse_author_with_typed_bio() {
        let json = r#"{
            "key": "/authors/OL23919A",
            "name": "J. K. Rowling",
            "personal_name": "Joanne Rowling",
            "bio": {"type": "/type/text", "value": "British author"},
            "photos": [5543033, -1],
            "remote_ids": {"viaf": "116796842", "wikidata": "Q34660"},
            "links": [{"title": "Official Site", "url": "https://jkrowling.com", "type": {"key": "/type/link"}}]
        }"#;

        let author: AuthorResponse = serde_json::from_str(json).expect("Should parse author");

        match author.bio {
            Some(Bio::Typed(ref text)) => assert_eq!(text.value, "British author"),
            other => panic!("Expected typed bio, got {:?}", other),
        }
        assert_eq!(author.photos, vec![5543033, -1]);
        assert_eq!(author.remote_ids.get("wikidata").map(String::as_str), Some("Q34660"));
        assert_eq!(author.links[0].url, "https://jkrowling.com");
    }
}
