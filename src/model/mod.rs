//! Core data models for the reading library.
//!
//! Defines [`LocalBook`], the caller-owned book record that the enrichment
//! engine fills in and the stores persist, and [`StoredBook`], a book with its
//! store-assigned id.
//!
//! # Serialization
//!
//! Field names follow the JSON the dashboard front end already speaks
//! (`open_library_work_key`, `cover_url`, ...). Unknown fields land in
//! [`LocalBook::extra`] and are written back untouched, so records created by
//! other tools survive a load/save cycle.

use serde::{Deserialize, Serialize};

/// A book as the user entered it, possibly enriched with catalog data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalBook {
    /// Title (required for enrichment)
    #[serde(default)]
    pub title: String,
    /// Single author as typed by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Author list, usually from an identifier lookup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    // Filled from the title search
    #[serde(
        rename = "open_library_work_key",
        alias = "work_key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub work_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    // Filled from the identifier lookup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publishers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isbn_10: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isbn_13: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lccn: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oclc: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub olid: Vec<String>,
    #[serde(
        rename = "open_library_edition_key",
        alias = "edition_key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub edition_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,

    // Reading log
    /// Page count as entered by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    /// "read", "currently-reading", "to-read", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf: Option<String>,
    /// YYYY/MM/DD, YYYY/MM or YYYY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Any other fields the caller set
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LocalBook {
    /// A book with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Authors for display: the user's own entry wins over the looked-up list.
    pub fn display_authors(&self) -> String {
        match self.author.as_deref().map(str::trim) {
            Some(author) if !author.is_empty() => author.to_string(),
            _ => self.authors.join(", "),
        }
    }

    /// Effective page count: the user's figure, else the catalog's.
    pub fn page_count(&self) -> Option<u32> {
        self.pages.or(self.number_of_pages)
    }
}

/// A book with its store id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredBook {
    pub id: i64,
    #[serde(flatten)]
    pub book: LocalBook,
}

impl AsRef<LocalBook> for LocalBook {
    fn as_ref(&self) -> &LocalBook {
        self
    }
}

impl AsRef<LocalBook> for StoredBook {
    fn as_ref(&self) -> &LocalBook {
        &self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_roundtrip() {
        let book: LocalBook = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert_eq!(book, LocalBook::new("Dune"));

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Dune"}));
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let json = r#"{"title": "Dune", "format": "paperback", "loaned_to": {"name": "Sam"}}"#;

        let book: LocalBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.extra.get("format"), Some(&serde_json::json!("paperback")));

        let back = serde_json::to_value(&book).unwrap();
        assert_eq!(back["loaned_to"]["name"], "Sam");
    }

    #[test]
    fn test_front_end_key_names() {
        let book = LocalBook {
            work_key: Some("/works/OL1W".to_string()),
            edition_key: Some("/books/OL1M".to_string()),
            ..LocalBook::new("X")
        };

        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["open_library_work_key"], "/works/OL1W");
        assert_eq!(json["open_library_edition_key"], "/books/OL1M");
    }

    #[test]
    fn test_display_authors_prefers_user_entry() {
        let book = LocalBook {
            author: Some("Me".to_string()),
            authors: vec!["A".to_string(), "B".to_string()],
            ..LocalBook::new("X")
        };
        assert_eq!(book.display_authors(), "Me");

        let book = LocalBook {
            author: Some("  ".to_string()),
            ..book
        };
        assert_eq!(book.display_authors(), "A, B");
    }

    #[test]
    fn test_stored_book_flattens() {
        let stored = StoredBook {
            id: 7,
            book: LocalBook::new("Dune"),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "title": "Dune"}));
    }
}
