//! JSON import and export of book lists.
//!
//! Two input shapes are understood, possibly mixed in one file:
//! - this tool's own records (`{"title": ..., "author": ..., ...}`)
//! - Goodreads library exports converted to JSON (`{"Title": ..., "Number of Pages": ...}`),
//!   whose values are loosely typed (numbers, strings or `="..."` quoted ISBNs)
//!
//! Export always writes the native shape.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::StoreError;
use crate::catalog::{CoverKey, CoverSize, covers};
use crate::model::LocalBook;

/// Read a JSON array of books from `path`.
///
/// Goodreads rows without a title or author are skipped. Cover URLs derived
/// from a row's ISBN point at `covers_base`.
pub fn load_books(path: &Path, covers_base: &str) -> Result<Vec<LocalBook>, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(io_err(path))?;
    parse_books(&contents, covers_base)
}

/// Parse a JSON array of books (see [`load_books`]).
pub fn parse_books(json: &str, covers_base: &str) -> Result<Vec<LocalBook>, StoreError> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    let mut books = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        if is_goodreads_record(&record) {
            let row: GoodreadsRow = serde_json::from_value(record)?;
            match row.into_local_book(covers_base) {
                Some(book) => books.push(book),
                None => skipped += 1,
            }
        } else {
            books.push(serde_json::from_value(record)?);
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} rows without title or author", skipped);
    }
    Ok(books)
}

/// Write `books` to `path` as a pretty-printed JSON array.
///
/// The file is written to a temp file first and renamed into place.
pub fn save_books(path: &Path, books: &[LocalBook]) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(books)?;
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents).map_err(io_err(&temp_path))?;
    std::fs::rename(&temp_path, path).map_err(io_err(path))?;

    tracing::info!("Exported {} books to {:?}", books.len(), path);
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn is_goodreads_record(record: &Value) -> bool {
    record.get("Title").is_some() && record.get("title").is_none()
}

/// One row of a Goodreads export
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GoodreadsRow {
    #[serde(rename = "Title")]
    title: Value,
    #[serde(rename = "Author")]
    author: Value,
    #[serde(rename = "Additional Authors")]
    additional_authors: Value,
    #[serde(rename = "ISBN")]
    isbn: Value,
    #[serde(rename = "ISBN13")]
    isbn13: Value,
    #[serde(rename = "Publisher")]
    publisher: Value,
    #[serde(rename = "Number of Pages")]
    pages: Value,
    #[serde(rename = "Original Publication Year")]
    original_publication_year: Value,
    #[serde(rename = "Date Read")]
    date_read: Value,
    #[serde(rename = "Date Added")]
    date_added: Value,
    #[serde(rename = "Exclusive Shelf")]
    exclusive_shelf: Value,
    /// Older exports only have this one
    #[serde(rename = "Shelf")]
    shelf: Value,
    #[serde(rename = "My Rating")]
    rating: Value,
    #[serde(rename = "My Review")]
    review: Value,
    #[serde(rename = "CoverURL")]
    cover_url: Value,
}

impl GoodreadsRow {
    fn into_local_book(self, covers_base: &str) -> Option<LocalBook> {
        let title = loose_string(&self.title)?;
        let author = loose_string(&self.author)?;

        let isbn13 = loose_isbn(&self.isbn13);
        let isbn10 = loose_isbn(&self.isbn);
        let cover_url = loose_string(&self.cover_url).or_else(|| {
            isbn13
                .as_deref()
                .or(isbn10.as_deref())
                .map(|isbn| {
                    covers::book_cover_url(
                        covers_base,
                        CoverKey::Isbn,
                        isbn,
                        CoverSize::Medium,
                    )
                })
        });

        let authors = match loose_string(&self.additional_authors) {
            Some(extra) => std::iter::once(author.clone())
                .chain(extra.split(',').map(|a| a.trim().to_string()).filter(|a| !a.is_empty()))
                .collect(),
            None => Vec::new(),
        };

        Some(LocalBook {
            title,
            author: Some(author),
            authors,
            isbn: isbn13.clone().or(isbn10.clone()),
            publisher: loose_string(&self.publisher),
            first_publish_year: loose_int(&self.original_publication_year)
                .and_then(|y| i32::try_from(y).ok())
                .filter(|&y| y > 0),
            isbn_10: isbn10.into_iter().collect(),
            isbn_13: isbn13.into_iter().collect(),
            cover_url,
            pages: loose_int(&self.pages)
                .and_then(|p| u32::try_from(p).ok())
                .filter(|&p| p > 0),
            shelf: loose_string(&self.exclusive_shelf).or_else(|| loose_string(&self.shelf)),
            date_read: loose_string(&self.date_read),
            date_added: loose_string(&self.date_added),
            rating: loose_int(&self.rating)
                .and_then(|r| u8::try_from(r).ok())
                .filter(|&r| r > 0),
            notes: loose_string(&self.review),
            ..Default::default()
        })
    }
}

/// Non-empty string form of a string or number
fn loose_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn loose_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// ISBN with Goodreads' `="..."` spreadsheet quoting removed; "0" means none
fn loose_isbn(value: &Value) -> Option<String> {
    let raw = loose_string(value)?;
    let isbn = raw
        .trim_start_matches('=')
        .trim_matches('"')
        .trim()
        .to_string();
    (!isbn.is_empty() && isbn != "0").then_some(isbn)
}
