//! Merge policy for folding catalog data into a [`LocalBook`].
//!
//! One rule governs everything here: a field the caller supplied (present and
//! non-blank on the original input) is never replaced.

use crate::catalog::{CatalogBookDetail, CatalogBookSummary};
use crate::model::LocalBook;

/// "Absent or empty" for the field types a [`LocalBook`] carries
pub(crate) trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for Option<String> {
    fn is_blank(&self) -> bool {
        self.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

impl Blank for Option<u32> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl Blank for Option<i32> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl Blank for Vec<String> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Set `slot` to `value` if `slot` is blank and `value` is not.
fn fill<T: Blank>(slot: &mut T, value: T) {
    if slot.is_blank() && !value.is_blank() {
        *slot = value;
    }
}

/// Set `slot` to `value` unless the caller supplied the field.
///
/// Unlike [`fill`], this replaces data an earlier enrichment step wrote.
fn overlay<T: Blank + Clone>(slot: &mut T, original: &T, value: &T) {
    if original.is_blank() && !value.is_blank() {
        *slot = value.clone();
    }
}

/// Fold the best title-search hit into `book`.
///
/// `book` is still the caller's record at this point, so filling blanks is
/// exactly "copy unless supplied". ISBN and publisher take the hit's first entry.
pub(crate) fn apply_search_hit(book: &mut LocalBook, hit: &CatalogBookSummary) {
    fill(&mut book.work_key, Some(hit.work_key.clone()));
    fill(&mut book.cover_url, hit.cover_url.clone());
    fill(&mut book.first_publish_year, hit.first_publish_year);
    fill(&mut book.edition_count, Some(hit.edition_count));
    fill(&mut book.subjects, hit.subjects.clone());
    fill(&mut book.isbn, hit.isbns.first().cloned());
    fill(&mut book.publisher, hit.publishers.first().cloned());
}

/// Fold an identifier-lookup record into `book`.
///
/// Detail values win over what the title search wrote, but never over
/// `original`. Afterwards the title reverts to the caller's and the author
/// list is re-derived from the caller's author, if they gave one. Fields the
/// detail record lacks (subjects, work key) keep their title-search values.
pub(crate) fn apply_detail(book: &mut LocalBook, original: &LocalBook, detail: &CatalogBookDetail) {
    overlay(&mut book.publishers, &original.publishers, &detail.publishers);
    overlay(&mut book.publish_date, &original.publish_date, &detail.publish_date);
    overlay(&mut book.number_of_pages, &original.number_of_pages, &detail.number_of_pages);
    overlay(&mut book.isbn_10, &original.isbn_10, &detail.isbn_10);
    overlay(&mut book.isbn_13, &original.isbn_13, &detail.isbn_13);
    overlay(&mut book.lccn, &original.lccn, &detail.lccn);
    overlay(&mut book.oclc, &original.oclc, &detail.oclc);
    overlay(&mut book.olid, &original.olid, &detail.olid);
    overlay(&mut book.edition_key, &original.edition_key, &detail.edition_key);
    overlay(&mut book.cover_url, &original.cover_url, &detail.cover_url);
    overlay(&mut book.info_url, &original.info_url, &detail.info_url);
    overlay(&mut book.preview_url, &original.preview_url, &detail.preview_url);

    book.title = original.title.clone();
    book.authors = if !original.authors.is_blank() {
        original.authors.clone()
    } else if !original.author.is_blank() {
        original.author.iter().map(|a| a.trim().to_string()).collect()
    } else if !detail.authors.is_empty() {
        detail.authors.clone()
    } else {
        book.authors.clone()
    };
}
