//! Cover and author photo URLs.
//!
//! The covers service is addressed purely by URL, so nothing here touches the
//! network. Shapes:
//! - book cover: `{base}/b/{kind}/{value}-{size}.jpg`
//! - author photo: `{base}/a/olid/{olid}-L.jpg`

use super::domain::{CoverKey, CoverSize};

/// Default covers host
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

/// Build a book cover URL. The kind segment is always lower-case.
pub fn book_cover_url(base: &str, key: CoverKey, value: &str, size: CoverSize) -> String {
    format!(
        "{}/b/{}/{}-{}.jpg",
        base.trim_end_matches('/'),
        key.token().to_ascii_lowercase(),
        value,
        size.suffix()
    )
}

/// Build an author photo URL (always the large size)
pub fn author_photo_url(base: &str, author_key: &str) -> String {
    format!("{}/a/olid/{}-L.jpg", base.trim_end_matches('/'), author_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url_lowercases_kind() {
        let url = book_cover_url(
            DEFAULT_COVERS_URL,
            CoverKey::Isbn,
            "9780439708180",
            CoverSize::Medium,
        );
        assert_eq!(
            url,
            "https://covers.openlibrary.org/b/isbn/9780439708180-M.jpg"
        );
    }

    #[test]
    fn test_cover_url_is_deterministic() {
        let a = book_cover_url(DEFAULT_COVERS_URL, CoverKey::Isbn, "9780439708180", CoverSize::Medium);
        let b = book_cover_url(DEFAULT_COVERS_URL, CoverKey::Isbn, "9780439708180", CoverSize::Medium);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cover_url_by_internal_id() {
        let url = book_cover_url(DEFAULT_COVERS_URL, CoverKey::Id, "11481354", CoverSize::default());
        assert_eq!(url, "https://covers.openlibrary.org/b/id/11481354-L.jpg");
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let url = author_photo_url("http://localhost:9000/", "OL23919A");
        assert_eq!(url, "http://localhost:9000/a/olid/OL23919A-L.jpg");
    }
}
