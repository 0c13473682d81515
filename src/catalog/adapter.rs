//! Adapter layer: Convert Open Library DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If Open Library changes a response shape, only this file and dto.rs
//! need to change.

use super::covers;
use super::domain::{
    AuthorLink, CatalogAuthorDetail, CatalogAuthorSummary, CatalogBookDetail,
    CatalogBookSummary, CatalogError, CoverKey, CoverSize, MAX_SUMMARY_ISBNS,
    MAX_SUMMARY_PUBLISHERS, MAX_SUMMARY_SUBJECTS,
};
use super::dto;

/// Convert a title search response to summaries.
///
/// Search hits carry a `cover_i`; we turn it into a medium-size cover URL on
/// the given covers host.
pub fn to_book_summaries(response: dto::SearchResponse, covers_base: &str) -> Vec<CatalogBookSummary> {
    response
        .docs
        .into_iter()
        .map(|doc| to_book_summary(doc, covers_base))
        .collect()
}

fn to_book_summary(doc: dto::SearchDoc, covers_base: &str) -> CatalogBookSummary {
    let cover_url = doc.cover_i.map(|id| {
        covers::book_cover_url(covers_base, CoverKey::Id, &id.to_string(), CoverSize::Medium)
    });

    CatalogBookSummary {
        title: doc.title,
        authors: doc.author_name,
        first_publish_year: doc.first_publish_year,
        work_key: doc.key,
        edition_count: doc.edition_count.unwrap_or(0),
        cover_url,
        isbns: truncated(doc.isbn, MAX_SUMMARY_ISBNS),
        publishers: truncated(doc.publisher, MAX_SUMMARY_PUBLISHERS),
        languages: doc.language,
        subjects: truncated(doc.subject, MAX_SUMMARY_SUBJECTS),
    }
}

/// Convert an author search response to summaries
pub fn to_author_summaries(response: dto::AuthorSearchResponse) -> Vec<CatalogAuthorSummary> {
    response
        .docs
        .into_iter()
        .map(|doc| CatalogAuthorSummary {
            key: doc.key,
            name: doc.name,
            alternate_names: doc.alternate_names,
            birth_date: doc.birth_date,
            death_date: doc.death_date,
            top_work: doc.top_work,
            work_count: doc.work_count.unwrap_or(0),
            top_subjects: doc.top_subjects,
        })
        .collect()
}

/// Convert an identifier lookup response to a detail record.
///
/// Returns `Ok(None)` when `records` is empty. A record that is present but
/// malformed is an error, not a miss.
pub fn to_book_detail(
    response: dto::VolumesResponse,
) -> Result<Option<CatalogBookDetail>, CatalogError> {
    let Some((record_key, value)) = response.records.into_iter().next() else {
        return Ok(None);
    };

    let record: dto::VolumeRecord = serde_json::from_value(value).map_err(|e| {
        CatalogError::InvalidResponse(format!("record {}: {}", record_key, e))
    })?;
    let data = record.data;

    Ok(Some(CatalogBookDetail {
        title: data.title,
        authors: data.authors.into_iter().map(|a| a.name).collect(),
        publishers: data.publishers.into_iter().map(|p| p.name).collect(),
        publish_date: data.publish_date,
        number_of_pages: data.number_of_pages,
        isbn_10: data.identifiers.isbn_10,
        isbn_13: data.identifiers.isbn_13,
        lccn: data.identifiers.lccn,
        oclc: data.identifiers.oclc,
        olid: data.identifiers.openlibrary,
        edition_key: data.key,
        cover_url: data.cover.and_then(|c| c.medium),
        info_url: data.url,
        preview_url: data.ebooks.into_iter().next().and_then(|e| e.preview_url),
    }))
}

/// Convert an author record to a detail record
pub fn to_author_detail(response: dto::AuthorResponse) -> CatalogAuthorDetail {
    CatalogAuthorDetail {
        name: response.name,
        personal_name: response.personal_name,
        birth_date: response.birth_date,
        death_date: response.death_date,
        bio: response.bio.and_then(flatten_bio),
        alternate_names: response.alternate_names,
        photos: response.photos,
        key: response.key,
        remote_ids: response.remote_ids,
        links: response
            .links
            .into_iter()
            .map(|l| AuthorLink {
                title: l.title,
                url: l.url,
            })
            .collect(),
    }
}

/// Collapse either bio shape to plain text. Empty text counts as no bio.
fn flatten_bio(bio: dto::Bio) -> Option<String> {
    let text = match bio {
        dto::Bio::Plain(text) => text,
        dto::Bio::Typed(typed) => typed.value,
    };
    if text.is_empty() { None } else { Some(text) }
}

fn truncated(mut values: Vec<String>, max: usize) -> Vec<String> {
    values.truncate(max);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const COVERS: &str = "https://covers.openlibrary.org";

    fn make_doc(title: &str) -> dto::SearchDoc {
        dto::SearchDoc {
            key: "/works/OL1W".to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn strings(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_summary_defaults_for_sparse_doc() {
        let response = dto::SearchResponse {
            num_found: 1,
            docs: vec![make_doc("Sparse")],
        };

        let summaries = to_book_summaries(response, COVERS);

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.title, "Sparse");
        assert_eq!(s.edition_count, 0);
        assert!(s.cover_url.is_none());
        assert!(s.authors.is_empty());
        assert!(s.languages.is_empty());
    }

    #[test]
    fn test_summary_cover_from_cover_id() {
        let doc = dto::SearchDoc {
            cover_i: Some(11481354),
            ..make_doc("Dune")
        };

        let summary = to_book_summary(doc, COVERS);

        assert_eq!(
            summary.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
        );
    }

    #[test]
    fn test_summary_truncates_lists() {
        let doc = dto::SearchDoc {
            isbn: strings("isbn", 12),
            publisher: strings("pub", 4),
            subject: strings("subj", 40),
            language: strings("lang", 7),
            ..make_doc("Big")
        };

        let summary = to_book_summary(doc, COVERS);

        assert_eq!(summary.isbns, vec!["isbn0", "isbn1", "isbn2"]);
        assert_eq!(summary.publishers.len(), 3);
        assert_eq!(summary.subjects.len(), 5);
        assert_eq!(summary.subjects[0], "subj0");
        // Languages are not capped
        assert_eq!(summary.languages.len(), 7);
    }

    #[test]
    fn test_author_summary_work_count_default() {
        let response = dto::AuthorSearchResponse {
            num_found: 1,
            docs: vec![dto::AuthorDoc {
                key: "OL1A".to_string(),
                name: "Someone".to_string(),
                ..Default::default()
            }],
        };

        let authors = to_author_summaries(response);

        assert_eq!(authors[0].work_count, 0);
        assert!(authors[0].top_subjects.is_empty());
    }

    #[test]
    fn test_detail_from_first_record() {
        let json = r#"{
            "records": {
                "/books/OL7353617M": {
                    "data": {
                        "title": "Dune",
                        "key": "/books/OL7353617M",
                        "url": "https://openlibrary.org/books/OL7353617M/Dune",
                        "authors": [{"name": "Frank Herbert"}],
                        "publishers": [{"name": "Ace"}, {"name": "Chilton"}],
                        "identifiers": {"isbn_10": ["0441172717"], "openlibrary": ["OL7353617M"]},
                        "cover": {"medium": "https://covers.openlibrary.org/b/id/1-M.jpg"},
                        "ebooks": [{"preview_url": "https://archive.org/details/first"}, {"preview_url": "https://archive.org/details/second"}]
                    }
                },
                "/books/OL2M": {"data": {"title": "Other"}}
            }
        }"#;
        let response: dto::VolumesResponse = serde_json::from_str(json).unwrap();

        let detail = to_book_detail(response).unwrap().expect("record present");

        assert_eq!(detail.title.as_deref(), Some("Dune"));
        assert_eq!(detail.authors, vec!["Frank Herbert"]);
        assert_eq!(detail.publishers, vec!["Ace", "Chilton"]);
        assert_eq!(detail.isbn_10, vec!["0441172717"]);
        assert!(detail.isbn_13.is_empty());
        assert_eq!(detail.olid, vec!["OL7353617M"]);
        assert_eq!(detail.edition_key.as_deref(), Some("/books/OL7353617M"));
        assert_eq!(
            detail.preview_url.as_deref(),
            Some("https://archive.org/details/first")
        );
    }

    #[test]
    fn test_detail_missing_records_is_none() {
        let detail = to_book_detail(dto::VolumesResponse::default()).unwrap();
        assert!(detail.is_none());
    }

    #[test]
    fn test_detail_malformed_record_is_error() {
        let response: dto::VolumesResponse =
            serde_json::from_str(r#"{"records": {"x": {"nodata": true}}}"#).unwrap();

        let result = to_book_detail(response);

        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }

    #[test]
    fn test_author_detail_bio_shapes() {
        let plain = dto::AuthorResponse {
            bio: Some(dto::Bio::Plain("Plain".to_string())),
            ..Default::default()
        };
        let typed = dto::AuthorResponse {
            bio: Some(dto::Bio::Typed(dto::TypedText {
                kind: Some("/type/text".to_string()),
                value: "Typed".to_string(),
            })),
            ..Default::default()
        };
        let empty = dto::AuthorResponse {
            bio: Some(dto::Bio::Plain(String::new())),
            ..Default::default()
        };

        assert_eq!(to_author_detail(plain).bio.as_deref(), Some("Plain"));
        assert_eq!(to_author_detail(typed).bio.as_deref(), Some("Typed"));
        assert!(to_author_detail(empty).bio.is_none());
    }

    proptest! {
        #[test]
        fn prop_summary_lists_are_bounded(
            isbns in prop::collection::vec("[0-9]{10,13}", 0..20),
            publishers in prop::collection::vec("[A-Za-z ]{1,12}", 0..20),
            subjects in prop::collection::vec("[a-z]{1,10}", 0..30),
        ) {
            let doc = dto::SearchDoc {
                isbn: isbns.clone(),
                publisher: publishers.clone(),
                subject: subjects.clone(),
                ..make_doc("Any")
            };

            let summary = to_book_summary(doc, COVERS);

            prop_assert!(summary.isbns.len() <= MAX_SUMMARY_ISBNS);
            prop_assert!(summary.publishers.len() <= MAX_SUMMARY_PUBLISHERS);
            prop_assert!(summary.subjects.len() <= MAX_SUMMARY_SUBJECTS);
            // Kept entries are a prefix of upstream order
            prop_assert_eq!(&summary.isbns[..], &isbns[..summary.isbns.len()]);
            prop_assert_eq!(&summary.subjects[..], &subjects[..summary.subjects.len()]);
        }
    }
}
