//! Ingestion of the raw library export.
//!
//! The export is one JSON document with `colls` (named folders holding
//! file ids) and `docs` (per-document metadata, citations and reviews).
//! An unreadable file or structurally invalid JSON is fatal; everything
//! optional inside a document falls back to its sentinel and is recorded
//! in [`FieldFallbacks`] so callers can see which fields were defaulted.

use crate::models::{
    Book, Quote, QuoteId, BOOK_RENAME_TABLE, FALLBACK_READ_DATE, ONE_DAY_SECS,
    READ_DATE_EXCEPTIONS, READ_DATE_EXCLUSIONS,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug)]
pub enum IngestError {
    Io(String),
    Json(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "Failed to read library export: {}", e),
            IngestError::Json(e) => write!(f, "Failed to parse library export: {}", e),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        IngestError::Json(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct RawExport {
    pub colls: Vec<RawColl>,
    pub docs: Vec<RawDoc>,
}

#[derive(Debug, Deserialize)]
pub struct RawColl {
    pub data: RawCollData,
    #[serde(default)]
    pub docs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCollData {
    pub coll_title: String,
}

#[derive(Debug, Deserialize)]
pub struct RawDoc {
    pub uri: String,
    pub data: RawDocData,
    #[serde(default)]
    pub citations: Vec<RawCitation>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

#[derive(Debug, Deserialize)]
pub struct RawDocData {
    #[serde(default)]
    pub doc_active: i64,
    #[serde(default)]
    pub doc_file_name_title: String,
    #[serde(default)]
    pub user_authors: Option<String>,
    #[serde(default)]
    pub doc_authors: Option<String>,
    #[serde(default)]
    pub doc_annotation: Option<String>,
    /// Secondary JSON blob holding reading-position data.
    #[serde(default)]
    pub doc_position: Option<String>,
    /// Milliseconds since epoch.
    #[serde(default)]
    pub file_modified_time: i64,
    #[serde(default)]
    pub doc_activity_time: i64,
    #[serde(default)]
    pub doc_have_read_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RawCitation {
    #[serde(default)]
    pub note_body: String,
    #[serde(default)]
    pub note_page: i64,
    /// Milliseconds since epoch.
    #[serde(default)]
    pub note_insert_time: i64,
}

#[derive(Debug, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub note_body: String,
}

/// Whether an optional field parsed cleanly or was replaced by its
/// sentinel default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Parsed,
    Fallback,
}

/// Per-document record of which fallback chains fired.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFallbacks {
    pub file_id: String,
    pub pages_count: FieldOutcome,
    pub goodreads: FieldOutcome,
}

/// Everything ingestion produces: normalized books in document order, the
/// folder index in declaration order, and the fallback records.
#[derive(Debug)]
pub struct Ingested {
    pub books: Vec<Book>,
    pub folders: Vec<(String, HashSet<String>)>,
    pub fallbacks: Vec<FieldFallbacks>,
}

pub fn load_export(path: &Path) -> Result<RawExport, IngestError> {
    let content = std::fs::read_to_string(path)?;
    let export = serde_json::from_str(&content)?;
    Ok(export)
}

/// Normalize the raw export into model values. Inactive documents are
/// skipped entirely.
pub fn normalize(export: RawExport) -> Ingested {
    let folders: Vec<(String, HashSet<String>)> = export
        .colls
        .into_iter()
        .map(|coll| (coll.data.coll_title, coll.docs.into_iter().collect()))
        .collect();

    let mut books = Vec::new();
    let mut fallbacks = Vec::new();
    let mut next_quote_id: u64 = 0;

    for doc in export.docs {
        if doc.data.doc_active != 1 {
            continue;
        }

        let mut book = Book::new(derive_title(&doc.data.doc_file_name_title));
        book.file_id = doc.uri.clone();
        book.author = resolve_author(&doc.data);
        book.annotation = doc.data.doc_annotation.clone().unwrap_or_default();
        book.file_modified_time = doc.data.file_modified_time / 1000;
        book.activity_time = doc.data.doc_activity_time;

        // first folder whose member set holds this file id wins
        book.folder = folders
            .iter()
            .find(|(_, ids)| ids.contains(&book.file_id))
            .map(|(name, _)| name.clone());

        let (pages_count, pages_outcome) = parse_pages_count(doc.data.doc_position.as_deref());
        book.pages_count = pages_count;

        let (goodreads, goodreads_outcome) = parse_goodreads(&doc.reviews);
        (book.published_date, book.rating, book.ratings_count) = goodreads;

        if !doc.citations.is_empty() {
            let mut insert_times = Vec::with_capacity(doc.citations.len());
            for citation in &doc.citations {
                book.add_quote(Quote {
                    id: QuoteId(next_quote_id),
                    text: citation.note_body.clone(),
                    page: citation.note_page,
                });
                next_quote_id += 1;
                insert_times.push(citation.note_insert_time);
            }

            insert_times.sort_unstable();
            book.first_quote_time = insert_times[0] / 1000;
            book.last_quote_time = insert_times[insert_times.len() - 1] / 1000;

            if book.pages_count > 0 {
                book.quotes_per_page = book.total_quotes() as f64 / book.pages_count as f64;
            }
        }

        book.have_read_time = resolve_read_time(&book, doc.data.doc_have_read_time);

        fallbacks.push(FieldFallbacks {
            file_id: book.file_id.clone(),
            pages_count: pages_outcome,
            goodreads: goodreads_outcome,
        });
        books.push(book);
    }

    Ingested {
        books,
        folders,
        fallbacks,
    }
}

/// Strip the leading run of non-alphabetic characters left over from the
/// filename, then apply the exact-match rename table.
fn derive_title(raw: &str) -> String {
    let stripped = raw.trim_start_matches(|c: char| !c.is_ascii_alphabetic());
    for (from, to) in BOOK_RENAME_TABLE {
        if *from == stripped {
            return (*to).to_string();
        }
    }
    stripped.to_string()
}

fn resolve_author(data: &RawDocData) -> Option<String> {
    data.user_authors
        .clone()
        .filter(|a| !a.is_empty())
        .or_else(|| data.doc_authors.clone().filter(|a| !a.is_empty()))
}

/// Page count lives inside a nested JSON blob; any shape problem means
/// the count is simply unknown.
fn parse_pages_count(position: Option<&str>) -> (i64, FieldOutcome) {
    let parsed = position
        .and_then(|blob| serde_json::from_str::<serde_json::Value>(blob).ok())
        .and_then(|value| value.get("pagesCount").and_then(|n| n.as_i64()))
        .filter(|n| *n >= 0);

    match parsed {
        Some(n) => (n, FieldOutcome::Parsed),
        None => (0, FieldOutcome::Fallback),
    }
}

/// Goodreads-style metadata packed into the first review note as
/// `published year; rating; ratings count`. A `k` in the count stands for
/// a decimal point in thousands. All three fields parse or all three fall
/// back; partial success is not allowed.
fn parse_goodreads(reviews: &[RawReview]) -> ((i64, f64, f64), FieldOutcome) {
    match try_parse_goodreads(reviews) {
        Some(triple) => (triple, FieldOutcome::Parsed),
        None => ((0, 0.0, 0.0), FieldOutcome::Fallback),
    }
}

fn try_parse_goodreads(reviews: &[RawReview]) -> Option<(i64, f64, f64)> {
    let note = &reviews.first()?.note_body;
    let parts: Vec<&str> = note.split(';').collect();
    if parts.len() < 3 {
        return None;
    }

    let published_date: i64 = parts[0].trim().parse().ok()?;
    let rating: f64 = parts[1].trim().parse().ok()?;
    let ratings_count: f64 = parts[2].trim().replace('k', ".").parse().ok()?;
    Some((published_date, rating, ratings_count))
}

/// Resolve the completion date. The export has no explicit finished-date
/// field, so the last highlight stands in for it when the highlights span
/// more than a day; known-bad titles are pinned to the fixed fallback
/// date instead. No have-read marker means the book was never finished.
fn resolve_read_time(book: &Book, have_read_marker: Option<i64>) -> i64 {
    match have_read_marker {
        Some(marker) if marker != 0 => {
            if READ_DATE_EXCEPTIONS.contains(&book.title.as_str()) {
                FALLBACK_READ_DATE
            } else if (book.last_quote_time - book.first_quote_time) > ONE_DAY_SECS
                && !READ_DATE_EXCLUSIONS.contains(&book.title.as_str())
            {
                book.last_quote_time
            } else {
                FALLBACK_READ_DATE
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SHORT_QUOTE_MAX_CHARS;

    const SAMPLE_EXPORT: &str = r#"{
        "colls": [
            {"data": {"coll_title": "Philosophy"}, "docs": ["doc:1", "doc:9"]},
            {"data": {"coll_title": "Fiction"}, "docs": ["doc:2", "doc:1"]}
        ],
        "docs": [
            {
                "uri": "doc:1",
                "data": {
                    "doc_active": 1,
                    "doc_file_name_title": "01. Epictetus - Discourses",
                    "user_authors": "",
                    "doc_authors": "Epictetus",
                    "doc_annotation": "Handbook included",
                    "doc_position": "{\"pagesCount\": 200, \"pageNumber\": 57}",
                    "file_modified_time": 1700000000000,
                    "doc_activity_time": 1710000000000,
                    "doc_have_read_time": 1712000000000
                },
                "citations": [
                    {"note_body": "We suffer more in imagination.", "note_page": 12, "note_insert_time": 1705000000000},
                    {"note_body": "First say to yourself what you would be.", "note_page": 90, "note_insert_time": 1705050000000}
                ],
                "reviews": [
                    {"note_body": " 125 ; 4.31 ; 56k "}
                ]
            },
            {
                "uri": "doc:2",
                "data": {
                    "doc_active": 1,
                    "doc_file_name_title": "Calvino - Invisible Cities",
                    "doc_authors": "Italo Calvino",
                    "doc_position": "corrupted{",
                    "file_modified_time": 1690000000000,
                    "doc_activity_time": 0,
                    "doc_have_read_time": 0
                },
                "citations": [],
                "reviews": [
                    {"note_body": "1972; 4.16"}
                ]
            },
            {
                "uri": "doc:3",
                "data": {
                    "doc_active": 0,
                    "doc_file_name_title": "Inactive - Skipped"
                },
                "citations": [],
                "reviews": []
            }
        ]
    }"#;

    fn ingest_sample() -> Ingested {
        let export: RawExport = serde_json::from_str(SAMPLE_EXPORT).unwrap();
        normalize(export)
    }

    #[test]
    fn test_inactive_docs_skipped() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books.len(), 2);
        assert!(ingested.books.iter().all(|b| b.file_id != "doc:3"));
    }

    #[test]
    fn test_title_strips_leading_non_alpha() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books[0].title, "Epictetus - Discourses");
    }

    #[test]
    fn test_rename_table_applied() {
        assert_eq!(
            derive_title("03 - Dostoevsky - Notes from Underground (tr. Garnett)"),
            "Dostoevsky - Notes from Underground"
        );
    }

    #[test]
    fn test_author_falls_back_past_empty_user_authors() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books[0].author.as_deref(), Some("Epictetus"));
    }

    #[test]
    fn test_first_matching_folder_wins() {
        let ingested = ingest_sample();
        // doc:1 is in both folders; Philosophy is declared first
        assert_eq!(ingested.books[0].folder.as_deref(), Some("Philosophy"));
        assert_eq!(ingested.books[1].folder.as_deref(), Some("Fiction"));
    }

    #[test]
    fn test_pages_count_parsed_from_position_blob() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books[0].pages_count, 200);
        assert_eq!(ingested.fallbacks[0].pages_count, FieldOutcome::Parsed);
    }

    #[test]
    fn test_pages_count_fallback_on_corrupt_blob() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books[1].pages_count, 0);
        assert_eq!(ingested.fallbacks[1].pages_count, FieldOutcome::Fallback);
    }

    #[test]
    fn test_goodreads_parsed_with_k_suffix() {
        let ingested = ingest_sample();
        let book = &ingested.books[0];
        assert_eq!(book.published_date, 125);
        assert_eq!(book.rating, 4.31);
        assert_eq!(book.ratings_count, 56.0);
        assert_eq!(ingested.fallbacks[0].goodreads, FieldOutcome::Parsed);
    }

    #[test]
    fn test_goodreads_all_or_nothing() {
        // two fields only: all three reset together
        let ingested = ingest_sample();
        let book = &ingested.books[1];
        assert_eq!(book.published_date, 0);
        assert_eq!(book.rating, 0.0);
        assert_eq!(book.ratings_count, 0.0);
        assert_eq!(ingested.fallbacks[1].goodreads, FieldOutcome::Fallback);
    }

    #[test]
    fn test_goodreads_missing_review_is_fallback() {
        let ((year, rating, count), outcome) = parse_goodreads(&[]);
        assert_eq!((year, rating, count), (0, 0.0, 0.0));
        assert_eq!(outcome, FieldOutcome::Fallback);
    }

    #[test]
    fn test_quote_times_sorted_and_converted_to_seconds() {
        let ingested = ingest_sample();
        let book = &ingested.books[0];
        assert_eq!(book.first_quote_time, 1_705_000_000);
        assert_eq!(book.last_quote_time, 1_705_050_000);
        assert!(book.first_quote_time <= book.last_quote_time);
    }

    #[test]
    fn test_quotes_per_page_invariant() {
        let ingested = ingest_sample();
        let book = &ingested.books[0];
        assert_eq!(
            book.quotes_per_page,
            book.total_quotes() as f64 / book.pages_count as f64
        );
        // unknown page count stays at the 0.0 sentinel
        assert_eq!(ingested.books[1].quotes_per_page, 0.0);
    }

    #[test]
    fn test_quote_ids_unique_across_books() {
        let ingested = ingest_sample();
        let mut seen = std::collections::HashSet::new();
        for book in &ingested.books {
            for quote in book.all_quotes() {
                assert!(seen.insert(quote.id));
            }
        }
    }

    #[test]
    fn test_short_long_classification_at_ingest() {
        let mut export: RawExport = serde_json::from_str(SAMPLE_EXPORT).unwrap();
        export.docs[0].citations.push(RawCitation {
            note_body: "x".repeat(SHORT_QUOTE_MAX_CHARS + 1),
            note_page: 5,
            note_insert_time: 1_705_100_000_000,
        });

        let ingested = normalize(export);
        let book = &ingested.books[0];
        assert_eq!(book.quotes.len(), 1);
        assert_eq!(book.short_quotes.len(), 2);
    }

    #[test]
    fn test_read_time_heuristic_uses_last_quote() {
        let mut export: RawExport = serde_json::from_str(SAMPLE_EXPORT).unwrap();
        // push the quote span past one day
        export.docs[0].citations[1].note_insert_time = 1_705_000_000_000 + 2 * 86_400_000;

        let ingested = normalize(export);
        assert_eq!(
            ingested.books[0].have_read_time,
            ingested.books[0].last_quote_time
        );
    }

    #[test]
    fn test_read_time_short_span_uses_fallback_date() {
        // sample span is under a day
        let ingested = ingest_sample();
        assert_eq!(ingested.books[0].have_read_time, FALLBACK_READ_DATE);
    }

    #[test]
    fn test_read_time_exception_title_pinned() {
        let mut book = Book::new(READ_DATE_EXCEPTIONS[0]);
        book.first_quote_time = 1_705_000_000;
        book.last_quote_time = 1_705_000_000 + 10 * ONE_DAY_SECS;

        assert_eq!(resolve_read_time(&book, Some(1)), FALLBACK_READ_DATE);
    }

    #[test]
    fn test_read_time_excluded_title_uses_fallback_date() {
        let mut book = Book::new(READ_DATE_EXCLUSIONS[0]);
        book.first_quote_time = 1_705_000_000;
        book.last_quote_time = 1_705_000_000 + 10 * ONE_DAY_SECS;

        assert_eq!(resolve_read_time(&book, Some(1)), FALLBACK_READ_DATE);
    }

    #[test]
    fn test_no_read_marker_means_not_finished() {
        let ingested = ingest_sample();
        assert_eq!(ingested.books[1].have_read_time, 0);

        let book = Book::new("Unmarked");
        assert_eq!(resolve_read_time(&book, None), 0);
    }

    #[test]
    fn test_load_export_missing_file() {
        let result = load_export(Path::new("/nonexistent/library.json"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }

    #[test]
    fn test_malformed_export_is_fatal() {
        let result: Result<RawExport, serde_json::Error> = serde_json::from_str("{\"colls\": 3}");
        assert!(result.is_err());
    }
}
