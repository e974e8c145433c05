//! Entity model for the library collection.
//!
//! `Quote` and `Book` are built exactly once during ingestion and never
//! mutated afterwards; everything downstream works on shared references.

/// Quotes at or below this many characters count as "short".
pub const SHORT_QUOTE_MAX_CHARS: usize = 300;

pub const ONE_DAY_SECS: i64 = 86_400;

// 2025-12-23 07:00:00 GMT+01:00, the manually chosen completion date used
// whenever the last-highlight heuristic cannot be trusted.
pub const FALLBACK_READ_DATE: i64 = 1_766_473_200;

// 2024-02-23 00:00:00, start of reliable highlight timestamps; earlier
// books predate the reading log and are skipped by the duration listing.
pub const READ_DURATION_LIST_START: i64 = 1_708_642_800;

/// Exact-match overrides for filename-derived titles that came out wrong.
pub const BOOK_RENAME_TABLE: &[(&str, &str)] = &[(
    "Dostoevsky - Notes from Underground (tr. Garnett)",
    "Dostoevsky - Notes from Underground",
)];

/// Titles whose completion date is pinned to [`FALLBACK_READ_DATE`]
/// regardless of highlight timestamps.
pub const READ_DATE_EXCEPTIONS: &[&str] = &["Seneca - Letters from a Stoic"];

/// Titles excluded from the last-highlight completion-date heuristic.
pub const READ_DATE_EXCLUSIONS: &[&str] = &["Montaigne - Essays (selection)"];

/// Titles excluded from the read-duration listing.
pub const READ_DURATION_EXCLUSIONS: &[&str] = &["Montaigne - Essays (selection)"];

/// Stable identifier assigned to every quote at ingestion.
///
/// Two quotes with identical text and page stay distinguishable through
/// this id, which is what the sampling session tracks instead of mutating
/// the entities themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub page: i64,
}

impl Quote {
    pub fn is_short(&self) -> bool {
        self.text.chars().count() <= SHORT_QUOTE_MAX_CHARS
    }
}

/// Which quotes of a book a query should consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteScope {
    All,
    ShortOnly,
}

impl QuoteScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "any length",
            Self::ShortOnly => "short only",
        }
    }

    /// Quotes of `book` under this scope, in stored order (long before
    /// short for [`QuoteScope::All`]).
    pub fn quotes_of<'a>(&self, book: &'a Book) -> Vec<&'a Quote> {
        match self {
            Self::All => book.all_quotes(),
            Self::ShortOnly => book.short_quotes.iter().collect(),
        }
    }

    pub fn count(&self, book: &Book) -> usize {
        match self {
            Self::All => book.total_quotes(),
            Self::ShortOnly => book.total_short_quotes(),
        }
    }
}

/// A normalized library entry.
///
/// Timestamps are seconds since the Unix epoch; 0 is the "unknown / not
/// set" sentinel throughout. `have_read_time == 0` means the book was not
/// finished.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: Option<String>,
    pub folder: Option<String>,
    pub file_id: String,
    pub annotation: String,
    pub pages_count: i64,
    pub published_date: i64,
    pub file_modified_time: i64,
    pub have_read_time: i64,
    pub activity_time: i64,
    pub quotes: Vec<Quote>,
    pub short_quotes: Vec<Quote>,
    pub quotes_per_page: f64,
    pub first_quote_time: i64,
    pub last_quote_time: i64,
    pub rating: f64,
    pub ratings_count: f64,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Book {
            title: title.into(),
            author: None,
            folder: None,
            file_id: String::new(),
            annotation: String::new(),
            pages_count: 0,
            published_date: 0,
            file_modified_time: 0,
            have_read_time: 0,
            activity_time: 0,
            quotes: Vec::new(),
            short_quotes: Vec::new(),
            quotes_per_page: 0.0,
            first_quote_time: 0,
            last_quote_time: 0,
            rating: 0.0,
            ratings_count: 0.0,
        }
    }

    /// Store a quote, classifying it long or short by the character
    /// threshold. The classification is permanent.
    pub fn add_quote(&mut self, quote: Quote) {
        if quote.is_short() {
            self.short_quotes.push(quote);
        } else {
            self.quotes.push(quote);
        }
    }

    /// Long quotes followed by short quotes, each in insertion order.
    pub fn all_quotes(&self) -> Vec<&Quote> {
        self.quotes.iter().chain(self.short_quotes.iter()).collect()
    }

    pub fn total_quotes(&self) -> usize {
        self.quotes.len() + self.short_quotes.len()
    }

    pub fn total_short_quotes(&self) -> usize {
        self.short_quotes.len()
    }

    /// Century bucket of the publication year, e.g. 1950 -> 20.
    pub fn century(&self) -> Option<i64> {
        if self.published_date == 0 {
            None
        } else {
            Some(self.published_date / 100 + 1)
        }
    }
}
