//! Sorted and filtered listing views over the collection.
//!
//! Queries return new views (slices of references or derived rows); the
//! index itself is never reordered. Dates are handed out as typed chrono
//! values, formatting is the caller's business.

use crate::collection::CollectionIndex;
use crate::models::{
    Book, ONE_DAY_SECS, READ_DURATION_EXCLUSIONS, READ_DURATION_LIST_START,
};
use chrono::{DateTime, NaiveDateTime};

/// Property a book listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortProperty {
    AddedOn,
    ReadingNow,
    Finished,
    ReadDuration,
    PublishDate,
    QuoteCount,
    QuotesPerPage,
    Rating,
    RatingsCount,
    Folder,
}

fn to_datetime(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

/// Books ordered by `property` (descending, except [`SortProperty::Folder`]
/// which lists alphabetically), optionally restricted to one folder.
pub fn sorted_view<'a>(
    index: &'a CollectionIndex,
    property: SortProperty,
    folder: Option<&str>,
) -> Vec<&'a Book> {
    let mut books: Vec<&Book> = index
        .books
        .iter()
        .filter(|b| folder.is_none() || b.folder.as_deref() == folder)
        .collect();

    match property {
        SortProperty::AddedOn => books.sort_by(|a, b| b.file_modified_time.cmp(&a.file_modified_time)),
        SortProperty::ReadingNow | SortProperty::PublishDate => {
            books.sort_by(|a, b| b.published_date.cmp(&a.published_date))
        }
        SortProperty::Finished => books.sort_by(|a, b| b.have_read_time.cmp(&a.have_read_time)),
        SortProperty::ReadDuration => {
            books.sort_by(|a, b| b.first_quote_time.cmp(&a.first_quote_time))
        }
        SortProperty::QuoteCount => books.sort_by(|a, b| b.total_quotes().cmp(&a.total_quotes())),
        SortProperty::QuotesPerPage => {
            books.sort_by(|a, b| b.quotes_per_page.total_cmp(&a.quotes_per_page))
        }
        SortProperty::Rating => books.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortProperty::RatingsCount => {
            books.sort_by(|a, b| b.ratings_count.total_cmp(&a.ratings_count))
        }
        SortProperty::Folder => books.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    books
}

/// Books with reading activity that were never marked finished, newest
/// publication first.
pub fn reading_now_books<'a>(index: &'a CollectionIndex) -> Vec<&'a Book> {
    sorted_view(index, SortProperty::ReadingNow, None)
        .into_iter()
        .filter(|b| b.activity_time != 0 && b.have_read_time == 0)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRow<'a> {
    pub book: &'a Book,
    pub finished_on: NaiveDateTime,
}

/// Finished books, most recently finished first.
pub fn finished_rows<'a>(index: &'a CollectionIndex) -> Vec<FinishedRow<'a>> {
    sorted_view(index, SortProperty::Finished, None)
        .into_iter()
        .filter(|b| b.have_read_time > 0)
        .map(|book| FinishedRow {
            finished_on: to_datetime(book.have_read_time),
            book,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadDurationRow<'a> {
    pub book: &'a Book,
    pub started_on: NaiveDateTime,
    pub finished_on: NaiveDateTime,
    pub elapsed_days: i64,
    pub pages_per_day: i64,
}

/// Reading-pace rows for books with a trustworthy highlight span: first
/// highlight inside the reading log, span longer than a day, finished,
/// and not manually excluded. Most recently started first.
pub fn read_duration_rows<'a>(index: &'a CollectionIndex) -> Vec<ReadDurationRow<'a>> {
    sorted_view(index, SortProperty::ReadDuration, None)
        .into_iter()
        .filter(|b| {
            b.first_quote_time > READ_DURATION_LIST_START
                && (b.last_quote_time - b.first_quote_time) > ONE_DAY_SECS
                && !READ_DURATION_EXCLUSIONS.contains(&b.title.as_str())
                && b.have_read_time > 0
        })
        .map(|book| {
            let elapsed_days = (book.have_read_time - book.first_quote_time) / ONE_DAY_SECS + 1;
            let pages_per_day = if elapsed_days > 0 {
                (book.pages_count as f64 / elapsed_days as f64 + 0.5) as i64
            } else {
                0
            };
            ReadDurationRow {
                started_on: to_datetime(book.first_quote_time),
                finished_on: to_datetime(book.have_read_time),
                elapsed_days,
                pages_per_day,
                book,
            }
        })
        .collect()
}

/// Publication listing, newest first, optionally restricted to one
/// century (`(c-1)*100 <= year < c*100`).
pub fn publish_date_books<'a>(
    index: &'a CollectionIndex,
    century: Option<i64>,
) -> Vec<&'a Book> {
    sorted_view(index, SortProperty::PublishDate, None)
        .into_iter()
        .filter(|b| match century {
            Some(c) => (c - 1) * 100 <= b.published_date && b.published_date < c * 100,
            None => true,
        })
        .collect()
}
