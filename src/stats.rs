//! Read-only aggregate statistics over the collection index.
//!
//! Percentages are integer-truncated and a zero denominator always yields
//! 0%, so no query can hit a division fault.

use crate::collection::CollectionIndex;
use crate::models::Book;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Words dropped from the frequency ranking before tokenization.
pub const STOP_WORDS: &[&str] = &[
    "that", "your", "this", "their", "they", "with", "have", "from", "what", "there", "will",
    "when", "which", "more", "only", "into", "because", "them", "cannot", "become", "other",
    "make", "every", "then", "than", "these", "through", "even", "always", "about", "must",
    "need", "very", "without", "such", "know", "things", "some", "something", "those", "want",
    "others", "find", "just", "becomes",
];

/// Tokens must be at least this many word characters.
const MIN_WORD_CHARS: usize = 4;

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"\b\w{{{},}}\b", MIN_WORD_CHARS)).unwrap())
}

fn stop_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\b(?:{})\b", STOP_WORDS.join("|"))).unwrap()
    })
}

/// Truncating percentage, 0 when the denominator is empty.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (count * 100 / total) as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderCount {
    pub folder: String,
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub total_books: usize,
    pub books_with_quotes: usize,
    pub books_with_quotes_percent: u32,
    /// Published in [1900, 2000).
    pub books_20th_century: usize,
    pub books_20th_century_percent: u32,
    /// Published in 2000 or later.
    pub books_21st_century: usize,
    pub books_21st_century_percent: u32,
    pub all_quotes_count: usize,
    pub short_quotes_count: usize,
    pub short_quotes_percent: u32,
    /// Rounded mean over quote-having books, 0 when there are none.
    pub avg_quotes_per_book: i64,
    /// Books per folder, descending, folders with no books omitted.
    pub folder_book_counts: Vec<FolderCount>,
    /// Quotes per folder, descending, percent of all quotes.
    pub folder_quote_counts: Vec<FolderCount>,
}

pub fn collection_stats(index: &CollectionIndex) -> CollectionStats {
    let total_books = index.books.len();
    let mut books_with_quotes = 0;
    let mut books_20th = 0;
    let mut books_21st = 0;

    let mut folder_books: Vec<(String, usize)> = Vec::new();
    let mut folder_quotes: Vec<(String, usize)> = Vec::new();

    for book in &index.books {
        if book.total_quotes() > 0 {
            books_with_quotes += 1;
        }
        if (1900..2000).contains(&book.published_date) {
            books_20th += 1;
        }
        if book.published_date >= 2000 {
            books_21st += 1;
        }

        if let Some(folder) = &book.folder {
            bump(&mut folder_books, folder, 1);
            bump(&mut folder_quotes, folder, book.total_quotes());
        }
    }

    folder_books.sort_by(|a, b| b.1.cmp(&a.1));
    folder_quotes.sort_by(|a, b| b.1.cmp(&a.1));

    let avg_quotes_per_book = if books_with_quotes > 0 {
        (index.all_quotes_count as f64 / books_with_quotes as f64).round() as i64
    } else {
        0
    };

    CollectionStats {
        total_books,
        books_with_quotes,
        books_with_quotes_percent: percentage(books_with_quotes, total_books),
        books_20th_century: books_20th,
        books_20th_century_percent: percentage(books_20th, total_books),
        books_21st_century: books_21st,
        books_21st_century_percent: percentage(books_21st, total_books),
        all_quotes_count: index.all_quotes_count,
        short_quotes_count: index.short_quotes_count,
        short_quotes_percent: percentage(index.short_quotes_count, index.all_quotes_count),
        avg_quotes_per_book,
        folder_book_counts: to_folder_counts(folder_books, total_books),
        folder_quote_counts: to_folder_counts(folder_quotes, index.all_quotes_count),
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str, by: usize) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += by,
        None => counts.push((key.to_string(), by)),
    }
}

fn to_folder_counts(counts: Vec<(String, usize)>, total: usize) -> Vec<FolderCount> {
    counts
        .into_iter()
        .map(|(folder, count)| FolderCount {
            percent: percentage(count, total),
            folder,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRank {
    pub rank: usize,
    /// Empty when the book carried no author at all.
    pub author: String,
    pub quote_count: usize,
    pub percent: u32,
    /// Percent of the running total down to this rank.
    pub cumulative_percent: u32,
}

/// Quote counts per author over quote-having books, descending, ties kept
/// in collection order. `top_n` bounds the returned rows; the cumulative
/// percentage still runs over the ranks actually emitted.
pub fn author_ranking(index: &CollectionIndex, top_n: usize) -> Vec<AuthorRank> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for book in &index.books {
        if book.total_quotes() == 0 {
            continue;
        }
        let author = book.author.clone().unwrap_or_default();
        if !counts.contains_key(&author) {
            order.push(author.clone());
        }
        *counts.entry(author).or_insert(0) += book.total_quotes();
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|author| {
            let count = counts[&author];
            (author, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut rows = Vec::new();
    let mut cumulative = 0;
    for (i, (author, count)) in ranked.into_iter().take(top_n).enumerate() {
        cumulative += count;
        rows.push(AuthorRank {
            rank: i + 1,
            author,
            quote_count: count,
            percent: percentage(count, index.all_quotes_count),
            cumulative_percent: percentage(cumulative, index.all_quotes_count),
        });
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordRank {
    pub rank: usize,
    pub word: String,
    pub count: usize,
    /// Book with the strictly highest occurrence count of this word;
    /// ties go to the first book in collection order.
    pub top_book: Option<String>,
    pub top_book_count: usize,
}

/// The `top_n` most frequent 4+-character words across every quote, with
/// stop words removed and ties broken by first encounter.
pub fn top_words(index: &CollectionIndex, top_n: usize) -> Vec<WordRank> {
    let all_text: String = index
        .books
        .iter()
        .flat_map(|book| book.all_quotes())
        .map(|quote| quote.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let without_stop_words = stop_word_re().replace_all(&all_text, "");
    let lowered = without_stop_words.to_lowercase();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in word_re().find_iter(&lowered) {
        let word = token.as_str();
        match counts.get_mut(word) {
            Some(n) => *n += 1,
            None => {
                order.push(word.to_string());
                counts.insert(word.to_string(), 1);
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts[&word];
            (word, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    // per-book token counts for attribution; stop words are counted here
    // too but can never match a ranked word
    let book_tokens: Vec<(&Book, HashMap<String, usize>)> = index
        .books
        .iter()
        .map(|book| (book, tokenize_book(book)))
        .collect();

    ranked
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, (word, count))| {
            let mut top_book = None;
            let mut top_book_count = 0;
            for (book, tokens) in &book_tokens {
                let n = tokens.get(&word).copied().unwrap_or(0);
                if n > top_book_count {
                    top_book_count = n;
                    top_book = Some(book.title.clone());
                }
            }
            WordRank {
                rank: i + 1,
                word,
                count,
                top_book,
                top_book_count,
            }
        })
        .collect()
}

fn tokenize_book(book: &Book) -> HashMap<String, usize> {
    let text: String = book
        .all_quotes()
        .iter()
        .map(|quote| quote.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut counts = HashMap::new();
    for token in word_re().find_iter(&text) {
        *counts.entry(token.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}
