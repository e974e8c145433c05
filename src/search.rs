//! Case-insensitive substring search over every quote in the collection.
//!
//! Matching quotes are returned with the found substring uppercased in a
//! fresh string; the stored quote text is never touched. The total is a
//! literal, non-overlapping occurrence count.

use crate::collection::CollectionIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteMatch {
    /// Quote text with every occurrence of the needle uppercased.
    pub highlighted: String,
    pub page: i64,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookMatches {
    pub title: String,
    pub quotes: Vec<QuoteMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub books: Vec<BookMatches>,
    pub total_occurrences: usize,
}

/// Search every quote of every book, in collection order. Callers reject
/// needles shorter than three characters; the engine itself accepts any
/// non-empty needle. Zero matches is a normal outcome.
pub fn search(index: &CollectionIndex, needle: &str) -> SearchResults {
    let needle_chars: Vec<char> = needle.chars().map(fold_char).collect();

    let mut books = Vec::new();
    let mut total_occurrences = 0;

    if needle_chars.is_empty() {
        return SearchResults {
            books,
            total_occurrences,
        };
    }

    for book in &index.books {
        let mut quotes = Vec::new();
        for quote in book.all_quotes() {
            let (highlighted, occurrences) = highlight(&quote.text, &needle_chars);
            if occurrences > 0 {
                total_occurrences += occurrences;
                quotes.push(QuoteMatch {
                    highlighted,
                    page: quote.page,
                    occurrences,
                });
            }
        }
        if !quotes.is_empty() {
            books.push(BookMatches {
                title: book.title.clone(),
                quotes,
            });
        }
    }

    SearchResults {
        books,
        total_occurrences,
    }
}

// char-wise case folding; multi-char lowercase expansions are not folded
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// One pass over the text: uppercase each non-overlapping occurrence and
/// count it.
fn highlight(text: &str, needle: &[char]) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut occurrences = 0;
    let mut i = 0;

    while i < chars.len() {
        if matches_at(&chars, i, needle) {
            for c in &chars[i..i + needle.len()] {
                out.extend(c.to_uppercase());
            }
            occurrences += 1;
            i += needle.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    (out, occurrences)
}

fn matches_at(chars: &[char], at: usize, needle: &[char]) -> bool {
    chars.len() - at >= needle.len()
        && chars[at..at + needle.len()]
            .iter()
            .zip(needle)
            .all(|(c, n)| fold_char(*c) == *n)
}
