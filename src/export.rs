//! Plain-text export of one book's quotes.
//!
//! The only file-writing side effect in the crate, exposed as an explicit
//! operation rather than hidden inside a query.

use crate::models::Book;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExportError {
    Io(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Failed to write quote export: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e.to_string())
    }
}

/// Write `<title>.txt` under `dir`: a title header, then every quote of
/// the book ordered by page, each preceded by its running index and page
/// number. Returns the path written.
pub fn export_book_quotes(book: &Book, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.txt", book.title));

    let mut quotes = book.all_quotes();
    quotes.sort_by_key(|q| q.page);

    let mut out = String::new();
    out.push_str(&book.title);
    out.push('\n');
    out.push_str(&"-".repeat(book.title.chars().count()));
    out.push('\n');

    for (i, quote) in quotes.iter().enumerate() {
        out.push_str(&format!(
            "{} / {}  (p.{})\n{}\n\n",
            i + 1,
            quotes.len(),
            quote.page,
            quote.text
        ));
    }

    std::fs::write(&path, out)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quote, QuoteId};

    fn make_book() -> Book {
        let mut book = Book::new("Test Book");
        book.add_quote(Quote {
            id: QuoteId(1),
            text: "Later thought.".to_string(),
            page: 42,
        });
        book.add_quote(Quote {
            id: QuoteId(2),
            text: "Earlier thought.".to_string(),
            page: 3,
        });
        book
    }

    #[test]
    fn test_export_orders_by_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = export_book_quotes(&make_book(), dir.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Test Book\n---------\n1 / 2  (p.3)\nEarlier thought.\n\n2 / 2  (p.42)\nLater thought.\n\n"
        );
    }

    #[test]
    fn test_export_path_is_title_txt() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = export_book_quotes(&make_book(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Test Book.txt");
    }

    #[test]
    fn test_export_book_without_quotes_writes_header_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let book = Book::new("Empty");
        let path = export_book_quotes(&book, dir.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Empty\n-----\n");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let book = make_book();
        let result = export_book_quotes(&book, Path::new("/nonexistent/dir"));
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
