//! The finalized collection: alphabetically ordered books plus the
//! derived indices every query reads from.
//!
//! Built once after ingestion completes (the aggregate fields depend on
//! fully populated books) and never mutated afterwards.

use crate::models::Book;
use crate::parser::{self, FieldFallbacks, IngestError, Ingested};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug)]
pub struct CollectionIndex {
    /// All books, sorted case-sensitively ascending by title.
    pub books: Vec<Book>,
    /// Folder name -> member file ids, in declaration order.
    pub folders: Vec<(String, HashSet<String>)>,
    /// Centuries represented by any non-zero publication year, ascending.
    pub centuries: Vec<i64>,
    pub all_quotes_count: usize,
    pub short_quotes_count: usize,
    pub ratings_available: bool,
    /// Which optional fields fell back to sentinels, per document.
    pub fallbacks: Vec<FieldFallbacks>,
}

impl CollectionIndex {
    /// Read and normalize the export file, then build the index.
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let export = parser::load_export(path)?;
        Ok(Self::build(parser::normalize(export)))
    }

    pub fn build(ingested: Ingested) -> Self {
        let Ingested {
            mut books,
            folders,
            fallbacks,
        } = ingested;

        let mut all_quotes_count = 0;
        let mut short_quotes_count = 0;
        let mut centuries_set = HashSet::new();
        let mut ratings_available = false;

        for book in &books {
            all_quotes_count += book.total_quotes();
            short_quotes_count += book.total_short_quotes();

            if let Some(century) = book.century() {
                centuries_set.insert(century);
            }
            if book.rating > 0.0 {
                ratings_available = true;
            }
        }

        let mut centuries: Vec<i64> = centuries_set.into_iter().collect();
        centuries.sort_unstable();

        books.sort_by(|a, b| a.title.cmp(&b.title));

        CollectionIndex {
            books,
            folders,
            centuries,
            all_quotes_count,
            short_quotes_count,
            ratings_available,
            fallbacks,
        }
    }

    pub fn folder_names(&self) -> Vec<&str> {
        self.folders.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Candidate set for quote queries: books holding at least one quote.
    pub fn books_with_quotes(&self) -> Vec<&Book> {
        self.books.iter().filter(|b| b.total_quotes() > 0).collect()
    }

    pub fn books_with_annotation(&self) -> Vec<&Book> {
        self.books
            .iter()
            .filter(|b| !b.annotation.is_empty())
            .collect()
    }

    /// Distinct non-empty authors of quote-having books, sorted.
    pub fn authors_with_quotes(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = self
            .books
            .iter()
            .filter(|b| b.total_quotes() > 0)
            .filter_map(|b| b.author.as_deref())
            .filter(|a| !a.is_empty())
            .collect();
        authors.sort_unstable();
        authors.dedup();
        authors
    }

    pub fn books_by_author<'a>(&'a self, author: &str) -> Vec<&'a Book> {
        self.books
            .iter()
            .filter(|b| b.author.as_deref() == Some(author) && b.total_quotes() > 0)
            .collect()
    }

    pub fn books_in_folder<'a>(&'a self, folder: &str) -> Vec<&'a Book> {
        self.books
            .iter()
            .filter(|b| b.folder.as_deref() == Some(folder) && b.total_quotes() > 0)
            .collect()
    }
}
