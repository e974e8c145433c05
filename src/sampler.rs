//! Without-replacement random quote sampling.
//!
//! A session owns the "already shown" tracking as a set of [`QuoteId`]s,
//! so the book entities stay untouched and a fresh session starts clean.
//! Book selection is uniform over the currently eligible books, not
//! weighted by quote count.

use crate::models::{Book, Quote, QuoteId, QuoteScope};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug)]
pub struct SampledQuote<'a> {
    pub book: &'a Book,
    pub quote: &'a Quote,
    /// Not-yet-drawn quotes left in this book under the session scope.
    pub left_in_book: usize,
}

/// One scope of without-replacement draws, bounded by [`reset`].
///
/// [`reset`]: SamplingSession::reset
#[derive(Debug)]
pub struct SamplingSession<'a> {
    candidates: Vec<&'a Book>,
    working: Vec<&'a Book>,
    scope: QuoteScope,
    consumed: HashSet<QuoteId>,
}

impl<'a> SamplingSession<'a> {
    pub fn new(candidates: Vec<&'a Book>, scope: QuoteScope) -> Self {
        let working = candidates.clone();
        SamplingSession {
            candidates,
            working,
            scope,
            consumed: HashSet::new(),
        }
    }

    /// Total quotes the session can hand out before exhausting.
    pub fn total_candidate_quotes(&self) -> usize {
        self.candidates
            .iter()
            .map(|book| self.scope.count(book))
            .sum()
    }

    /// Draw one quote not yet returned in this session.
    ///
    /// A book found empty is dropped from the working list for the rest of
    /// the session. `None` means every candidate quote has been returned;
    /// that is the normal terminal state, not an error.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<SampledQuote<'a>> {
        loop {
            if self.working.is_empty() {
                return None;
            }

            let book_idx = rng.gen_range(0..self.working.len());
            let book = self.working[book_idx];

            let available: Vec<&Quote> = self
                .scope
                .quotes_of(book)
                .into_iter()
                .filter(|q| !self.consumed.contains(&q.id))
                .collect();

            if available.is_empty() {
                self.working.remove(book_idx);
                continue;
            }

            let quote = available[rng.gen_range(0..available.len())];
            self.consumed.insert(quote.id);

            return Some(SampledQuote {
                book,
                quote,
                left_in_book: available.len() - 1,
            });
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.working.is_empty()
    }

    /// Start the session over: forget every draw and restore the full
    /// candidate list.
    pub fn reset(&mut self) {
        self.consumed.clear();
        self.working = self.candidates.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn make_book(title: &str, first_id: u64, texts: &[&str]) -> Book {
        let mut book = Book::new(title);
        for (i, text) in texts.iter().enumerate() {
            book.add_quote(Quote {
                id: QuoteId(first_id + i as u64),
                text: text.to_string(),
                page: i as i64 + 1,
            });
        }
        book
    }

    fn fixture() -> (Book, Book) {
        let long = "L".repeat(400);
        (
            make_book("Alpha", 0, &["a1", "a2", long.as_str()]),
            make_book("Beta", 10, &["b1", "b2"]),
        )
    }

    #[test]
    fn test_without_replacement_until_exhaustion() {
        let (a, b) = fixture();
        let mut session = SamplingSession::new(vec![&a, &b], QuoteScope::All);
        let mut rng = seeded_rng();

        assert_eq!(session.total_candidate_quotes(), 5);

        let mut seen = HashSet::new();
        for _ in 0..5 {
            let drawn = session.draw(&mut rng).expect("five quotes available");
            assert!(seen.insert(drawn.quote.id), "quote repeated before exhaustion");
        }

        // the sixth draw signals a normally exhausted session
        assert!(session.draw(&mut rng).is_none());
        assert!(session.is_exhausted());
        assert!(session.draw(&mut rng).is_none());
    }

    #[test]
    fn test_left_in_book_counts_down() {
        let book = make_book("Solo", 0, &["q1", "q2", "q3"]);
        let mut session = SamplingSession::new(vec![&book], QuoteScope::All);
        let mut rng = seeded_rng();

        let mut remaining: Vec<usize> = Vec::new();
        while let Some(drawn) = session.draw(&mut rng) {
            assert_eq!(drawn.book.title, "Solo");
            remaining.push(drawn.left_in_book);
        }
        assert_eq!(remaining, vec![2, 1, 0]);
    }

    #[test]
    fn test_short_scope_skips_long_quotes() {
        let (a, b) = fixture();
        let mut session = SamplingSession::new(vec![&a, &b], QuoteScope::ShortOnly);
        let mut rng = seeded_rng();

        assert_eq!(session.total_candidate_quotes(), 4);

        let mut count = 0;
        while let Some(drawn) = session.draw(&mut rng) {
            assert!(drawn.quote.is_short());
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn test_reset_restores_all_candidates() {
        let (a, b) = fixture();
        let mut session = SamplingSession::new(vec![&a, &b], QuoteScope::All);
        let mut rng = seeded_rng();

        while session.draw(&mut rng).is_some() {}
        assert!(session.is_exhausted());

        session.reset();
        assert!(!session.is_exhausted());

        let mut seen = HashSet::new();
        while let Some(drawn) = session.draw(&mut rng) {
            assert!(seen.insert(drawn.quote.id));
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let (a, b) = fixture();

        let mut first: Vec<QuoteId> = Vec::new();
        let mut session = SamplingSession::new(vec![&a, &b], QuoteScope::All);
        let mut rng = seeded_rng();
        while let Some(drawn) = session.draw(&mut rng) {
            first.push(drawn.quote.id);
        }

        let mut second: Vec<QuoteId> = Vec::new();
        let mut session = SamplingSession::new(vec![&a, &b], QuoteScope::All);
        let mut rng = seeded_rng();
        while let Some(drawn) = session.draw(&mut rng) {
            second.push(drawn.quote.id);
        }

        assert_eq!(first, second);
    }
}
