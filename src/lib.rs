//! # readera-collection
//!
//! Ingests a ReadEra library export (books, folders, highlighted
//! citations, optional review metadata), normalizes it into an immutable
//! in-memory collection, and answers queries over it: without-replacement
//! random quote sampling, full-text search, grouped listings, aggregate
//! statistics, and a quote-distribution histogram.
//!
//! - **Ingestion** (`parser`): raw export -> normalized [`models::Book`]s
//!   with deterministic fallback rules for every optional field
//! - **Index** (`collection`): the sorted collection plus derived indices,
//!   built once and read-only afterwards
//! - **Queries** (`sampler`, `stats`, `search`, `listing`, `histogram`):
//!   pure views over the index; only the sampling session carries state
//! - **Export** (`export`): the one explicit file-writing operation
//!
//! ## Library usage
//!
//! ```no_run
//! use readera_collection::collection::CollectionIndex;
//! use readera_collection::models::QuoteScope;
//! use readera_collection::sampler::SamplingSession;
//! use std::path::Path;
//!
//! let index = CollectionIndex::load(Path::new("library.json")).unwrap();
//! let mut session = SamplingSession::new(index.books_with_quotes(), QuoteScope::All);
//! let mut rng = rand::thread_rng();
//! while let Some(drawn) = session.draw(&mut rng) {
//!     println!("{} (p.{})", drawn.quote.text, drawn.quote.page);
//! }
//! ```

pub mod collection;
pub mod config;
pub mod export;
pub mod histogram;
pub mod listing;
pub mod models;
pub mod parser;
pub mod sampler;
pub mod search;
pub mod stats;
