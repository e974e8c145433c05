use readera_collection::collection::CollectionIndex;
use readera_collection::config::Config;
use readera_collection::stats;
use std::path::Path;

fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let index = match CollectionIndex::load(Path::new(&config.library_path)) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let stats = stats::collection_stats(&index);
    println!("Library: {}", config.library_path);
    println!(
        "Books: {} ({} with quotes)",
        stats.total_books, stats.books_with_quotes
    );
    println!(
        "Quotes: {} ({} short)",
        stats.all_quotes_count, stats.short_quotes_count
    );
    println!("Folders: {}", index.folders.len());
}
