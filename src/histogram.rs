//! Quote-distribution histogram for a single book.
//!
//! The 1-D signal is the summed character length of quotes per page
//! bucket; it is rescaled onto a rows × columns boolean grid the
//! presentation layer can print directly.

use crate::models::Book;

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionGrid {
    pub columns: usize,
    pub rows: usize,
    pub pages_count: i64,
    /// `cells[r][c]`, row 0 at the top. A filled cell means the bucket's
    /// rescaled value reaches that height.
    pub cells: Vec<Vec<bool>>,
}

impl DistributionGrid {
    /// Rows as `'*'`/`' '` strings, top to bottom.
    pub fn render_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&on| if on { '*' } else { ' ' }).collect())
            .collect()
    }

    fn empty(columns: usize, rows: usize, pages_count: i64) -> Self {
        DistributionGrid {
            columns,
            rows,
            pages_count,
            cells: vec![vec![false; columns]; rows],
        }
    }
}

/// Map the book's quotes onto `columns` page buckets and rescale onto a
/// grid of `round(columns * 0.2)` rows.
///
/// Bucket `i` covers pages in `(i*w, (i+1)*w]` with `w = pages/columns`;
/// page 0 belongs to bucket 0. A degenerate signal (all buckets equal,
/// unknown page count, or no columns) renders as an all-empty grid
/// instead of faulting on the rescale.
pub fn quote_distribution(book: &Book, columns: usize) -> DistributionGrid {
    let rows = (columns as f64 * 0.2).round() as usize;

    if columns == 0 || rows == 0 || book.pages_count <= 0 {
        return DistributionGrid::empty(columns, rows, book.pages_count);
    }

    let bucket_width = book.pages_count as f64 / columns as f64;
    let mut buckets = vec![0usize; columns];
    for (i, bucket) in buckets.iter_mut().enumerate() {
        let start = bucket_width * i as f64;
        let end = bucket_width * (i + 1) as f64;
        for quote in book.all_quotes() {
            let page = quote.page as f64;
            let in_range = page > start && page <= end;
            if in_range || (i == 0 && quote.page == 0) {
                *bucket += quote.text.chars().count();
            }
        }
    }

    let min = *buckets.iter().min().unwrap_or(&0);
    let max = *buckets.iter().max().unwrap_or(&0);
    if min == max {
        // flat signal, nothing to scale
        return DistributionGrid::empty(columns, rows, book.pages_count);
    }

    let scaled: Vec<f64> = buckets
        .iter()
        .map(|&x| rows as f64 * (x - min) as f64 / (max - min) as f64)
        .collect();

    // row 0 is the top: only the true maximum reaches `rows`
    let cells = (0..rows)
        .map(|r| {
            scaled
                .iter()
                .map(|&value| value >= (rows - r) as f64)
                .collect()
        })
        .collect();

    DistributionGrid {
        columns,
        rows,
        pages_count: book.pages_count,
        cells,
    }
}
