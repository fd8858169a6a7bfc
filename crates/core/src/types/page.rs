//! Paginated query results.

use serde::{Deserialize, Serialize};

/// One page of rows together with the total number of matching documents.
///
/// `count` is computed independently of `rows`, so it reflects every document
/// matching the filter, not just the ones on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of documents matching the filter.
    pub count: i64,
    /// The requested page of documents.
    pub rows: Vec<T>,
}

impl<T> Paginated<T> {
    /// Create a page from a total count and its rows.
    #[must_use]
    pub const fn new(count: i64, rows: Vec<T>) -> Self {
        Self { count, rows }
    }

    /// Transform every row, keeping the count.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}
