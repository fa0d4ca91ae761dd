//! Page response type.

use crate::model::Record;

/// One decoded page of table data with its result counts.
///
/// Produced by [`wire::decode_response`](super::wire::decode_response),
/// which has already enforced the page invariants: the row count fits the
/// requested page size, `records_filtered >= rows.len()`, `records_total
/// >= records_filtered`, and the draw token matches the request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    draw: u64,
    records_total: u64,
    records_filtered: u64,
    rows: Vec<Record>,
}

impl PageResponse {
    pub(crate) fn new(draw: u64, records_total: u64, records_filtered: u64, rows: Vec<Record>) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            rows,
        }
    }

    /// The echoed request token.
    pub fn draw(&self) -> u64 {
        self.draw
    }

    /// Total records in the store, before filtering.
    pub fn records_total(&self) -> u64 {
        self.records_total
    }

    /// Records matching the current search, before pagination.
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
