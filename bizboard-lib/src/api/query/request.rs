//! Page request and column mapping types.

use super::SortKey;

/// Page sizes the client is allowed to request.
///
/// Any other value is rejected before a request is sent.
pub const PAGE_SIZES: [u64; 4] = [10, 25, 50, 100];

/// Maps one table column to the record field it renders.
///
/// The ordered column list is fixed at table initialization and defines
/// both the display order and the index space used by [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    field: String,
}

impl Column {
    /// Creates a column rendering the given record field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// The record field this column renders.
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// One tokenized request for a page of table data.
///
/// A request is created each time pagination offset, page size, search
/// text or sort state changes, or on initial load. It is consumed exactly
/// once by the record store and retired when its matching response is
/// applied or a newer request supersedes it.
///
/// # Example
///
/// ```
/// use bizboard_lib::api::query::{PageRequest, SortKey};
///
/// let request = PageRequest::new(1)
///     .with_page_size(25)
///     .with_search("Acme")
///     .with_order(vec![SortKey::asc(0)]);
///
/// assert_eq!(request.offset, 0);
/// assert_eq!(request.page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Monotonically increasing token, echoed back by the server.
    pub draw: u64,
    /// Zero-based record offset. Arbitrary offsets are legal; the server
    /// must tolerate values past the end of the filtered set.
    pub offset: u64,
    /// Records per page; must be one of [`PAGE_SIZES`].
    pub page_size: u64,
    /// Global search text, possibly empty.
    pub search: String,
    /// Ordered sort directives; earlier entries take precedence.
    pub order: Vec<SortKey>,
}

impl PageRequest {
    /// Creates a request for the first page with the default page size,
    /// no search and no ordering.
    pub fn new(draw: u64) -> Self {
        Self {
            draw,
            offset: 0,
            page_size: PAGE_SIZES[0],
            search: String::new(),
            order: Vec::new(),
        }
    }

    /// Sets the record offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the page size. Validation happens at encode time.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the global search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sets the sort directives.
    pub fn with_order(mut self, order: Vec<SortKey>) -> Self {
        self.order = order;
        self
    }

    /// Returns `true` if the given page size is on the allow-list.
    pub fn page_size_allowed(page_size: u64) -> bool {
        PAGE_SIZES.contains(&page_size)
    }
}
