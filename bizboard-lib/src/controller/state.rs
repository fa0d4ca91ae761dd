//! Pure table state machine.

use crate::api::query::Column;
use crate::api::query::Direction;
use crate::api::query::PageRequest;
use crate::api::query::PageResponse;
use crate::api::query::SortKey;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::ProtocolError;
use crate::model::Record;

/// The controller's request/response phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request in flight; the committed page is current.
    Idle,
    /// A request is in flight. Previously committed rows stay visible.
    Loading,
    /// The last matching response failed. Previously committed rows stay
    /// visible; any state-changing action or an explicit retry recovers.
    Error(ErrorKind),
}

/// Display-facing classification of a failed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or HTTP failure, or a body that was not JSON.
    Transport,
    /// The response parsed but broke the page contract.
    Protocol,
    /// The round trip did not settle within the configured bound.
    Timeout,
}

impl ErrorKind {
    /// Classifies an error for display.
    pub fn of(error: &Error) -> Self {
        match error {
            Error::Protocol(_) => Self::Protocol,
            Error::Api(ApiError::Timeout(_)) => Self::Timeout,
            Error::Api(ApiError::Network(e)) if e.is_timeout() => Self::Timeout,
            Error::Api(_) => Self::Transport,
        }
    }
}

/// Outcome of applying one response to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The response matched the in-flight token and was committed.
    Committed,
    /// The response belonged to a superseded request and was dropped.
    Stale,
    /// The response matched but carried an error; the phase is now
    /// [`Phase::Error`].
    Failed,
}

/// The last successfully committed page.
#[derive(Debug, Clone)]
struct CommittedPage {
    rows: Vec<Record>,
    records_total: u64,
    records_filtered: u64,
}

/// The interaction state of one table instance.
///
/// Owns the single source of truth for pagination, search and sort state,
/// and the draw-token cycle that keeps the view consistent with the most
/// recently issued request. Every state-changing method returns the
/// [`PageRequest`] the caller must send (if any); [`apply`](Self::apply)
/// feeds responses back in. No I/O happens here.
#[derive(Debug)]
pub struct TableState {
    columns: Vec<Column>,
    offset: u64,
    page_size: u64,
    search: String,
    order: Vec<SortKey>,
    next_draw: u64,
    in_flight: Option<u64>,
    phase: Phase,
    committed: Option<CommittedPage>,
}

impl TableState {
    /// Creates the state for a table with the given column list.
    ///
    /// Starts idle on the first page with the smallest allowed page size,
    /// no search and no ordering.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            offset: 0,
            page_size: crate::api::query::PAGE_SIZES[0],
            search: String::new(),
            order: Vec::new(),
            next_draw: 1,
            in_flight: None,
            phase: Phase::Idle,
            committed: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The table's column list.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The current request/response phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The token of the in-flight request, if any.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// The current pagination offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The current page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// The current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The current sort directives.
    pub fn order(&self) -> &[SortKey] {
        &self.order
    }

    /// A borrowed view of the state for rendering.
    pub fn snapshot(&self) -> TableSnapshot<'_> {
        let (rows, records_total, records_filtered): (&[Record], _, _) = match &self.committed {
            Some(page) => (
                &page.rows,
                Some(page.records_total),
                Some(page.records_filtered),
            ),
            None => (&[], None, None),
        };
        TableSnapshot {
            phase: self.phase,
            columns: &self.columns,
            rows,
            records_total,
            records_filtered,
            offset: self.offset,
            page_size: self.page_size,
            search: &self.search,
            order: &self.order,
        }
    }

    // =========================================================================
    // State-changing actions
    // =========================================================================

    /// Issues the initial request on mount.
    pub fn mount(&mut self) -> PageRequest {
        self.issue()
    }

    /// Re-issues a request for the current state.
    pub fn refresh(&mut self) -> PageRequest {
        self.issue()
    }

    /// Retries after an error. Equivalent to [`refresh`](Self::refresh);
    /// provided for explicit retry affordances.
    pub fn retry(&mut self) -> PageRequest {
        self.issue()
    }

    /// Jumps to an arbitrary record offset.
    pub fn goto_offset(&mut self, offset: u64) -> PageRequest {
        self.offset = offset;
        self.issue()
    }

    /// Advances to the next page, if the committed counts show one.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        let filtered = self.committed.as_ref()?.records_filtered;
        if self.offset + self.page_size >= filtered {
            return None;
        }
        Some(self.goto_offset(self.offset + self.page_size))
    }

    /// Steps back one page, if not already on the first.
    pub fn prev_page(&mut self) -> Option<PageRequest> {
        if self.offset == 0 {
            return None;
        }
        Some(self.goto_offset(self.offset.saturating_sub(self.page_size)))
    }

    /// Changes the page size and resets to the first page.
    ///
    /// Sizes outside the allow-list are rejected without issuing anything.
    pub fn set_page_size(&mut self, page_size: u64) -> Result<PageRequest, ProtocolError> {
        if !PageRequest::page_size_allowed(page_size) {
            return Err(ProtocolError::PageSizeNotAllowed(page_size));
        }
        self.page_size = page_size;
        self.offset = 0;
        Ok(self.issue())
    }

    /// Changes the search text and resets to the first page.
    ///
    /// Returns `None` without issuing when the text equals the current
    /// search.
    pub fn set_search(&mut self, search: impl Into<String>) -> Option<PageRequest> {
        let search = search.into();
        if search == self.search {
            return None;
        }
        self.search = search;
        self.offset = 0;
        Some(self.issue())
    }

    /// Cycles the sort on one column (ascending, then descending, then
    /// unsorted) and resets to the first page.
    pub fn toggle_sort(&mut self, column: usize) -> Result<PageRequest, ProtocolError> {
        if column >= self.columns.len() {
            return Err(ProtocolError::UnknownSortColumn {
                column,
                columns: self.columns.len(),
            });
        }
        self.order = match self.order.first() {
            Some(key) if key.column == column => match key.direction {
                Direction::Asc => vec![SortKey::desc(column)],
                Direction::Desc => Vec::new(),
            },
            _ => vec![SortKey::asc(column)],
        };
        self.offset = 0;
        Ok(self.issue())
    }

    /// Replaces the full sort directive list (for multi-column
    /// tie-breaking) and resets to the first page.
    pub fn set_order(&mut self, order: Vec<SortKey>) -> Result<PageRequest, ProtocolError> {
        for key in &order {
            if key.column >= self.columns.len() {
                return Err(ProtocolError::UnknownSortColumn {
                    column: key.column,
                    columns: self.columns.len(),
                });
            }
        }
        self.order = order;
        self.offset = 0;
        Ok(self.issue())
    }

    // =========================================================================
    // Response application
    // =========================================================================

    /// Applies the settled result of the request identified by `draw`.
    ///
    /// Responses for superseded requests are dropped wholesale - success
    /// or failure - so the view only ever reflects the most recently
    /// issued request. A matching failure keeps the previously committed
    /// rows visible and records the error kind for display.
    pub fn apply(&mut self, draw: u64, result: Result<PageResponse, Error>) -> Applied {
        if self.in_flight != Some(draw) {
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let records_total = page.records_total();
                let records_filtered = page.records_filtered();
                self.committed = Some(CommittedPage {
                    rows: page.into_rows(),
                    records_total,
                    records_filtered,
                });
                self.phase = Phase::Idle;
                Applied::Committed
            }
            Err(error) => {
                self.phase = Phase::Error(ErrorKind::of(&error));
                Applied::Failed
            }
        }
    }

    fn issue(&mut self) -> PageRequest {
        let draw = self.next_draw;
        self.next_draw += 1;
        self.in_flight = Some(draw);
        self.phase = Phase::Loading;
        PageRequest {
            draw,
            offset: self.offset,
            page_size: self.page_size,
            search: self.search.clone(),
            order: self.order.clone(),
        }
    }
}

/// A borrowed view of the table for rendering.
#[derive(Debug, Clone, Copy)]
pub struct TableSnapshot<'a> {
    /// The request/response phase to display.
    pub phase: Phase,
    /// The table's column list, in display order.
    pub columns: &'a [Column],
    /// The committed rows; empty before the first commit.
    pub rows: &'a [Record],
    /// Total records in the store, once a page has committed.
    pub records_total: Option<u64>,
    /// Records matching the current search, once a page has committed.
    pub records_filtered: Option<u64>,
    /// Current pagination offset.
    pub offset: u64,
    /// Current page size.
    pub page_size: u64,
    /// Current search text.
    pub search: &'a str,
    /// Current sort directives.
    pub order: &'a [SortKey],
}

impl TableSnapshot<'_> {
    /// One-based page number of the current offset.
    pub fn page(&self) -> u64 {
        self.offset / self.page_size + 1
    }

    /// Number of pages in the filtered set, once known.
    pub fn page_count(&self) -> Option<u64> {
        let filtered = self.records_filtered?;
        Some(filtered.div_ceil(self.page_size).max(1))
    }
}
