//! Table protocol violation types

/// Errors signaling that one side of the table protocol broke the contract.
///
/// On the client side these are raised before a request is sent (disallowed
/// page size, sort directive pointing at a column that does not exist). On
/// the response path they signal a server payload that parsed as JSON but
/// breaks a stated invariant of the page contract. All of them are
/// non-fatal: the controller surfaces an error state and keeps the
/// previously committed page visible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The response body parsed as JSON but is not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// An envelope field is present but has the wrong shape.
    #[error("response field `{field}` is not {expected}")]
    BadField {
        /// The offending field.
        field: &'static str,
        /// What the contract requires, e.g. "a non-negative integer".
        expected: &'static str,
    },

    /// `recordsFiltered` exceeds `recordsTotal`.
    #[error("recordsFiltered ({filtered}) exceeds recordsTotal ({total})")]
    CountInvariant {
        /// Reported filtered count.
        filtered: u64,
        /// Reported total count.
        total: u64,
    },

    /// The server returned more rows than fit the filtered count.
    #[error("{rows} rows returned but recordsFiltered is {filtered}")]
    RowsExceedFiltered {
        /// Number of rows in the page.
        rows: usize,
        /// Reported filtered count.
        filtered: u64,
    },

    /// The server returned more rows than the requested page size.
    #[error("{rows} rows returned for a page size of {page_size}")]
    PageOverflow {
        /// Number of rows in the page.
        rows: usize,
        /// Page size that was requested.
        page_size: u64,
    },

    /// The echoed draw token does not match the request that produced it.
    #[error("draw echo mismatch: sent {sent}, server echoed {echoed}")]
    DrawMismatch {
        /// Token attached to the request.
        sent: u64,
        /// Token echoed by the server.
        echoed: u64,
    },

    /// The page size is not on the allow-list and must not be sent.
    #[error("page size {0} is not allowed")]
    PageSizeNotAllowed(u64),

    /// A sort directive references a column index outside the column list.
    #[error("sort column {column} out of range ({columns} columns)")]
    UnknownSortColumn {
        /// The out-of-range column index.
        column: usize,
        /// Number of columns the table was initialized with.
        columns: usize,
    },

    /// A wire query parameter could not be parsed.
    #[error("malformed query parameter `{name}`: {value:?}")]
    BadParameter {
        /// Parameter name as it appears on the wire.
        name: String,
        /// The value that failed to parse.
        value: String,
    },
}
