//! Error types

mod api;
mod protocol;

pub use api::*;
pub use protocol::*;

/// Top-level error type for all dashboard client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure talking to the API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The server response broke the table protocol contract.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Returns `true` if this error was caused by a round-trip timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Api(ApiError::Timeout(_)))
    }

    /// Returns `true` if this error is potentially retryable.
    ///
    /// Protocol violations are treated as retryable as well: the next
    /// state-changing action simply issues a fresh request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(api) => api.is_retryable(),
            Self::Protocol(_) => true,
        }
    }
}
