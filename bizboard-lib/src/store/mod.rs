//! Record store boundary.
//!
//! The controller talks to the record set through [`RecordStore`], which
//! takes one encoded table query and returns the raw JSON envelope. The
//! HTTP client implements it over `GET /api/table`; [`MemoryStore`] keeps
//! the whole record set in process with deterministic semantics, for tests
//! and offline demos.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// The external service holding the full record set.
///
/// One call resolves one page request: the store applies the query's
/// search, sorting and pagination and answers with the wire envelope
/// `{ draw, recordsTotal, recordsFiltered, data }`. JSON syntax and
/// transport failures surface as [`Error::Api`]; the caller decodes and
/// validates the envelope itself.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches one page of table data for an encoded query.
    async fn fetch_table(&self, params: &[(String, String)]) -> Result<Value, Error>;
}
