//! Table controller.
//!
//! One controller owns the interaction state of one table instance:
//! pagination offset, page size, search text, sort directives, and the
//! request token cycle. It is split in two layers:
//!
//! - [`TableState`] - the pure state machine. Every user action is a
//!   synchronous method that optionally yields the next
//!   [`PageRequest`](crate::api::query::PageRequest) to issue; responses
//!   are applied by draw token, stale ones dropped. No I/O, fully
//!   unit-testable.
//! - [`TableController`] - the async driver. Spawns one fetch task per
//!   request against a [`RecordStore`](crate::store::RecordStore), bounds
//!   each round trip with a timeout, debounces search input, and feeds
//!   results back through an event channel.

mod driver;
mod state;

pub use driver::TableController;
pub use driver::TableEvent;
pub use state::Applied;
pub use state::ErrorKind;
pub use state::Phase;
pub use state::TableSnapshot;
pub use state::TableState;
