//! Dashboard API operations

mod export;
mod summary;
mod table;
mod top;

pub mod query;
