//! Dashboard API client library
//!
//! A Rust async client for the business-records analytics dashboard API:
//! summary counters, top-N aggregations, and the server-side table data
//! protocol (pagination, global search, multi-column sort, stale-response
//! rejection by draw token).

pub mod api;
pub mod controller;
pub mod error;
pub mod model;
pub mod store;

mod client;

pub use client::*;
