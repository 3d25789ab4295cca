//! Domain types for the item catalog API.
//!
//! This crate has no I/O: it turns raw query-string values into typed
//! filters and page requests that the database layer consumes.

pub mod error;
pub mod filter;
pub mod pagination;
pub mod query_params;
pub mod types;
