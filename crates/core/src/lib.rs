//! Shared domain types for the GeoTag-X export service.
//!
//! Holds the error type used across crates, the id/timestamp aliases, and the
//! question schema registry that decides which projects are exportable.

pub mod error;
pub mod schema;
pub mod types;
