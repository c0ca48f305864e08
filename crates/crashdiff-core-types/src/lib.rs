//! Core types shared across crashdiff facilities
//!
//! This crate provides foundational types used by the diff engine, its error
//! facility and its logging facility:
//!
//! - **Paths**: Path, PathSegment addressing a location inside a JSON tree
//! - **Correlation types**: RunId tagging the log events of one comparison
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod path;
pub mod schema;

pub use correlation::RunId;
pub use path::{Path, PathSegment};
