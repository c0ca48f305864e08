//! crashdiff core - structural diff engine for crash-analysis records
//!
//! This crate compares two JSON crash reports (as produced by stack-walking
//! symbolicators) and reports where they disagree:
//! - Tree walker producing path-addressed change records
//! - Sequence alignment by position, by frame identity (LCS) or by sorted key
//! - Per-path comparators (exact, hexadecimal, numeric tolerance)
//! - Noise filtering with ignore and absence rules
//! - Fixed-column text report with a serializable summary
//!
//! The core performs no I/O; callers hand it parsed values or raw text.

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod pattern;
pub mod value;

#[doc(hidden)]
pub use tracing;

pub use crashdiff_core_types as core_types;

// Re-export commonly used types
pub use config::{CompiledConfig, DiffConfig};
pub use diff::{compare_documents, compare_values, ChangeKind, ChangeRecord, DiffReport, DiffSummary};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use pattern::PathPattern;
