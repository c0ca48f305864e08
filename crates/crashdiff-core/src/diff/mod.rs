//! Structural diff of crash-analysis records.
//!
//! Compares two JSON documents and reports where they differ, tuned for the
//! output of crash-stack resolvers: stack frames are aligned by identity so an
//! extra frame does not cascade, known-noisy fields can be suppressed, and
//! offsets compare as hexadecimal integers.
//!
//! ## Entry point
//!
//! ```
//! use crashdiff_core::config::DiffConfig;
//! use crashdiff_core::diff::compare_values;
//! use serde_json::json;
//!
//! let config = DiffConfig::default().compile().unwrap();
//! let report = compare_values(&json!({"a": 1}), &json!({"a": 1, "c": 5}), &config).unwrap();
//! assert_eq!(report.summary.added, 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs and rules produce identical reports.
//! - **Reflexivity**: a document compared with itself yields no changes.
//! - **No partial results**: an error aborts the whole comparison.
//! - **Rendering never fails**: unserializable values print as a placeholder.

pub mod align;
pub mod compare;
pub mod engine;
pub mod filter;
pub mod human_summary;
pub mod model;
pub mod walker;

pub use align::{align, AlignmentStrategy, FrameKey, Pair};
pub use compare::Comparator;
pub use engine::{compare_documents, compare_values, Comparison, Side};
pub use filter::{AbsenceRule, FilterOutcome, IgnoreRule, NoiseFilter, Suppressed, SuppressionReason};
pub use human_summary::{render, render_outcome, DiffReport, DiffSummary, ReportOptions};
pub use model::{ChangeKind, ChangeRecord};
pub use walker::{diff, diff_with};
