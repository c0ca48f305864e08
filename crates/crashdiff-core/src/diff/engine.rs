//! Comparison engine.
//!
//! The entry points are [`compare_values`] for parsed trees and
//! [`compare_documents`] for raw JSON text. Both run the full pipeline: root
//! extraction, resource guards, tree walk, noise filter and report rendering.
//! A [`Comparison`] carries a [`RunId`] that tags every log event it emits.

#![allow(clippy::result_large_err)]

use crate::config::CompiledConfig;
use crate::diff::human_summary::{render, DiffReport};
use crate::diff::walker::diff_with;
use crate::errors::{DiffError, ExError, Result};
use crate::value::{extract_root, parse_document};
use crate::{log_op_end, log_op_error, log_op_start};
use crashdiff_core_types::RunId;
use serde_json::Value;

/// Which input a document-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// One comparison run under a fixed configuration.
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    config: &'a CompiledConfig,
    run_id: RunId,
}

impl<'a> Comparison<'a> {
    pub fn new(config: &'a CompiledConfig) -> Self {
        Self {
            config,
            run_id: RunId::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn config(&self) -> &CompiledConfig {
        self.config
    }

    /// Compare two parsed documents.
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: a `root_key` is configured and a document root is
    ///   not a mapping
    /// - `TooLarge`: a document exceeds the configured limits
    pub fn compare_values(&self, left: &Value, right: &Value) -> Result<DiffReport> {
        log_op_start!("compare_values", run_id = self.run_id.as_str());
        let start = std::time::Instant::now();

        let report = self.compare_values_impl(left, right).map_err(|e| {
            let e = e.with_op("compare_values");
            log_op_error!(
                "compare_values",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = self.run_id.as_str()
            );
            e
        })?;

        log_op_end!(
            "compare_values",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = self.run_id.as_str(),
            change_count = report.summary.total_changes,
            suppressed_count = report.summary.suppressed_changes
        );

        Ok(report)
    }

    /// Parse and compare two raw JSON documents.
    ///
    /// # Errors
    ///
    /// As [`Comparison::compare_values`], plus `MalformedInput` when either
    /// text is not JSON. The message names the side and the parser position.
    pub fn compare_documents(&self, left: &str, right: &str) -> Result<DiffReport> {
        log_op_start!("compare_documents", run_id = self.run_id.as_str());
        let start = std::time::Instant::now();

        let parsed = parse_side(left, Side::Left)
            .and_then(|l| parse_side(right, Side::Right).map(|r| (l, r)))
            .map_err(|e| {
                let e = e.with_op("compare_documents");
                log_op_error!(
                    "compare_documents",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = self.run_id.as_str()
                );
                e
            })?;

        let report = self.compare_values(&parsed.0, &parsed.1)?;

        log_op_end!(
            "compare_documents",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = self.run_id.as_str(),
            change_count = report.summary.total_changes
        );

        Ok(report)
    }

    fn compare_values_impl(&self, left: &Value, right: &Value) -> Result<DiffReport> {
        let root_key = self.config.root_key();
        let left = select_root(left, root_key, Side::Left)?;
        let right = select_root(right, root_key, Side::Right)?;

        let changes = diff_with(left, right, self.config)?;
        Ok(render(changes, self.config.filter(), self.config.report()))
    }
}

fn parse_side(text: &str, side: Side) -> Result<Value> {
    parse_document(text).map_err(|e| with_side(e, side))
}

fn select_root<'v>(document: &'v Value, root_key: Option<&str>, side: Side) -> Result<&'v Value> {
    extract_root(document, root_key).map_err(|e| with_side(e, side))
}

fn with_side(err: DiffError, side: Side) -> ExError {
    let ex = ExError::from(err);
    let message = format!("{} document: {}", side.name(), ex.message());
    ex.with_message(message)
}

/// Compare two parsed documents under `config` with a fresh run id.
pub fn compare_values(left: &Value, right: &Value, config: &CompiledConfig) -> Result<DiffReport> {
    Comparison::new(config).compare_values(left, right)
}

/// Parse and compare two raw JSON documents under `config`.
pub fn compare_documents(left: &str, right: &str, config: &CompiledConfig) -> Result<DiffReport> {
    Comparison::new(config).compare_documents(left, right)
}
