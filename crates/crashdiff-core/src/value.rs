//! Value model helpers.
//!
//! Documents are held as `serde_json::Value` (built with `preserve_order`, so
//! mapping keys keep document order). [`Shape`] gives the walker an
//! exhaustive view over the six JSON node kinds.
//!
//! Parsed JSON is a tree, so no cycle detection is needed anywhere in the
//! engine. The resource guard in [`measure`] bounds depth and node count
//! instead.

use crate::errors::DiffError;
use crashdiff_core_types::{Path, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime shape of a JSON node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Array(_) => Shape::Sequence,
            Value::Object(_) => Shape::Mapping,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Shape::Sequence | Shape::Mapping)
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Sequence => "sequence",
            Shape::Mapping => "mapping",
        }
    }
}

/// Parse raw document text.
///
/// # Errors
///
/// `MalformedInput` at the root path, with the parser's line and column.
pub fn parse_document(text: &str) -> Result<Value, DiffError> {
    serde_json::from_str(text).map_err(|e| DiffError::MalformedInput {
        path: Path::root(),
        reason: format!(
            "not valid JSON (line {}, column {}): {}",
            e.line(),
            e.column(),
            e
        ),
    })
}

/// Select the subtree to compare.
///
/// With a `root_key`, a mapping document containing that key is replaced by
/// the value under it (processed crash reports wrap the stack-walker output
/// in `json_dump`); a mapping without the key is compared whole.
///
/// # Errors
///
/// `MalformedInput` if a `root_key` is configured and the document root is
/// not a mapping.
pub fn extract_root<'a>(
    document: &'a Value,
    root_key: Option<&str>,
) -> Result<&'a Value, DiffError> {
    let Some(key) = root_key else {
        return Ok(document);
    };
    match document {
        Value::Object(map) => Ok(map.get(key).unwrap_or(document)),
        other => Err(DiffError::MalformedInput {
            path: Path::root(),
            reason: format!(
                "expected a mapping at the document root to look up `{}`, found {}",
                key,
                Shape::of(other).name()
            ),
        }),
    }
}

/// Size guards applied to each input tree before walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Deepest allowed nesting; the root is depth 0
    pub max_depth: usize,
    /// Total nodes allowed in one tree, containers included
    pub max_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_nodes: 1_000_000,
        }
    }
}

/// Size of a measured tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub depth: usize,
    pub nodes: usize,
}

/// Measure a tree, failing as soon as a limit is exceeded.
///
/// # Errors
///
/// `DepthLimitExceeded` / `NodeLimitExceeded` naming the node that tripped.
pub fn measure(value: &Value, limits: &Limits) -> Result<TreeStats, DiffError> {
    let mut stats = TreeStats::default();
    let mut trail = Vec::new();
    measure_node(value, limits, &mut trail, &mut stats)?;
    Ok(stats)
}

fn measure_node(
    value: &Value,
    limits: &Limits,
    trail: &mut Vec<PathSegment>,
    stats: &mut TreeStats,
) -> Result<(), DiffError> {
    stats.nodes += 1;
    if stats.nodes > limits.max_nodes {
        return Err(DiffError::NodeLimitExceeded {
            path: Path::from_segments(trail.clone()),
            max_nodes: limits.max_nodes,
        });
    }
    if trail.len() > limits.max_depth {
        return Err(DiffError::DepthLimitExceeded {
            path: Path::from_segments(trail.clone()),
            max_depth: limits.max_depth,
        });
    }
    stats.depth = stats.depth.max(trail.len());

    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                trail.push(PathSegment::Index(i));
                measure_node(item, limits, trail, stats)?;
                trail.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                trail.push(PathSegment::Key(key.clone()));
                measure_node(item, limits, trail, stats)?;
                trail.pop();
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
    Ok(())
}
