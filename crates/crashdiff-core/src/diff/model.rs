//! Change record types produced by the tree walker.

use crashdiff_core_types::Path;
use serde::Serialize;
use serde_json::Value;

/// What happened at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only on the right
    Added,
    /// Present only on the left
    Removed,
    /// Same shape, different scalar value
    Changed,
    /// Different shapes; the walker did not descend further
    TypeMismatch,
}

impl ChangeKind {
    /// Column marker used in the rendered report.
    pub fn indicator(self) -> char {
        match self {
            ChangeKind::Removed => '>',
            ChangeKind::Added => '<',
            ChangeKind::Changed => '|',
            ChangeKind::TypeMismatch => '!',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Changed => "changed",
            ChangeKind::TypeMismatch => "type mismatch",
        }
    }
}

/// One difference between the two trees.
///
/// `left` is set for everything but `Added`; `right` for everything but
/// `Removed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub path: Path,
    pub kind: ChangeKind,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

impl ChangeRecord {
    pub fn added(path: Path, right: Value) -> Self {
        Self {
            path,
            kind: ChangeKind::Added,
            left: None,
            right: Some(right),
        }
    }

    pub fn removed(path: Path, left: Value) -> Self {
        Self {
            path,
            kind: ChangeKind::Removed,
            left: Some(left),
            right: None,
        }
    }

    pub fn changed(path: Path, left: Value, right: Value) -> Self {
        Self {
            path,
            kind: ChangeKind::Changed,
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn type_mismatch(path: Path, left: Value, right: Value) -> Self {
        Self {
            path,
            kind: ChangeKind::TypeMismatch,
            left: Some(left),
            right: Some(right),
        }
    }

    /// The value on whichever side has one, for one-sided records.
    pub fn one_sided_value(&self) -> Option<&Value> {
        match self.kind {
            ChangeKind::Added => self.right.as_ref(),
            ChangeKind::Removed => self.left.as_ref(),
            ChangeKind::Changed | ChangeKind::TypeMismatch => None,
        }
    }
}
