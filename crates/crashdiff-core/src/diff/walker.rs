//! Tree walker.
//!
//! Walks two value trees in lockstep and emits a [`ChangeRecord`] for every
//! point where they disagree. Mapping keys are visited in left document order
//! followed by keys only the right side has; sequences are paired by the
//! alignment strategy configured for their path.
//!
//! Aligned elements can sit at different indices on each side, so the walker
//! carries one path per side. `Added` records are addressed in the right tree;
//! every other kind is addressed in the left tree.

use crate::config::CompiledConfig;
use crate::diff::align::align;
use crate::diff::model::ChangeRecord;
use crate::errors::{ExError, Result};
use crate::value::{measure, Shape};
use crashdiff_core_types::Path;
use serde_json::{Map, Value};

/// Diff two trees with the default configuration: exact comparison,
/// positional alignment, no rules.
///
/// # Errors
///
/// `TooLarge` if either tree exceeds the default limits.
pub fn diff(left: &Value, right: &Value) -> Result<Vec<ChangeRecord>> {
    diff_with(left, right, &CompiledConfig::default())
}

/// Diff two trees under a compiled configuration.
///
/// Filtering is not applied here; every disagreement is returned. The
/// configuration's `root_key` is also not consulted: callers pass the
/// subtrees they want compared.
///
/// # Errors
///
/// `TooLarge` naming the first node, on either side, that exceeds the
/// configured limits. No partial result is returned.
pub fn diff_with(
    left: &Value,
    right: &Value,
    config: &CompiledConfig,
) -> Result<Vec<ChangeRecord>> {
    for tree in [left, right] {
        measure(tree, config.limits()).map_err(|e| ExError::from(e).with_op("diff"))?;
    }

    let mut walker = Walker {
        config,
        changes: Vec::new(),
    };
    walker.walk(&Location::root(), left, right);
    Ok(walker.changes)
}

/// The same node addressed in each tree.
#[derive(Debug, Clone)]
struct Location {
    left: Path,
    right: Path,
}

impl Location {
    fn root() -> Self {
        Self {
            left: Path::root(),
            right: Path::root(),
        }
    }

    fn key(&self, key: &str) -> Self {
        Self {
            left: self.left.key(key),
            right: self.right.key(key),
        }
    }

    fn pair(&self, i: usize, j: usize) -> Self {
        Self {
            left: self.left.index(i),
            right: self.right.index(j),
        }
    }
}

struct Walker<'c> {
    config: &'c CompiledConfig,
    changes: Vec<ChangeRecord>,
}

impl Walker<'_> {
    fn walk(&mut self, at: &Location, left: &Value, right: &Value) {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) => self.walk_mapping(at, l, r),
            (Value::Array(l), Value::Array(r)) => self.walk_sequence(at, l, r),
            _ => self.compare_leaf(at, left, right),
        }
    }

    fn walk_mapping(&mut self, at: &Location, left: &Map<String, Value>, right: &Map<String, Value>) {
        for (key, lv) in left {
            match right.get(key) {
                Some(rv) => self.walk(&at.key(key), lv, rv),
                None => self
                    .changes
                    .push(ChangeRecord::removed(at.left.key(key.as_str()), lv.clone())),
            }
        }
        for (key, rv) in right {
            if !left.contains_key(key) {
                self.changes
                    .push(ChangeRecord::added(at.right.key(key.as_str()), rv.clone()));
            }
        }
    }

    fn walk_sequence(&mut self, at: &Location, left: &[Value], right: &[Value]) {
        // rules are written against the left tree
        let strategy = self.config.alignment_for(&at.left);
        for pair in align(strategy, left, right) {
            let lv = pair.left.and_then(|i| left.get(i).map(|v| (i, v)));
            let rv = pair.right.and_then(|j| right.get(j).map(|v| (j, v)));
            match (lv, rv) {
                (Some((i, l)), Some((j, r))) => self.walk(&at.pair(i, j), l, r),
                (Some((i, l)), None) => self
                    .changes
                    .push(ChangeRecord::removed(at.left.index(i), l.clone())),
                (None, Some((j, r))) => self
                    .changes
                    .push(ChangeRecord::added(at.right.index(j), r.clone())),
                (None, None) => {}
            }
        }
    }

    fn compare_leaf(&mut self, at: &Location, left: &Value, right: &Value) {
        let path = &at.left;
        let ls = Shape::of(left);
        let rs = Shape::of(right);
        if ls.is_container() || rs.is_container() {
            self.changes.push(ChangeRecord::type_mismatch(
                path.clone(),
                left.clone(),
                right.clone(),
            ));
            return;
        }

        if self.config.comparator_for(path).equal(left, right) {
            return;
        }
        let record = if ls == rs {
            ChangeRecord::changed(path.clone(), left.clone(), right.clone())
        } else {
            ChangeRecord::type_mismatch(path.clone(), left.clone(), right.clone())
        };
        self.changes.push(record);
    }
}
