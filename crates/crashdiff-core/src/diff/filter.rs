//! Noise filter.
//!
//! Runs after the walker has produced the complete change list. Ignore rules
//! silence a path and everything beneath it; absence rules treat a missing key
//! and a specific placeholder value (typically `null` or `false`) as the same
//! thing.

use crate::diff::compare::Comparator;
use crate::diff::model::ChangeRecord;
use crate::errors::DiffError;
use crate::pattern::PathPattern;
use crashdiff_core_types::schema::EVENT_SUPPRESSED;
use serde::Serialize;
use serde_json::Value;

/// Suppresses every change at or below a matching path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pattern: PathPattern,
}

impl IgnoreRule {
    pub fn new(pattern: PathPattern) -> Self {
        Self { pattern }
    }

    /// # Errors
    ///
    /// `InvalidPattern` if `pattern` does not compile.
    pub fn compile(pattern: &str) -> Result<Self, DiffError> {
        PathPattern::compile(pattern).map(Self::new)
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn applies_to(&self, record: &ChangeRecord) -> bool {
        self.pattern.matches_within(&record.path)
    }
}

/// Treats "key absent" and "key present with `equivalent`" as equal.
///
/// Only one-sided records at exactly the matching path are affected.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceRule {
    pattern: PathPattern,
    equivalent: Value,
}

impl AbsenceRule {
    pub fn new(pattern: PathPattern, equivalent: Value) -> Self {
        Self {
            pattern,
            equivalent,
        }
    }

    /// # Errors
    ///
    /// `InvalidPattern` if `pattern` does not compile.
    pub fn compile(pattern: &str, equivalent: Value) -> Result<Self, DiffError> {
        Ok(Self::new(PathPattern::compile(pattern)?, equivalent))
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn equivalent(&self) -> &Value {
        &self.equivalent
    }

    pub fn applies_to(&self, record: &ChangeRecord) -> bool {
        match record.one_sided_value() {
            Some(value) => {
                self.pattern.matches(&record.path) && Comparator::Exact.equal(value, &self.equivalent)
            }
            None => false,
        }
    }
}

/// Why a record was dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SuppressionReason {
    Ignored { pattern: String },
    Absent { pattern: String },
}

impl SuppressionReason {
    pub fn pattern(&self) -> &str {
        match self {
            SuppressionReason::Ignored { pattern } | SuppressionReason::Absent { pattern } => {
                pattern
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suppressed {
    pub record: ChangeRecord,
    pub reason: SuppressionReason,
}

/// Records partitioned by the filter. Both lists keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub kept: Vec<ChangeRecord>,
    pub suppressed: Vec<Suppressed>,
}

/// The configured rule set. Ignore rules are checked before absence rules,
/// each in configuration order; the first rule that applies is reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseFilter {
    ignore: Vec<IgnoreRule>,
    absence: Vec<AbsenceRule>,
}

impl NoiseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore(mut self, rule: IgnoreRule) -> Self {
        self.ignore.push(rule);
        self
    }

    pub fn with_absence(mut self, rule: AbsenceRule) -> Self {
        self.absence.push(rule);
        self
    }

    pub fn ignore_rules(&self) -> &[IgnoreRule] {
        &self.ignore
    }

    pub fn absence_rules(&self) -> &[AbsenceRule] {
        &self.absence
    }

    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.absence.is_empty()
    }

    /// The rule that would drop `record`, if any.
    pub fn check(&self, record: &ChangeRecord) -> Option<SuppressionReason> {
        if let Some(rule) = self.ignore.iter().find(|r| r.applies_to(record)) {
            return Some(SuppressionReason::Ignored {
                pattern: rule.pattern().as_str().to_string(),
            });
        }
        self.absence
            .iter()
            .find(|r| r.applies_to(record))
            .map(|rule| SuppressionReason::Absent {
                pattern: rule.pattern().as_str().to_string(),
            })
    }

    pub fn apply(&self, changes: Vec<ChangeRecord>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for record in changes {
            match self.check(&record) {
                Some(reason) => {
                    tracing::debug!(
                        event = EVENT_SUPPRESSED,
                        path = %record.path,
                        kind = record.kind.label(),
                        pattern = reason.pattern(),
                        "change suppressed"
                    );
                    outcome.suppressed.push(Suppressed { record, reason });
                }
                None => outcome.kept.push(record),
            }
        }
        outcome
    }
}
