//! Comparison configuration.
//!
//! [`DiffConfig`] is the serde shape operators write (YAML or JSON).
//! [`CompiledConfig`] is what the engine runs with: every path pattern
//! compiled and every rule validated, so a bad rule fails before any document
//! is read.
//!
//! ```yaml
//! root_key: json_dump
//! ignore: ["stackwalk_version"]
//! absent_equivalents:
//!   - { path: "threads[*].frames[*].line", value: null }
//! comparators:
//!   - { path: "**.offset", compare: { kind: hex } }
//! alignment:
//!   rules:
//!     - { path: "threads[*].frames", strategy: { kind: identity, key: [function] } }
//! ```

use crate::diff::align::AlignmentStrategy;
use crate::diff::compare::Comparator;
use crate::diff::filter::{AbsenceRule, IgnoreRule, NoiseFilter};
use crate::diff::human_summary::ReportOptions;
use crate::errors::{DiffError, ExError, Result};
use crate::pattern::PathPattern;
use crate::value::Limits;
use crashdiff_core_types::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static EXACT: Comparator = Comparator::Exact;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Compare the subtree under this key when the document root has it
    pub root_key: Option<String>,
    pub ignore: Vec<String>,
    pub absent_equivalents: Vec<AbsentEquivalent>,
    pub comparators: Vec<ComparatorRule>,
    pub alignment: AlignmentConfig,
    pub limits: Limits,
    pub report: ReportOptions,
}

/// A missing key at `path` is equivalent to the key holding `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbsentEquivalent {
    pub path: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparatorRule {
    pub path: String,
    pub compare: Comparator,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignmentConfig {
    pub default: AlignmentStrategy,
    /// Checked in order against a sequence's own path; first match wins
    pub rules: Vec<AlignmentRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentRule {
    pub path: String,
    pub strategy: AlignmentStrategy,
}

impl DiffConfig {
    /// # Errors
    ///
    /// `InvalidConfig` if the text is not a valid configuration document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| ExError::from(DiffError::from(e)).with_op("load_config"))
    }

    /// # Errors
    ///
    /// `InvalidConfig` if the text is not a valid configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ExError::from(DiffError::from(e)).with_op("load_config"))
    }

    /// Compile every pattern and validate every rule.
    ///
    /// # Errors
    ///
    /// `InvalidRule` carrying the offending pattern; `InvalidConfig` for
    /// unusable limits.
    pub fn compile(&self) -> Result<CompiledConfig> {
        self.compile_inner()
            .map_err(|e| ExError::from(e).with_op("compile_config"))
    }

    fn compile_inner(&self) -> std::result::Result<CompiledConfig, DiffError> {
        if self.limits.max_nodes == 0 {
            return Err(DiffError::InvalidConfig {
                reason: "limits.max_nodes must be at least 1".to_string(),
            });
        }

        let mut filter = NoiseFilter::new();
        for pattern in &self.ignore {
            filter = filter.with_ignore(IgnoreRule::compile(pattern)?);
        }
        for rule in &self.absent_equivalents {
            filter = filter.with_absence(AbsenceRule::compile(&rule.path, rule.value.clone())?);
        }

        let comparators = self
            .comparators
            .iter()
            .map(|rule| -> std::result::Result<_, DiffError> {
                rule.compare.validate(&rule.path)?;
                Ok((PathPattern::compile(&rule.path)?, rule.compare.clone()))
            })
            .collect::<std::result::Result<Vec<_>, DiffError>>()?;

        let alignment_rules = self
            .alignment
            .rules
            .iter()
            .map(|rule| -> std::result::Result<_, DiffError> {
                Ok((PathPattern::compile(&rule.path)?, rule.strategy.clone()))
            })
            .collect::<std::result::Result<Vec<_>, DiffError>>()?;

        Ok(CompiledConfig {
            root_key: self.root_key.clone(),
            comparators,
            default_alignment: self.alignment.default.clone(),
            alignment_rules,
            filter,
            limits: self.limits,
            report: self.report,
        })
    }
}

/// Rule totals for a compiled configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounts {
    pub ignore: usize,
    pub absent_equivalents: usize,
    pub comparators: usize,
    pub alignment: usize,
}

/// A validated configuration, ready to drive comparisons.
///
/// The default is the empty configuration: exact comparison, positional
/// alignment, no rules, default limits.
#[derive(Debug, Clone, Default)]
pub struct CompiledConfig {
    root_key: Option<String>,
    comparators: Vec<(PathPattern, Comparator)>,
    default_alignment: AlignmentStrategy,
    alignment_rules: Vec<(PathPattern, AlignmentStrategy)>,
    filter: NoiseFilter,
    limits: Limits,
    report: ReportOptions,
}

impl CompiledConfig {
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    /// First comparator whose pattern matches `path` exactly; else exact.
    pub fn comparator_for(&self, path: &Path) -> &Comparator {
        self.comparators
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, comparator)| comparator)
            .unwrap_or(&EXACT)
    }

    /// Strategy for the sequence at `path`.
    pub fn alignment_for(&self, path: &Path) -> &AlignmentStrategy {
        self.alignment_rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, strategy)| strategy)
            .unwrap_or(&self.default_alignment)
    }

    pub fn filter(&self) -> &NoiseFilter {
        &self.filter
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn report(&self) -> &ReportOptions {
        &self.report
    }

    pub fn rule_counts(&self) -> RuleCounts {
        RuleCounts {
            ignore: self.filter.ignore_rules().len(),
            absent_equivalents: self.filter.absence_rules().len(),
            comparators: self.comparators.len(),
            alignment: self.alignment_rules.len(),
        }
    }
}
