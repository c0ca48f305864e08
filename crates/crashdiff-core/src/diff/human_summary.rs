//! Human-readable report renderer.
//!
//! Produces a fixed-column text listing, one line per surviving change, laid
//! out as
//!
//! ```text
//! <path padded to path_width>  <left padded to value_width>  <indicator>  <right>
//! ```
//!
//! Changes are grouped under their top-level key. Rendering never fails: a
//! value that cannot be serialized prints as `<unrenderable>`.

use crate::diff::filter::{FilterOutcome, NoiseFilter, Suppressed};
use crate::diff::model::{ChangeKind, ChangeRecord};
use crashdiff_core_types::PathSegment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const UNRENDERABLE: &str = "<unrenderable>";
const ROOT_GROUP: &str = "<root>";

/// Layout knobs for the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportOptions {
    pub path_width: usize,
    /// Longer values are cut and marked with `...[+N chars]`
    pub value_width: usize,
    /// Append suppressed changes in their own section
    pub show_suppressed: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            path_width: 50,
            value_width: 80,
            show_suppressed: false,
        }
    }
}

/// Machine-readable result of a comparison; drives the CLI exit code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_changes: usize,
    pub has_differences: bool,
    pub suppressed_changes: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub type_mismatches: usize,
}

impl DiffSummary {
    pub fn from_outcome(outcome: &FilterOutcome) -> Self {
        let mut summary = DiffSummary {
            total_changes: outcome.kept.len(),
            has_differences: !outcome.kept.is_empty(),
            suppressed_changes: outcome.suppressed.len(),
            ..Default::default()
        };
        for record in &outcome.kept {
            match record.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
                ChangeKind::Changed => summary.changed += 1,
                ChangeKind::TypeMismatch => summary.type_mismatches += 1,
            }
        }
        summary
    }
}

/// Rendered text plus the data it was rendered from.
///
/// `changes` holds the kept records in report order (sorted by path).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub text: String,
    pub summary: DiffSummary,
    pub changes: Vec<ChangeRecord>,
    pub suppressed: Vec<Suppressed>,
}

/// Filter `changes` and render what survives.
pub fn render(
    changes: Vec<ChangeRecord>,
    filter: &NoiseFilter,
    options: &ReportOptions,
) -> DiffReport {
    render_outcome(filter.apply(changes), options)
}

/// Render an already filtered change list.
pub fn render_outcome(mut outcome: FilterOutcome, options: &ReportOptions) -> DiffReport {
    outcome.kept.sort_by(|a, b| a.path.cmp(&b.path));
    outcome.suppressed.sort_by(|a, b| a.record.path.cmp(&b.record.path));
    let summary = DiffSummary::from_outcome(&outcome);

    let mut out = String::new();
    out.push_str(&legend());
    out.push('\n');

    if outcome.kept.is_empty() {
        out.push_str("no differences\n");
    } else {
        let mut groups: BTreeMap<Option<&PathSegment>, Vec<&ChangeRecord>> = BTreeMap::new();
        for record in &outcome.kept {
            groups.entry(record.path.top_level()).or_default().push(record);
        }
        for (group, records) in groups {
            out.push('\n');
            push_line(&mut out, &format!("== {} ==", group_label(group)));
            for record in records {
                push_line(&mut out, &format_record(record, options));
            }
        }
    }

    if options.show_suppressed && !outcome.suppressed.is_empty() {
        out.push('\n');
        push_line(&mut out, "== suppressed ==");
        for item in &outcome.suppressed {
            let line = format!(
                "{}  [{}]",
                format_record(&item.record, options),
                item.reason.pattern()
            );
            push_line(&mut out, &line);
        }
    }

    out.push('\n');
    push_line(&mut out, &summary_line(&summary));

    DiffReport {
        text: out,
        summary,
        changes: outcome.kept,
        suppressed: outcome.suppressed,
    }
}

fn legend() -> String {
    let kinds = [
        ChangeKind::Removed,
        ChangeKind::Added,
        ChangeKind::Changed,
        ChangeKind::TypeMismatch,
    ];
    let parts: Vec<String> = kinds
        .iter()
        .map(|k| format!("{} {}", k.indicator(), k.label()))
        .collect();
    format!("legend: {}\n", parts.join("   "))
}

fn group_label(group: Option<&PathSegment>) -> String {
    match group {
        None => ROOT_GROUP.to_string(),
        Some(PathSegment::Key(key)) => {
            let mut label = String::new();
            match crashdiff_core_types::path::write_key(&mut label, key, true) {
                Ok(()) => label,
                Err(_) => key.clone(),
            }
        }
        Some(PathSegment::Index(i)) => format!("[{}]", i),
    }
}

/// One report line, trailing padding removed.
pub fn format_record(record: &ChangeRecord, options: &ReportOptions) -> String {
    let line = format!(
        "{:<pw$}  {:<vw$}  {}  {}",
        record.path.to_string(),
        render_value(record.left.as_ref(), options.value_width),
        record.kind.indicator(),
        render_value(record.right.as_ref(), options.value_width),
        pw = options.path_width,
        vw = options.value_width,
    );
    line.trim_end().to_string()
}

/// Compact JSON, cut to `width` characters with a count of what was dropped.
pub fn render_value(value: Option<&Value>, width: usize) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let text = match serde_json::to_string(value) {
        Ok(text) => text,
        Err(_) => return UNRENDERABLE.to_string(),
    };
    truncate(&text, width)
}

fn truncate(text: &str, width: usize) -> String {
    let total = text.chars().count();
    if total <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width).collect();
    format!("{}...[+{} chars]", kept, total - width)
}

fn summary_line(summary: &DiffSummary) -> String {
    format!(
        "summary: {} difference(s) ({} added, {} removed, {} changed, {} type mismatch(es)); {} suppressed",
        summary.total_changes,
        summary.added,
        summary.removed,
        summary.changed,
        summary.type_mismatches,
        summary.suppressed_changes
    )
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}
