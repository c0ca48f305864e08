#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{config_from_yaml, crash, thread};
use crashdiff_core::core_types::Path;
use crashdiff_core::diff::{
    diff, AbsenceRule, ChangeKind, ChangeRecord, IgnoreRule, NoiseFilter, SuppressionReason,
};
use serde_json::json;

fn offset_and_function_changes() -> Vec<ChangeRecord> {
    let left = crash(vec![thread(&["main", "run"])]);
    let mut right = left.clone();
    right["threads"][0]["frames"][0]["offset"] = json!("0x00002000");
    right["threads"][0]["frames"][1]["function"] = json!("run_inner");
    diff(&left, &right).unwrap()
}

#[test]
fn test_ignore_offsets_keeps_functions() {
    let changes = offset_and_function_changes();
    assert_eq!(changes.len(), 2);

    let filter =
        NoiseFilter::new().with_ignore(IgnoreRule::compile("threads[*].frames[*].offset").unwrap());
    let outcome = filter.apply(changes);

    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(
        outcome.kept[0].path.to_string(),
        "threads[0].frames[1].function"
    );
    assert_eq!(outcome.suppressed.len(), 1);
    assert_eq!(
        outcome.suppressed[0].record.path.to_string(),
        "threads[0].frames[0].offset"
    );
}

#[test]
fn test_ignore_prefix_silences_subtree() {
    let left = crash(vec![]);
    let mut right = left.clone();
    right["modules"][0]["version"] = json!("81.0");
    right["modules"][1]["code_id"] = json!("FFFF");
    right["status"] = json!("ERROR_NO_MINIDUMP_HEADER");

    let filter = NoiseFilter::new().with_ignore(IgnoreRule::compile("modules").unwrap());
    let outcome = filter.apply(diff(&left, &right).unwrap());
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.kept[0].path.to_string(), "status");
    assert_eq!(outcome.suppressed.len(), 2);
}

#[test]
fn test_filtering_is_idempotent() {
    let filter = NoiseFilter::new()
        .with_ignore(IgnoreRule::compile("**.offset").unwrap())
        .with_absence(AbsenceRule::compile("**.line", json!(null)).unwrap());
    let first = filter.apply(offset_and_function_changes());
    let second = filter.apply(first.kept.clone());
    assert_eq!(second.kept, first.kept);
    assert!(second.suppressed.is_empty());
}

#[test]
fn test_absence_rule_for_null_placeholder() {
    let left = json!({"threads": [{"frames": [{"function": "f", "line": null}]}]});
    let right = json!({"threads": [{"frames": [{"function": "f"}]}]});
    let changes = diff(&left, &right).unwrap();
    assert_eq!(changes[0].kind, ChangeKind::Removed);

    let filter = NoiseFilter::new().with_absence(
        AbsenceRule::compile("threads[*].frames[*].line", json!(null)).unwrap(),
    );
    let outcome = filter.apply(changes);
    assert!(outcome.kept.is_empty());
    assert_eq!(
        outcome.suppressed[0].reason,
        SuppressionReason::Absent {
            pattern: "threads[*].frames[*].line".to_string()
        }
    );
}

#[test]
fn test_absence_rule_does_not_hide_real_values() {
    let left = json!({"threads": [{"frames": [{"line": 42}]}]});
    let right = json!({"threads": [{"frames": [{}]}]});
    let filter = NoiseFilter::new().with_absence(
        AbsenceRule::compile("threads[*].frames[*].line", json!(null)).unwrap(),
    );
    let outcome = filter.apply(diff(&left, &right).unwrap());
    assert_eq!(outcome.kept.len(), 1);
}

#[test]
fn test_absence_rule_false_placeholder() {
    let rule = AbsenceRule::compile("modules[*].loaded_symbols", json!(false)).unwrap();
    let path = Path::root().key("modules").index(4).key("loaded_symbols");
    assert!(rule.applies_to(&ChangeRecord::removed(path.clone(), json!(false))));
    assert!(!rule.applies_to(&ChangeRecord::removed(path, json!(true))));
}

#[test]
fn test_first_matching_rule_is_reported() {
    let config = config_from_yaml(
        r#"
ignore: ["threads", "threads[*].frames"]
absent_equivalents: [{ path: "threads[*].frames[*].offset" }]
"#,
    );
    let record = ChangeRecord::removed(
        Path::root()
            .key("threads")
            .index(0)
            .key("frames")
            .index(0)
            .key("offset"),
        json!(null),
    );
    assert_eq!(
        config.filter().check(&record),
        Some(SuppressionReason::Ignored {
            pattern: "threads".to_string()
        })
    );
}

#[test]
fn test_suppression_reason_serializes_tagged() {
    let reason = SuppressionReason::Ignored {
        pattern: "stackwalk_version".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&reason).unwrap(),
        json!({"rule": "ignored", "pattern": "stackwalk_version"})
    );
}
