#![allow(clippy::unwrap_used, clippy::expect_used)]

use crashdiff_core::config::{CompiledConfig, DiffConfig};
use crashdiff_core::core_types::Path;
use crashdiff_core::diff::{
    align, diff, diff_with, AlignmentStrategy, ChangeKind, ChangeRecord, IgnoreRule, NoiseFilter,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use serde_json::{json, Map, Value};

const FUNCTIONS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z0-9]{0,6}".prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-e]{1,2}", inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn arb_keys() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec("[a-d]".prop_map(Value::String), 0..12)
}

fn frame_value(function: &str, x: i64, line: bool) -> Value {
    let mut frame = Map::new();
    frame.insert("function".to_string(), json!(function));
    frame.insert("x".to_string(), json!(x));
    if line {
        frame.insert("line".to_string(), json!(x * 10));
    }
    Value::Object(frame)
}

/// Frames with repeated and shuffled function names.
fn arb_frames() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-d]", 0..3i64, any::<bool>()), 0..8).prop_map(|items| {
        let frames: Vec<Value> = items
            .iter()
            .map(|(f, x, line)| frame_value(f, *x, *line))
            .collect();
        json!({ "frames": frames })
    })
}

/// Frames whose function names are distinct and in a fixed relative order,
/// so the longest common subsequence is unique.
fn arb_ordered_frames() -> impl Strategy<Value = Value> {
    (
        prop::sample::subsequence(FUNCTIONS.to_vec(), 0..=FUNCTIONS.len()),
        prop::collection::vec(0..3i64, FUNCTIONS.len()),
        prop::collection::vec(any::<bool>(), FUNCTIONS.len()),
    )
        .prop_map(|(names, xs, lines)| {
            let frames: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, f)| frame_value(f, xs[i], lines[i]))
                .collect();
            json!({ "frames": frames })
        })
}

fn frames_config(kind: &str) -> CompiledConfig {
    DiffConfig::from_yaml_str(&format!(
        "alignment: {{ rules: [ {{ path: frames, strategy: {{ kind: {}, key: [function] }} }} ] }}",
        kind
    ))
    .unwrap()
    .compile()
    .unwrap()
}

fn pointer(path: &Path) -> String {
    path.segments()
        .iter()
        .map(|s| match s.as_key() {
            Some(k) => format!("/{}", k.replace('~', "~0").replace('/', "~1")),
            None => format!("/{}", s.as_index().unwrap_or_default()),
        })
        .collect()
}

/// `Added` records must point into the right tree, all others into the left,
/// at the value the record carries.
fn check_paths_resolve(
    changes: &[ChangeRecord],
    left: &Value,
    right: &Value,
) -> Result<(), TestCaseError> {
    for rec in changes {
        let at = pointer(&rec.path);
        let (tree, expected) = match rec.kind {
            ChangeKind::Added => (right, &rec.right),
            _ => (left, &rec.left),
        };
        prop_assert_eq!(tree.pointer(&at), expected.as_ref(), "{} {:?}", rec.path, rec.kind);
    }
    Ok(())
}

fn one_sided(changes: &[ChangeRecord], kind: ChangeKind) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = changes
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| {
            let value = c.one_sided_value().map(Value::to_string).unwrap_or_default();
            (c.path.to_string(), value)
        })
        .collect();
    out.sort();
    out
}

fn two_sided(changes: &[ChangeRecord], swap: bool) -> Vec<(String, String, String)> {
    let mut out: Vec<(String, String, String)> = changes
        .iter()
        .filter(|c| matches!(c.kind, ChangeKind::Changed | ChangeKind::TypeMismatch))
        .map(|c| {
            let l = c.left.as_ref().map(Value::to_string).unwrap_or_default();
            let r = c.right.as_ref().map(Value::to_string).unwrap_or_default();
            let (a, b) = if swap { (r, l) } else { (l, r) };
            (c.kind.label().to_string(), a, b)
        })
        .collect();
    out.sort();
    out
}

/// Added at P forward is Removed at P backward and the reverse; two-sided
/// records carry swapped values.
fn check_mirrored(forward: &[ChangeRecord], backward: &[ChangeRecord]) -> Result<(), TestCaseError> {
    prop_assert_eq!(
        one_sided(forward, ChangeKind::Added),
        one_sided(backward, ChangeKind::Removed)
    );
    prop_assert_eq!(
        one_sided(forward, ChangeKind::Removed),
        one_sided(backward, ChangeKind::Added)
    );
    prop_assert_eq!(two_sided(forward, false), two_sided(backward, true));
    Ok(())
}

proptest! {
    #[test]
    fn prop_diff_is_reflexive(doc in arb_value()) {
        prop_assert!(diff(&doc, &doc).unwrap().is_empty());
    }

    #[test]
    fn prop_positional_diff_is_symmetric(a in arb_value(), b in arb_value()) {
        let forward = diff(&a, &b).unwrap();
        let backward = diff(&b, &a).unwrap();
        prop_assert_eq!(forward.len(), backward.len());

        for rec in &forward {
            let mirror = backward.iter().find(|r| r.path == rec.path);
            prop_assert!(mirror.is_some(), "no mirror for {}", rec.path);
            let mirror = mirror.unwrap();
            let expected_kind = match rec.kind {
                ChangeKind::Added => ChangeKind::Removed,
                ChangeKind::Removed => ChangeKind::Added,
                other => other,
            };
            prop_assert_eq!(mirror.kind, expected_kind);
            prop_assert_eq!(&mirror.left, &rec.right);
            prop_assert_eq!(&mirror.right, &rec.left);
        }
    }

    #[test]
    fn prop_every_change_path_resolves(a in arb_value(), b in arb_value()) {
        check_paths_resolve(&diff(&a, &b).unwrap(), &a, &b)?;
    }

    #[test]
    fn prop_identity_paths_resolve_on_their_side(a in arb_frames(), b in arb_frames()) {
        let changes = diff_with(&a, &b, &frames_config("identity")).unwrap();
        check_paths_resolve(&changes, &a, &b)?;
    }

    #[test]
    fn prop_sorted_paths_resolve_on_their_side(a in arb_frames(), b in arb_frames()) {
        let changes = diff_with(&a, &b, &frames_config("sorted")).unwrap();
        check_paths_resolve(&changes, &a, &b)?;
    }

    #[test]
    fn prop_identity_diff_is_mirrored(a in arb_ordered_frames(), b in arb_ordered_frames()) {
        let config = frames_config("identity");
        let forward = diff_with(&a, &b, &config).unwrap();
        let backward = diff_with(&b, &a, &config).unwrap();
        check_mirrored(&forward, &backward)?;
    }

    #[test]
    fn prop_sorted_diff_is_mirrored(a in arb_frames(), b in arb_frames()) {
        let config = frames_config("sorted");
        let forward = diff_with(&a, &b, &config).unwrap();
        let backward = diff_with(&b, &a, &config).unwrap();
        check_mirrored(&forward, &backward)?;
    }

    #[test]
    fn prop_filter_is_idempotent(a in arb_value(), b in arb_value(), pat in "[a-e]{1,2}") {
        let filter = NoiseFilter::new()
            .with_ignore(IgnoreRule::compile(&format!("**.{}", pat)).unwrap());
        let first = filter.apply(diff(&a, &b).unwrap());
        let second = filter.apply(first.kept.clone());
        prop_assert_eq!(second.kept, first.kept);
        prop_assert!(second.suppressed.is_empty());
    }

    #[test]
    fn prop_identity_alignment_covers_every_index(left in arb_keys(), right in arb_keys()) {
        let strategy = AlignmentStrategy::Identity { key: vec![] };
        let pairs = align(&strategy, &left, &right);
        let mut lefts: Vec<usize> = pairs.iter().filter_map(|p| p.left).collect();
        let mut rights: Vec<usize> = pairs.iter().filter_map(|p| p.right).collect();
        prop_assert!(lefts.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(rights.windows(2).all(|w| w[0] < w[1]));
        lefts.dedup();
        rights.dedup();
        prop_assert_eq!(lefts.len(), left.len());
        prop_assert_eq!(rights.len(), right.len());
        for p in &pairs {
            if let (Some(i), Some(j)) = (p.left, p.right) {
                prop_assert_eq!(&left[i], &right[j]);
            }
        }
    }

    #[test]
    fn prop_single_insertion_is_single_addition(
        base in prop::collection::vec("[a-z]{3}".prop_map(Value::String), 0..10),
        at in any::<prop::sample::Index>(),
    ) {
        // a fresh element that cannot collide with the generated ones
        let mut inserted = base.clone();
        let pos = at.index(base.len() + 1);
        inserted.insert(pos, json!("INSERTED"));

        let config = DiffConfig::from_yaml_str("alignment: { default: { kind: identity, key: [] } }")
            .unwrap()
            .compile()
            .unwrap();
        let changes = diff_with(
            &Value::Array(base),
            &Value::Array(inserted),
            &config,
        )
        .unwrap();
        prop_assert_eq!(changes.len(), 1);
        prop_assert_eq!(changes[0].kind, ChangeKind::Added);
    }
}
