//! Sequence alignment.
//!
//! Decides which element of the left sequence is compared with which element
//! of the right one. Positional pairing is the default; identity alignment
//! matches elements by a [`FrameKey`] so that one inserted stack frame shows up
//! as one addition instead of a cascade of changes below it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Above this many DP cells the identity strategy switches to a greedy
/// in-order key match.
const MAX_LCS_CELLS: usize = 25_000_000;

const KEY_SEPARATOR: char = '\u{1f}';

/// How the elements of a sequence are paired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentStrategy {
    /// Index i pairs with index i
    #[default]
    Positional,
    /// Longest common subsequence over element fingerprints
    Identity { key: Vec<String> },
    /// Both sides sorted by fingerprint, then paired positionally
    Sorted { key: Vec<String> },
}

/// One aligned slot. At least one side is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl Pair {
    pub fn both(left: usize, right: usize) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn left_only(left: usize) -> Self {
        Self {
            left: Some(left),
            right: None,
        }
    }

    pub fn right_only(right: usize) -> Self {
        Self {
            left: None,
            right: Some(right),
        }
    }
}

/// Fingerprint of a sequence element.
///
/// For a mapping, the compact JSON of each configured field joined in key
/// order; a missing field contributes an empty slot, so `{"line": null}` and
/// `{}` differ. Non-mappings, and any element when no key fields are
/// configured, are fingerprinted whole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameKey(String);

impl FrameKey {
    pub fn of(element: &Value, fields: &[String]) -> Self {
        match element {
            Value::Object(map) if !fields.is_empty() => {
                let mut key = String::new();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        key.push(KEY_SEPARATOR);
                    }
                    if let Some(v) = map.get(field) {
                        key.push_str(&v.to_string());
                    }
                }
                FrameKey(key)
            }
            other => FrameKey(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pair up two sequences.
///
/// Every index of both inputs appears exactly once in the output.
pub fn align(strategy: &AlignmentStrategy, left: &[Value], right: &[Value]) -> Vec<Pair> {
    match strategy {
        AlignmentStrategy::Positional => positional(left.len(), right.len()),
        AlignmentStrategy::Identity { key } => {
            let lk = fingerprints(left, key);
            let rk = fingerprints(right, key);
            identity(&lk, &rk, MAX_LCS_CELLS)
        }
        AlignmentStrategy::Sorted { key } => {
            let lk = fingerprints(left, key);
            let rk = fingerprints(right, key);
            sorted(&lk, &rk)
        }
    }
}

fn fingerprints(items: &[Value], fields: &[String]) -> Vec<FrameKey> {
    items.iter().map(|v| FrameKey::of(v, fields)).collect()
}

fn positional(m: usize, n: usize) -> Vec<Pair> {
    (0..m.max(n))
        .map(|i| Pair {
            left: (i < m).then_some(i),
            right: (i < n).then_some(i),
        })
        .collect()
}

/// Anchors the common prefix and suffix, then matches the middle by LCS, or
/// greedily once the middle needs more than `max_cells` table cells.
fn identity(left: &[FrameKey], right: &[FrameKey], max_cells: usize) -> Vec<Pair> {
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let left_mid = &left[prefix..left.len() - suffix];
    let right_mid = &right[prefix..right.len() - suffix];

    let mut pairs: Vec<Pair> = (0..prefix).map(|i| Pair::both(i, i)).collect();

    let middle = if left_mid.len().saturating_mul(right_mid.len()) > max_cells {
        tracing::debug!(
            left_len = left_mid.len(),
            right_len = right_mid.len(),
            "sequence too long for LCS, using greedy key match"
        );
        greedy_match(left_mid, right_mid)
    } else {
        lcs_match(left_mid, right_mid)
    };
    pairs.extend(middle.into_iter().map(|p| Pair {
        left: p.left.map(|i| i + prefix),
        right: p.right.map(|j| j + prefix),
    }));

    let left_tail = left.len() - suffix;
    let right_tail = right.len() - suffix;
    pairs.extend((0..suffix).map(|k| Pair::both(left_tail + k, right_tail + k)));
    pairs
}

fn lcs_match(left: &[FrameKey], right: &[FrameKey]) -> Vec<Pair> {
    let m = left.len();
    let n = right.len();
    if m == 0 || n == 0 {
        return positional_unpaired(m, n);
    }

    // dp[i][j] = LCS length of left[i..] and right[j..], row-major
    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i * width + j] = if left[i] == right[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(m.max(n));
    let mut i = 0usize;
    let mut j = 0usize;
    while i < m && j < n {
        if left[i] == right[j] {
            pairs.push(Pair::both(i, j));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            pairs.push(Pair::left_only(i));
            i += 1;
        } else {
            pairs.push(Pair::right_only(j));
            j += 1;
        }
    }
    pairs.extend((i..m).map(Pair::left_only));
    pairs.extend((j..n).map(Pair::right_only));
    pairs
}

/// In-order match: each left element takes the earliest unused right element
/// with the same key after the previous match.
fn greedy_match(left: &[FrameKey], right: &[FrameKey]) -> Vec<Pair> {
    let mut positions: HashMap<&FrameKey, Vec<usize>> = HashMap::new();
    for (j, key) in right.iter().enumerate() {
        positions.entry(key).or_default().push(j);
    }

    let mut pairs = Vec::with_capacity(left.len().max(right.len()));
    let mut next_right = 0usize;
    for (i, key) in left.iter().enumerate() {
        let found = positions.get(key).and_then(|list| {
            let at = list.partition_point(|&j| j < next_right);
            list.get(at).copied()
        });
        match found {
            Some(j) => {
                pairs.extend((next_right..j).map(Pair::right_only));
                pairs.push(Pair::both(i, j));
                next_right = j + 1;
            }
            None => pairs.push(Pair::left_only(i)),
        }
    }
    pairs.extend((next_right..right.len()).map(Pair::right_only));
    pairs
}

fn positional_unpaired(m: usize, n: usize) -> Vec<Pair> {
    (0..m)
        .map(Pair::left_only)
        .chain((0..n).map(Pair::right_only))
        .collect()
}

fn sorted(left: &[FrameKey], right: &[FrameKey]) -> Vec<Pair> {
    let mut lorder: Vec<usize> = (0..left.len()).collect();
    let mut rorder: Vec<usize> = (0..right.len()).collect();
    lorder.sort_by(|&a, &b| left[a].cmp(&left[b]));
    rorder.sort_by(|&a, &b| right[a].cmp(&right[b]));

    let m = lorder.len();
    let n = rorder.len();
    (0..m.max(n))
        .map(|k| Pair {
            left: lorder.get(k).copied(),
            right: rorder.get(k).copied(),
        })
        .collect()
}
