//! Scalar equality rules.

use crate::errors::DiffError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How two scalars at a path are judged equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Comparator {
    /// Structural equality; numbers compare by value, so `1` equals `1.0`
    #[default]
    Exact,
    /// Hexadecimal integers: `"0x1A"`, `"0x001a"` and `26` are equal
    Hex,
    /// Numbers within `epsilon` of each other are equal
    Tolerance { epsilon: f64 },
}

impl Comparator {
    /// Reject parameters that can never compare sensibly.
    ///
    /// # Errors
    ///
    /// `InvalidRule` naming `pattern` for a negative or non-finite epsilon.
    pub fn validate(&self, pattern: &str) -> Result<(), DiffError> {
        match self {
            Comparator::Tolerance { epsilon } if !epsilon.is_finite() || *epsilon < 0.0 => {
                Err(DiffError::InvalidRule {
                    pattern: pattern.to_string(),
                    reason: format!("tolerance epsilon must be finite and >= 0, got {}", epsilon),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn equal(&self, left: &Value, right: &Value) -> bool {
        match self {
            Comparator::Exact => exact_equal(left, right),
            Comparator::Hex => match (hex_value(left), hex_value(right)) {
                (Some(a), Some(b)) => a == b,
                _ => exact_equal(left, right),
            },
            Comparator::Tolerance { epsilon } => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => (a - b).abs() <= *epsilon,
                _ => exact_equal(left, right),
            },
        }
    }
}

fn exact_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                x == y
            } else {
                a.as_f64() == b.as_f64()
            }
        }
        _ => left == right,
    }
}

/// Interpret a value as a hexadecimal integer, with or without `0x`.
fn hex_value(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s);
            u128::from_str_radix(digits, 16).ok()
        }
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}
