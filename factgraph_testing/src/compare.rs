//! Order-insensitive structural comparison of component results

use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("{path}: expected a skip result, got {found}")]
    ExpectedSkip { path: String, found: Value },

    #[error("{path}: kind mismatch, result is {result} but expected {expected}")]
    KindMismatch {
        path: String,
        result: &'static str,
        expected: &'static str,
    },

    #[error("{path}: length mismatch, result has {result} but expected {expected}")]
    LengthMismatch {
        path: String,
        result: usize,
        expected: usize,
    },

    #[error("{path}: key '{key}' not present in expected")]
    MissingKey { path: String, key: String },

    #[error("{path}: {result} != {expected}")]
    ValueMismatch {
        path: String,
        result: Value,
        expected: Value,
    },
}

impl CompareError {
    /// JSON path of the element that failed
    pub fn path(&self) -> &str {
        match self {
            Self::ExpectedSkip { path, .. }
            | Self::KindMismatch { path, .. }
            | Self::LengthMismatch { path, .. }
            | Self::MissingKey { path, .. }
            | Self::ValueMismatch { path, .. } => path,
        }
    }
}

/// Deep-compare a result with its expectation, ignoring the order of arrays
/// at every nesting level.
///
/// An object result against an absent (null) expectation passes only when
/// the result is tagged as a skip.
pub fn unordered_compare(result: &Value, expected: &Value) -> Result<(), CompareError> {
    compare_at("$", result, expected)
}

fn compare_at(path: &str, result: &Value, expected: &Value) -> Result<(), CompareError> {
    if let (Value::Object(map), Value::Null) = (result, expected) {
        return if map.get("type").and_then(Value::as_str) == Some("skip") {
            Ok(())
        } else {
            Err(CompareError::ExpectedSkip {
                path: path.to_string(),
                found: result.clone(),
            })
        };
    }

    let (result_kind, expected_kind) = (kind(result), kind(expected));
    if result_kind != expected_kind {
        return Err(CompareError::KindMismatch {
            path: path.to_string(),
            result: result_kind,
            expected: expected_kind,
        });
    }

    match (result, expected) {
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return Err(CompareError::LengthMismatch {
                    path: path.to_string(),
                    result: left.len(),
                    expected: right.len(),
                });
            }

            let mut left: Vec<&Value> = left.iter().collect();
            let mut right: Vec<&Value> = right.iter().collect();
            left.sort_by(|a, b| canonical_cmp(a, b));
            right.sort_by(|a, b| canonical_cmp(a, b));

            for (index, (l, r)) in left.into_iter().zip(right).enumerate() {
                compare_at(&format!("{}[{}]", path, index), l, r)?;
            }
            Ok(())
        }
        (Value::Object(left), Value::Object(right)) => {
            if left.len() != right.len() {
                return Err(CompareError::LengthMismatch {
                    path: path.to_string(),
                    result: left.len(),
                    expected: right.len(),
                });
            }

            for (key, value) in left {
                let child = format!("{}.{}", path, key);
                let other = right.get(key).ok_or_else(|| CompareError::MissingKey {
                    path: path.to_string(),
                    key: key.clone(),
                })?;
                compare_at(&child, value, other)?;
            }
            Ok(())
        }
        _ if result == expected => Ok(()),
        _ => Err(CompareError::ValueMismatch {
            path: path.to_string(),
            result: result.clone(),
            expected: expected.clone(),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values used to line up array elements
fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            let mut x: Vec<&Value> = x.iter().collect();
            let mut y: Vec<&Value> = y.iter().collect();
            x.sort_by(|a, b| canonical_cmp(a, b));
            y.sort_by(|a, b| canonical_cmp(a, b));
            x.iter()
                .zip(y.iter())
                .map(|(l, r)| canonical_cmp(l, r))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| x.len().cmp(&y.len()))
        }
        (Value::Object(x), Value::Object(y)) => {
            let mut x: Vec<(&String, &Value)> = x.iter().collect();
            let mut y: Vec<(&String, &Value)> = y.iter().collect();
            x.sort_by(|a, b| a.0.cmp(b.0));
            y.sort_by(|a, b| a.0.cmp(b.0));
            x.iter()
                .zip(y.iter())
                .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| canonical_cmp(lv, rv)))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| x.len().cmp(&y.len()))
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_list_order_ignored() {
        assert!(unordered_compare(&json!([1, 2]), &json!([2, 1])).is_ok());
        assert_matches!(
            unordered_compare(&json!([1, 2]), &json!([1, 2, 3])),
            Err(CompareError::LengthMismatch { .. })
        );
    }

    #[test]
    fn test_nested_lists_in_objects() {
        let result = json!({"groups": [["b", "a"], ["c"]], "n": 1});
        let expected = json!({"n": 1, "groups": [["c"], ["a", "b"]]});
        assert!(unordered_compare(&result, &expected).is_ok());
    }

    #[test]
    fn test_skip_against_absent_expectation() {
        assert!(unordered_compare(&json!({"type": "skip", "reason": "x"}), &Value::Null).is_ok());
        assert_matches!(
            unordered_compare(&json!({"type": "rule"}), &Value::Null),
            Err(CompareError::ExpectedSkip { .. })
        );
    }

    #[test]
    fn test_kinds_must_match() {
        assert_matches!(
            unordered_compare(&json!(1), &json!(1.0)),
            Err(CompareError::KindMismatch {
                result: "integer",
                expected: "float",
                ..
            })
        );
        assert_matches!(
            unordered_compare(&json!("1"), &json!(1)),
            Err(CompareError::KindMismatch { .. })
        );
    }

    #[test]
    fn test_error_carries_path() {
        let result = json!({"Ip": {"DefaultTTL": 64}});
        let expected = json!({"Ip": {"DefaultTTL": 63}});
        let error = unordered_compare(&result, &expected).unwrap_err();
        assert_eq!(error.path(), "$.Ip.DefaultTTL");

        let error = unordered_compare(&json!({"a": 1}), &json!({"b": 1})).unwrap_err();
        assert_matches!(error, CompareError::MissingKey { ref key, .. } if key == "a");
    }

    #[test]
    fn test_mixed_arrays_sort_consistently() {
        let result = json!([{"k": 2}, "x", 3, null, [2, 1]]);
        let expected = json!([[1, 2], null, 3, "x", {"k": 2}]);
        assert!(unordered_compare(&result, &expected).is_ok());
    }
}
