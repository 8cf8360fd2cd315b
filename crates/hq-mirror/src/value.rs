//! Comparison of machine values.
//!
//! `serde_json::Value` equality distinguishes `1` from `1.0`; leaves compare
//! numerically instead so that a write of an equal number is not an edit.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Order two machine values of the same kind. Mixed kinds and containers are
/// unordered.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return Some(x.cmp(&y));
    }
    x.as_f64()?.partial_cmp(&y.as_f64()?)
}

/// Value equality with numeric comparison for numbers.
pub fn equivalent(a: &Value, b: &Value) -> bool {
    match compare(a, b) {
        Some(ord) => ord == Ordering::Equal,
        None => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(equivalent(&json!(1), &json!(1.0)));
        assert_eq!(compare(&json!(2), &json!(10)), Some(Ordering::Less));
        assert_eq!(compare(&json!(2.5), &json!(2)), Some(Ordering::Greater));
        assert_eq!(compare(&json!(u64::MAX), &json!(1)), Some(Ordering::Greater));
    }

    #[test]
    fn test_mixed_kinds_unordered() {
        assert_eq!(compare(&json!(1), &json!("1")), None);
        assert!(!equivalent(&json!(1), &json!("1")));
        assert!(!equivalent(&Value::Null, &json!(0)));
    }

    #[test]
    fn test_containers_fall_back_to_structural_equality() {
        assert_eq!(compare(&json!([1]), &json!([1])), None);
        assert!(equivalent(&json!([1, 2]), &json!([1, 2])));
        assert!(!equivalent(&json!({"a": 1}), &json!({"a": 2})));
    }

    #[test]
    fn test_strings_and_bools() {
        assert_eq!(compare(&json!("a"), &json!("b")), Some(Ordering::Less));
        assert_eq!(compare(&json!(false), &json!(true)), Some(Ordering::Less));
        assert!(equivalent(&Value::Null, &Value::Null));
    }
}
