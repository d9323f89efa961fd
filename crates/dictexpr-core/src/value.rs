// Dweve DictExpr - Structured queries over nested JSON documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JMESPath value semantics on top of `serde_json::Value`.
//!
//! Truthiness, type names and the ordering used by `sort`, `max`, `min` and
//! the `*_by` functions all follow JMESPath.

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Returns the JMESPath type name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JMESPath truthiness: `false`, `null`, empty strings, empty arrays and
/// empty objects are false, everything else (including `0`) is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Orders two values of the same sortable type (numbers or strings).
///
/// Returns `None` when the values are not both numbers or both strings.
pub fn compare_sortable(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64()?, y.as_f64()?);
            Some(x.total_cmp(&y))
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// JMESPath equality: numbers compare by value (`8` equals `8.0`), arrays
/// element-wise, objects key-wise regardless of order.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).map_or(false, |y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Returns the keys of an object in ascending order.
///
/// Iteration order of `serde_json::Map` depends on the `preserve_order`
/// feature, so anything that exposes key order sorts explicitly.
pub fn sorted_keys(map: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

/// Rebuilds a value with every object's keys inserted in ascending order.
pub fn canonical(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for key in sorted_keys(map) {
                out.insert(key.clone(), canonical(&map[key.as_str()]));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Converts an `f64` result into a JSON number.
pub(crate) fn number(n: f64) -> Option<Value> {
    serde_json::Number::from_f64(n).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!(0)));
        assert!(is_truthy(&json!("a")));
        assert!(is_truthy(&json!([null])));
    }

    #[test]
    fn test_compare_sortable() {
        assert_eq!(compare_sortable(&json!(1), &json!(2.5)), Some(Ordering::Less));
        assert_eq!(compare_sortable(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_sortable(&json!(1), &json!("a")), None);
        assert_eq!(compare_sortable(&json!(null), &json!(null)), None);
    }

    #[test]
    fn test_values_equal_compares_numbers_by_value() {
        assert!(values_equal(&json!(8.0), &json!(8)));
        assert!(values_equal(&json!([1, {"a": 2.0}]), &json!([1.0, {"a": 2}])));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!values_equal(&json!(1), &json!(true)));
        assert!(!values_equal(&json!("1"), &json!(1)));
    }

    #[test]
    fn test_canonical_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [ {"y": 1, "x": 2} ]});
        let text = serde_json::to_string(&canonical(&value)).unwrap();
        assert_eq!(text, r#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#);
    }
}
