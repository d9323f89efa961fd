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

//! Property-based tests for expression evaluation using proptest.
//!
//! Covers the algebraic properties of the navigation and array functions:
//! - Slicing with a unit step matches clamped range indexing
//! - Negative indices address the same element as their positive mirror
//! - `reverse` is an involution and `sort` yields an ordered permutation
//! - Complementary filters partition an array

use dictexpr_core::{field, identity, lit};
use proptest::prelude::*;
use serde_json::{json, Value};

// ===== Generators =====

fn int_array() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1000i64..1000, 0..40)
}

fn doc(items: &[i64]) -> Value {
    json!({ "xs": items })
}

/// Clamps a slice endpoint the way a unit-step slice does.
fn clamp(len: i64, endpoint: i64) -> usize {
    let shifted = if endpoint < 0 { endpoint + len } else { endpoint };
    shifted.clamp(0, len) as usize
}

// ===== Properties =====

proptest! {
    #[test]
    fn prop_unit_slice_matches_range(items in int_array(), start in -50i64..50, stop in -50i64..50) {
        let len = items.len() as i64;
        let (from, to) = (clamp(len, start), clamp(len, stop));
        let expected: Vec<i64> = if from < to { items[from..to].to_vec() } else { Vec::new() };

        let got = field("xs").slice(Some(start), Some(stop), None).search(&doc(&items)).unwrap();
        prop_assert_eq!(got, json!(expected));
    }

    #[test]
    fn prop_full_reverse_slice_is_reverse(items in int_array()) {
        let d = doc(&items);
        let sliced = field("xs").slice(None, None, Some(-1)).search(&d).unwrap();
        let reversed = field("xs").reverse().search(&d).unwrap();
        prop_assert_eq!(sliced, reversed);
    }

    #[test]
    fn prop_negative_index_mirrors_positive(items in prop::collection::vec(-1000i64..1000, 1..40), offset in 0usize..40) {
        let len = items.len();
        let i = offset % len;
        let d = doc(&items);
        let positive = field("xs").index(i as i64).search(&d).unwrap();
        let negative = field("xs").index(i as i64 - len as i64).search(&d).unwrap();
        prop_assert_eq!(&positive, &json!(items[i]));
        prop_assert_eq!(positive, negative);
    }

    #[test]
    fn prop_out_of_range_index_is_null(items in int_array(), extra in 0i64..10) {
        let len = items.len() as i64;
        let d = doc(&items);
        prop_assert_eq!(field("xs").index(len + extra).search(&d).unwrap(), Value::Null);
        prop_assert_eq!(field("xs").index(-len - 1 - extra).search(&d).unwrap(), Value::Null);
    }

    #[test]
    fn prop_reverse_is_involution(items in int_array()) {
        let got = field("xs").reverse().reverse().search(&doc(&items)).unwrap();
        prop_assert_eq!(got, json!(items));
    }

    #[test]
    fn prop_sort_is_ordered_permutation(items in int_array()) {
        let got = field("xs").sort().search(&doc(&items)).unwrap();
        let mut expected = items.clone();
        expected.sort();
        prop_assert_eq!(got, json!(expected));
    }

    #[test]
    fn prop_filters_partition(items in int_array(), pivot in -1000i64..1000) {
        let d = doc(&items);
        let above = field("xs").filter(identity().gt(pivot)).length().search(&d).unwrap();
        let rest = field("xs").filter(identity().gt(pivot).not()).length().search(&d).unwrap();
        let total = above.as_u64().unwrap() + rest.as_u64().unwrap();
        prop_assert_eq!(total, items.len() as u64);
    }

    #[test]
    fn prop_max_and_min_bound_every_element(items in prop::collection::vec(-1000i64..1000, 1..40)) {
        let d = doc(&items);
        let max = field("xs").max().search(&d).unwrap().as_i64().unwrap();
        let min = field("xs").min().search(&d).unwrap().as_i64().unwrap();
        prop_assert!(items.iter().all(|x| min <= *x && *x <= max));
        prop_assert!(items.contains(&max) && items.contains(&min));
    }

    #[test]
    fn prop_literal_ignores_input(items in int_array(), value in any::<i32>()) {
        prop_assert_eq!(lit(value).search(&doc(&items)).unwrap(), json!(value));
    }
}
