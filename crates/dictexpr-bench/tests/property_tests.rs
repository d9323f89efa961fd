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

//! Property-based tests for aggregation, equivalence and report rewriting.

use dictexpr_bench::harness::{aggregate, first_divergence, SamplePair, Tolerance};
use dictexpr_bench::reporters::{ReportWriter, END_MARKER, START_MARKER};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

fn arb_samples() -> impl Strategy<Value = Vec<SamplePair>> {
    prop::collection::vec(
        (0usize..4, prop::sample::select(vec![10usize, 50, 200]), 1u64..500, 1u64..500),
        0..30,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(case, size, candidate, reference)| {
                SamplePair::new(
                    format!("case-{}", case),
                    size,
                    Duration::from_micros(candidate),
                    Duration::from_micros(reference),
                )
            })
            .collect()
    })
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        (-1000.0f64..1000.0).prop_map(|f| json!(f)),
        "[a-z]{0,6}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_aggregation_ignores_sample_order(samples in arb_samples(), rotate in 0usize..30) {
        let forward = aggregate(&samples);

        let mut reversed = samples.clone();
        reversed.reverse();
        prop_assert_eq!(&aggregate(&reversed), &forward);

        let mut rotated = samples.clone();
        if !rotated.is_empty() {
            let by = rotate % rotated.len();
            rotated.rotate_left(by);
        }
        prop_assert_eq!(&aggregate(&rotated), &forward);
    }

    #[test]
    fn prop_rows_sorted_by_average_desc(samples in arb_samples()) {
        let agg = aggregate(&samples);
        for pair in agg.rows.windows(2) {
            prop_assert!(pair[0].average_speedup >= pair[1].average_speedup);
        }
        for row in &agg.rows {
            for size in row.speedup_by_size.keys() {
                prop_assert!(agg.sizes.contains(size));
            }
        }
    }

    #[test]
    fn prop_equivalence_is_reflexive(value in arb_json()) {
        prop_assert_eq!(first_divergence(&value, &value, &Tolerance::EXACT), None);
    }

    #[test]
    fn prop_equivalence_is_symmetric(a in arb_json(), b in arb_json()) {
        let tol = Tolerance::default();
        prop_assert_eq!(
            first_divergence(&a, &b, &tol).is_none(),
            first_divergence(&b, &a, &tol).is_none()
        );
    }

    #[test]
    fn prop_report_rewrite_is_idempotent(
        lines in prop::collection::vec("[ -~]{0,20}", 0..6),
        table in "(\\| [a-z0-9.]{1,6} \\|\n){1,4}",
    ) {
        let prose = lines.join("\n");
        let once = ReportWriter.write(&table, &prose).unwrap();
        let twice = ReportWriter.write(&table, &once).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.starts_with(&prose));
        prop_assert_eq!(once.lines().filter(|l| l.trim() == START_MARKER).count(), 1);
        prop_assert_eq!(once.lines().filter(|l| l.trim() == END_MARKER).count(), 1);
    }

    #[test]
    fn prop_report_rewrite_preserves_outside(
        before in "[a-z ]{0,20}\n",
        after in "[a-z ]{0,20}\n",
        old in "[a-z]{0,10}\n",
        table in "[a-z]{1,10}\n",
    ) {
        let target = format!("{}{}\n{}{}\n{}", before, START_MARKER, old, END_MARKER, after);
        let out = ReportWriter.write(&table, &target).unwrap();
        prop_assert_eq!(out, format!("{}{}\n{}{}\n{}", before, START_MARKER, table, END_MARKER, after));
    }
}
