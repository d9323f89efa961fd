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

//! Speedup aggregation.
//!
//! Turns raw latency pairs into one row per case: the speedup
//! (reference latency / candidate latency) for every document size and the
//! mean across sizes. Rows are ordered fastest first.

use crate::core::measurement::median_f64;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Median latencies of both evaluators for one case on one document size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    /// Case name.
    pub case_name: String,
    /// Document size the latencies were measured on.
    pub document_size: usize,
    /// Candidate median latency.
    pub candidate_latency: Duration,
    /// Reference median latency.
    pub reference_latency: Duration,
}

impl SamplePair {
    /// Creates a sample pair.
    pub fn new(
        case_name: impl Into<String>,
        document_size: usize,
        candidate_latency: Duration,
        reference_latency: Duration,
    ) -> Self {
        Self {
            case_name: case_name.into(),
            document_size,
            candidate_latency,
            reference_latency,
        }
    }

    /// Reference latency divided by candidate latency.
    ///
    /// A zero candidate latency yields `+inf`, or `1.0` when both are zero.
    pub fn speedup(&self) -> f64 {
        let candidate = self.candidate_latency.as_secs_f64();
        let reference = self.reference_latency.as_secs_f64();
        if candidate == 0.0 {
            if reference == 0.0 {
                1.0
            } else {
                f64::INFINITY
            }
        } else {
            reference / candidate
        }
    }
}

/// Speedups of one case across document sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    /// Case name.
    pub case_name: String,
    /// Speedup per document size; sizes never measured are absent.
    pub speedup_by_size: BTreeMap<usize, f64>,
    /// Mean of the per-size speedups.
    pub average_speedup: f64,
}

impl AggregatedRow {
    /// Speedup for a size, if it was measured.
    pub fn speedup(&self, size: usize) -> Option<f64> {
        self.speedup_by_size.get(&size).copied()
    }
}

/// Aggregated rows plus the size columns observed across all samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// Sorted union of the observed document sizes.
    pub sizes: Vec<usize>,
    /// One row per case, by descending average speedup then name.
    pub rows: Vec<AggregatedRow>,
}

impl Aggregation {
    /// Returns whether no samples were aggregated.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Groups samples by case and size and computes speedups.
///
/// Several pairs for the same case and size collapse to the median of their
/// speedups. The result does not depend on the order of `samples`.
///
/// # Example
///
/// ```
/// use dictexpr_bench::harness::aggregator::{aggregate, SamplePair};
/// use std::time::Duration;
///
/// let ms = Duration::from_millis;
/// let agg = aggregate(&[
///     SamplePair::new("q", 10, ms(5), ms(10)),
///     SamplePair::new("q", 20, ms(5), ms(20)),
/// ]);
/// assert_eq!(agg.sizes, vec![10, 20]);
/// assert_eq!(agg.rows[0].average_speedup, 3.0);
/// ```
pub fn aggregate(samples: &[SamplePair]) -> Aggregation {
    let mut grouped: BTreeMap<&str, BTreeMap<usize, Vec<f64>>> = BTreeMap::new();
    let mut sizes = BTreeSet::new();

    for sample in samples {
        sizes.insert(sample.document_size);
        grouped
            .entry(sample.case_name.as_str())
            .or_default()
            .entry(sample.document_size)
            .or_default()
            .push(sample.speedup());
    }

    let mut rows: Vec<AggregatedRow> = grouped
        .into_iter()
        .map(|(case_name, by_size)| {
            let speedup_by_size: BTreeMap<usize, f64> = by_size
                .into_iter()
                .filter_map(|(size, mut ratios)| median_f64(&mut ratios).map(|r| (size, r)))
                .collect();
            let average_speedup =
                speedup_by_size.values().sum::<f64>() / speedup_by_size.len() as f64;
            AggregatedRow {
                case_name: case_name.to_string(),
                speedup_by_size,
                average_speedup,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.average_speedup
            .total_cmp(&a.average_speedup)
            .then_with(|| a.case_name.cmp(&b.case_name))
    });

    Aggregation {
        sizes: sizes.into_iter().collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn pair(name: &str, size: usize, candidate: u64, reference: u64) -> SamplePair {
        SamplePair::new(name, size, ms(candidate), ms(reference))
    }

    #[test]
    fn test_speedup_ratio() {
        assert_eq!(pair("a", 1, 5, 10).speedup(), 2.0);
        assert_eq!(pair("a", 1, 10, 5).speedup(), 0.5);
        assert_eq!(pair("a", 1, 0, 5).speedup(), f64::INFINITY);
        assert_eq!(pair("a", 1, 0, 0).speedup(), 1.0);
    }

    #[test]
    fn test_average_of_sizes() {
        let agg = aggregate(&[pair("q", 50, 5, 10), pair("q", 200, 5, 20)]);
        assert_eq!(agg.rows.len(), 1);
        assert_eq!(agg.rows[0].speedup(50), Some(2.0));
        assert_eq!(agg.rows[0].speedup(200), Some(4.0));
        assert_eq!(agg.rows[0].average_speedup, 3.0);
    }

    #[test]
    fn test_missing_sizes_are_absent() {
        let agg = aggregate(&[pair("a", 50, 5, 10), pair("a", 200, 5, 10), pair("b", 50, 5, 5)]);
        assert_eq!(agg.sizes, vec![50, 200]);
        let b = agg.rows.iter().find(|r| r.case_name == "b").unwrap();
        assert_eq!(b.speedup(200), None);
        assert_eq!(b.average_speedup, 1.0);
    }

    #[test]
    fn test_sorted_desc_then_by_name() {
        let agg = aggregate(&[
            pair("slow", 1, 10, 5),
            pair("tie-b", 1, 5, 5),
            pair("fast", 1, 5, 10),
            pair("tie-a", 1, 5, 5),
        ]);
        let names: Vec<&str> = agg.rows.iter().map(|r| r.case_name.as_str()).collect();
        assert_eq!(names, ["fast", "tie-a", "tie-b", "slow"]);
    }

    #[test]
    fn test_duplicates_collapse_to_median() {
        let agg = aggregate(&[
            pair("q", 1, 10, 10),
            pair("q", 1, 10, 30),
            pair("q", 1, 10, 20),
        ]);
        assert_eq!(agg.rows[0].speedup(1), Some(2.0));
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert!(agg.is_empty());
        assert!(agg.sizes.is_empty());
    }
}
