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

//! Markdown rendering of aggregated speedups.

use crate::harness::aggregator::Aggregation;
use std::fmt::Write;

/// Formats one speedup cell.
pub fn format_speedup(speedup: f64) -> String {
    if speedup.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", speedup)
    }
}

/// Renders the speedup table: one column per document size plus the
/// average, one row per case in aggregation order. Sizes a case was not
/// measured on render as `-`.
///
/// # Example
///
/// ```
/// use dictexpr_bench::harness::aggregator::{aggregate, SamplePair};
/// use dictexpr_bench::reporters::markdown::render_table;
/// use std::time::Duration;
///
/// let ms = Duration::from_millis;
/// let table = render_table(&aggregate(&[SamplePair::new("q", 50, ms(5), ms(10))]));
/// assert_eq!(
///     table,
///     "| query | 50 | average_speedup |\n|---|---:|---:|\n| q | 2.00 | 2.00 |\n"
/// );
/// ```
pub fn render_table(aggregation: &Aggregation) -> String {
    let mut md = String::new();

    md.push_str("| query |");
    for size in &aggregation.sizes {
        let _ = write!(md, " {} |", size);
    }
    md.push_str(" average_speedup |\n");

    md.push_str("|---|");
    for _ in &aggregation.sizes {
        md.push_str("---:|");
    }
    md.push_str("---:|\n");

    for row in &aggregation.rows {
        let _ = write!(md, "| {} |", row.case_name);
        for size in &aggregation.sizes {
            let cell = row
                .speedup(*size)
                .map(format_speedup)
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(md, " {} |", cell);
        }
        let _ = writeln!(md, " {} |", format_speedup(row.average_speedup));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::aggregator::{aggregate, SamplePair};
    use std::time::Duration;

    fn pair(name: &str, size: usize, candidate: u64, reference: u64) -> SamplePair {
        SamplePair::new(
            name,
            size,
            Duration::from_millis(candidate),
            Duration::from_millis(reference),
        )
    }

    #[test]
    fn test_table_layout() {
        let agg = aggregate(&[
            pair("fast", 50, 5, 10),
            pair("fast", 200, 5, 20),
            pair("slow", 50, 10, 5),
        ]);
        let table = render_table(&agg);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| query | 50 | 200 | average_speedup |");
        assert_eq!(lines[1], "|---|---:|---:|---:|");
        assert_eq!(lines[2], "| fast | 2.00 | 4.00 | 3.00 |");
        assert_eq!(lines[3], "| slow | 0.50 | - | 0.50 |");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_empty_aggregation_renders_header() {
        let table = render_table(&aggregate(&[]));
        assert_eq!(table, "| query | average_speedup |\n|---|---:|\n");
    }

    #[test]
    fn test_infinite_speedup() {
        assert_eq!(format_speedup(f64::INFINITY), "inf");
        assert_eq!(format_speedup(1.0 / 3.0), "0.33");
    }
}
