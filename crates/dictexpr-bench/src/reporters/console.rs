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

//! Console reporter for run outcomes.

use crate::harness::runner::RunOutcome;
use crate::reporters::markdown::format_speedup;

/// Prints the speedup table of a run.
pub fn print_summary(outcome: &RunOutcome) {
    let agg = &outcome.aggregation;
    println!("\n{}", "=".repeat(60));
    println!("SUMMARY: {} checks passed", outcome.checked);
    println!("{}", "=".repeat(60));

    if agg.is_empty() {
        println!("No timing samples (quick run).");
        println!("{}\n", "=".repeat(60));
        return;
    }

    let width = agg
        .rows
        .iter()
        .map(|r| r.case_name.len())
        .max()
        .unwrap_or(0)
        .max("query".len());

    print!("{:<width$}", "query", width = width);
    for size in &agg.sizes {
        print!(" {:>8}", size);
    }
    println!(" {:>8}", "average");
    println!("{}", "-".repeat(width + 9 * (agg.sizes.len() + 1)));

    for row in &agg.rows {
        print!("{:<width$}", row.case_name, width = width);
        for size in &agg.sizes {
            let cell = row
                .speedup(*size)
                .map(format_speedup)
                .unwrap_or_else(|| "-".to_string());
            print!(" {:>8}", cell);
        }
        println!(" {:>8}", format_speedup(row.average_speedup));
    }
    println!("{}\n", "=".repeat(60));
}
