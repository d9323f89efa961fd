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

//! JSON export of a run outcome.

use crate::core::config::{BenchConfig, RunMode};
use crate::error::{BenchError, Result};
use crate::harness::aggregator::AggregatedRow;
use crate::harness::runner::RunOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One latency pair in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct SampleRecord {
    /// Case name.
    pub case: String,
    /// Document size.
    pub size: usize,
    /// Candidate median latency in milliseconds.
    pub candidate_ms: f64,
    /// Reference median latency in milliseconds.
    pub reference_ms: f64,
    /// Reference latency / candidate latency.
    pub speedup: f64,
}

/// Serialized form of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunExport {
    /// Export timestamp.
    pub generated_at: DateTime<Utc>,
    /// Run mode.
    pub mode: RunMode,
    /// Timed runs per sample.
    pub runs: usize,
    /// Warmup runs per sample.
    pub warmup: usize,
    /// Number of passed case checks.
    pub checked: usize,
    /// Size columns.
    pub sizes: Vec<usize>,
    /// Raw latency pairs.
    pub samples: Vec<SampleRecord>,
    /// Aggregated rows. Infinite speedups serialize as `null`.
    pub rows: Vec<AggregatedRow>,
    /// Reference input conversion time in milliseconds, by document size.
    /// Already subtracted from `reference_ms`.
    pub reference_overhead_ms: BTreeMap<usize, f64>,
}

impl RunExport {
    /// Builds the export for an outcome, stamped with the current time.
    pub fn new(outcome: &RunOutcome, config: &BenchConfig) -> Self {
        let samples = outcome
            .samples
            .iter()
            .map(|s| SampleRecord {
                case: s.case_name.clone(),
                size: s.document_size,
                candidate_ms: s.candidate_latency.as_secs_f64() * 1_000.0,
                reference_ms: s.reference_latency.as_secs_f64() * 1_000.0,
                speedup: s.speedup(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            mode: config.mode,
            runs: config.runs,
            warmup: config.warmup,
            checked: outcome.checked,
            sizes: outcome.aggregation.sizes.clone(),
            samples,
            rows: outcome.aggregation.rows.clone(),
            reference_overhead_ms: outcome
                .reference_overhead
                .iter()
                .map(|(size, overhead)| (*size, overhead.as_secs_f64() * 1_000.0))
                .collect(),
        }
    }
}

/// Exports a run outcome as pretty-printed JSON.
///
/// # Errors
///
/// [`BenchError::Json`] if serialization fails, [`BenchError::Io`] if the
/// file cannot be written.
pub fn export_json(outcome: &RunOutcome, config: &BenchConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&RunExport::new(outcome, config))?;
    fs::write(path, json).map_err(|e| BenchError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::aggregator::{aggregate, SamplePair};
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_json() {
        let samples = vec![SamplePair::new(
            "q",
            50,
            Duration::from_millis(5),
            Duration::from_millis(10),
        )];
        let outcome = RunOutcome {
            checked: 2,
            aggregation: aggregate(&samples),
            samples,
            ..RunOutcome::default()
        };
        let config = BenchConfig::default().with_mode(RunMode::Full);
        let temp = NamedTempFile::new().unwrap();

        export_json(&outcome, &config, temp.path()).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path()).unwrap()).unwrap();
        assert_eq!(parsed["mode"], "full");
        assert_eq!(parsed["checked"], 2);
        assert_eq!(parsed["sizes"], serde_json::json!([50]));
        assert_eq!(parsed["samples"][0]["case"], "q");
        assert_eq!(parsed["rows"][0]["average_speedup"], 2.0);
        assert!(parsed["generated_at"].is_string());
        assert_eq!(parsed["reference_overhead_ms"], serde_json::json!({}));
    }
}
