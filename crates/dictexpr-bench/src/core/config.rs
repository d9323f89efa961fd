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

//! Centralized run configuration.
//!
//! Provides the document sizes, sample counts, run mode and export
//! settings for a benchmark run.

use crate::error::{validate_document_size, BenchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document sizes timed by a full run.
pub const DEFAULT_SIZES: &[usize] = &[50, 200, 800];

/// Timed runs per evaluator and case in a full run.
pub const FULL_RUNS: usize = 200;

/// Timed runs per evaluator and case in a quick run.
pub const QUICK_RUNS: usize = 1;

/// Size of the document used by the correctness phase.
pub const DEFAULT_CHECK_SIZE: usize = 20;

/// Report rewritten by `--update-report`.
pub const DEFAULT_REPORT_PATH: &str = "README.md";

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Correctness phase only.
    Quick,
    /// Correctness phase followed by timing across all sizes.
    Full,
}

impl RunMode {
    /// Default timed runs for this mode.
    pub fn default_runs(&self) -> usize {
        match self {
            RunMode::Quick => QUICK_RUNS,
            RunMode::Full => FULL_RUNS,
        }
    }

    /// Returns the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Quick => "quick",
            RunMode::Full => "full",
        }
    }
}

/// Benchmark run configuration.
///
/// # Example
///
/// ```
/// use dictexpr_bench::core::config::{BenchConfig, RunMode};
///
/// let config = BenchConfig::default()
///     .with_mode(RunMode::Full)
///     .with_sizes(&[10, 100])
///     .with_runs(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Document sizes for the timing phase.
    pub sizes: Vec<usize>,
    /// Timed runs per evaluator, case and size.
    pub runs: usize,
    /// Discarded runs before timing starts.
    pub warmup: usize,
    /// Size of the correctness-phase document.
    pub check_size: usize,
    /// Phases to execute.
    pub mode: RunMode,
    /// Rewrite the report region after a successful full run.
    pub update_report: bool,
    /// Report file holding the managed region.
    pub report_path: PathBuf,
    /// Optional JSON export of the run outcome.
    pub json_path: Option<PathBuf>,
}

impl BenchConfig {
    /// Creates a configuration for `mode` with its default run count.
    pub fn new(mode: RunMode) -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            runs: mode.default_runs(),
            warmup: 0,
            check_size: DEFAULT_CHECK_SIZE,
            mode,
            update_report: false,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            json_path: None,
        }
    }

    /// Sets the run mode and resets the run count to the mode default.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self.runs = mode.default_runs();
        self
    }

    /// Sets custom document sizes.
    pub fn with_sizes(mut self, sizes: &[usize]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    /// Sets the timed run count.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the warmup run count.
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Sets the correctness-phase document size.
    pub fn with_check_size(mut self, size: usize) -> Self {
        self.check_size = size;
        self
    }

    /// Enables the report rewrite. Implies a full run.
    pub fn with_report_update(mut self, update: bool) -> Self {
        if update && self.mode != RunMode::Full {
            self = self.with_mode(RunMode::Full);
        }
        self.update_report = update;
        self
    }

    /// Sets the report path.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Sets the JSON export path. Quick runs export their check count with
    /// no samples.
    pub fn with_json_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_path = Some(path.into());
        self
    }

    /// Returns whether the timing phase runs.
    pub fn is_full(&self) -> bool {
        self.mode == RunMode::Full
    }

    /// Checks every parameter before any work starts.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Configuration`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(BenchError::config("runs", "must be at least 1"));
        }
        validate_document_size(self.check_size)
            .map_err(|e| BenchError::config("check_size", e.to_string()))?;

        if self.is_full() {
            if self.sizes.is_empty() {
                return Err(BenchError::config("sizes", "a full run needs at least one size"));
            }
            for (i, &size) in self.sizes.iter().enumerate() {
                validate_document_size(size)
                    .map_err(|e| BenchError::config("sizes", e.to_string()))?;
                if self.sizes[..i].contains(&size) {
                    return Err(BenchError::config(
                        "sizes",
                        format!("size {} is listed twice", size),
                    ));
                }
            }
        }

        if self.update_report && !self.is_full() {
            return Err(BenchError::config(
                "update_report",
                "the report can only be rewritten after a full run",
            ));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(RunMode::Quick)
    }
}
