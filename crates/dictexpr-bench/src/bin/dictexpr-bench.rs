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

//! DictExpr benchmark command line

use clap::Parser;
use dictexpr_bench::core::config::{RunMode, DEFAULT_REPORT_PATH};
use dictexpr_bench::datasets::DEFAULT_DAYS;
use dictexpr_bench::reporters::print_summary;
use dictexpr_bench::{
    default_cases, BenchConfig, BenchmarkRunner, CandidateEvaluator, JmespathEvaluator, Result,
    SeededProvider, DEFAULT_SEED,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Checks DictExpr against JMESPath and measures the speedup
///
/// Without flags every case is checked once (quick mode). `--full` also
/// times each case on documents of every size.
///
/// # Examples
///
/// ```bash
/// # Correctness only
/// dictexpr-bench
///
/// # Time on custom sizes and export the raw samples
/// dictexpr-bench --full --sizes 100,1000 --runs 50 --json results.json
///
/// # Refresh the README table
/// dictexpr-bench --update-report
/// ```
#[derive(Parser)]
#[command(name = "dictexpr-bench")]
#[command(author, version, about = "DictExpr differential benchmark", long_about = None)]
struct Cli {
    /// Run the timing phase
    #[arg(long)]
    full: bool,

    /// Rewrite the report table after timing (implies --full)
    #[arg(long)]
    update_report: bool,

    /// Report file holding the managed region
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Document sizes for the timing phase
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Timed runs per evaluator, case and size
    #[arg(long)]
    runs: Option<usize>,

    /// Discarded runs before timing
    #[arg(long, default_value_t = 0)]
    warmup: usize,

    /// Size of the correctness-phase document
    #[arg(long)]
    check_size: Option<usize>,

    /// Generator seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Sales days per generated document
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: usize,

    /// Also write the run outcome as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> BenchConfig {
        let mode = if self.full || self.update_report {
            RunMode::Full
        } else {
            RunMode::Quick
        };
        let mut config = BenchConfig::new(mode)
            .with_warmup(self.warmup)
            .with_report_update(self.update_report)
            .with_report_path(self.report.clone());
        if let Some(sizes) = &self.sizes {
            config = config.with_sizes(sizes);
        }
        if let Some(runs) = self.runs {
            config = config.with_runs(runs);
        }
        if let Some(size) = self.check_size {
            config = config.with_check_size(size);
        }
        if let Some(path) = &self.json {
            config = config.with_json_path(path.clone());
        }
        config
    }

    fn execute(&self) -> Result<()> {
        let registry = default_cases()?;
        let provider = SeededProvider::new(self.seed).with_days(self.days);
        let runner = BenchmarkRunner::new(CandidateEvaluator, JmespathEvaluator, self.config());
        let outcome = runner.run(&registry, &provider)?;
        print_summary(&outcome);
        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dictexpr_bench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
