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

//! Benchmark runner for checking and timing a case registry.

use crate::core::config::BenchConfig;
use crate::core::measurement::TimingSampler;
use crate::core::registry::CaseRegistry;
use crate::datasets::DataProvider;
use crate::error::Result;
use crate::harness::aggregator::{aggregate, Aggregation, SamplePair};
use crate::harness::checker::{EquivalenceChecker, LoadedDocument, PreparedCase};
use crate::harness::evaluator::Evaluator;
use crate::reporters::{json::export_json, markdown::render_table, region::update_report_file};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a successful run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Number of case checks that passed, re-checks included.
    pub checked: usize,
    /// Median latency pairs, in measurement order.
    pub samples: Vec<SamplePair>,
    /// Per-case speedups.
    pub aggregation: Aggregation,
    /// Input conversion time subtracted from each reference latency, by
    /// document size. Empty when the reference searches its input as is.
    pub reference_overhead: BTreeMap<usize, Duration>,
}

impl RunOutcome {
    /// Whether the timing phase produced any samples.
    pub fn is_timed(&self) -> bool {
        !self.samples.is_empty()
    }
}

/// Runs the correctness phase and, in full mode, the timing phase.
pub struct BenchmarkRunner<C, R> {
    candidate: C,
    reference: R,
    config: BenchConfig,
}

impl<C, R> BenchmarkRunner<C, R>
where
    C: Evaluator,
    C::Query: Sized + fmt::Display,
    R: Evaluator<Query = str>,
{
    /// Creates a runner for a candidate and a reference evaluator.
    pub fn new(candidate: C, reference: R, config: BenchConfig) -> Self {
        Self {
            candidate,
            reference,
            config,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Checks every case, times them in full mode, then writes the outputs.
    ///
    /// Nothing is written unless every phase succeeds.
    ///
    /// # Errors
    ///
    /// Configuration errors are reported before any work starts. The first
    /// mismatch or evaluator failure aborts the run.
    pub fn run<P>(&self, registry: &CaseRegistry<C::Query>, provider: &P) -> Result<RunOutcome>
    where
        P: DataProvider + ?Sized,
    {
        self.config.validate()?;
        let sampler = TimingSampler::new(self.config.runs, self.config.warmup)?;
        let checker = EquivalenceChecker::new(&self.candidate, &self.reference);

        let prepared = registry
            .iter()
            .map(|case| checker.prepare(case))
            .collect::<Result<Vec<_>>>()?;

        let mut outcome = RunOutcome {
            checked: self.check_all(&checker, registry, &prepared, provider)?,
            ..RunOutcome::default()
        };

        if !self.config.is_full() {
            info!("Quick run: skipping timing phase");
            self.write_outputs(&outcome)?;
            return Ok(outcome);
        }

        info!(
            runs = sampler.runs(),
            warmup = sampler.warmup(),
            "Timing {} cases on sizes {:?}",
            registry.timed_count(),
            self.config.sizes
        );
        for &size in &self.config.sizes {
            let document = provider.generate(size)?;
            let loaded = checker.load(&document)?;
            let overhead = checker.reference_overhead(&sampler, &loaded)?;
            if !overhead.is_zero() {
                debug!(
                    size,
                    overhead_ns = overhead.as_nanos() as u64,
                    "reference input conversion"
                );
                outcome.reference_overhead.insert(size, overhead);
            }

            for (case, prep) in registry.iter().zip(&prepared) {
                if !case.is_timed() {
                    continue;
                }
                checker.check_prepared(case, prep, &loaded)?;
                outcome.checked += 1;

                let candidate_latency =
                    sampler.sample(|| checker.run_candidate(case, prep, &loaded))?;
                let reference_latency = sampler
                    .sample(|| checker.run_reference(case, prep, &loaded))?
                    .saturating_sub(overhead);
                if candidate_latency.is_zero() {
                    warn!(case = case.name(), size, "candidate latency below clock resolution");
                }
                let pair = SamplePair::new(case.name(), size, candidate_latency, reference_latency);
                debug!(
                    case = case.name(),
                    size,
                    candidate_ns = candidate_latency.as_nanos() as u64,
                    reference_ns = reference_latency.as_nanos() as u64,
                    speedup = pair.speedup(),
                    "sampled"
                );
                outcome.samples.push(pair);
            }
            info!(size, "Finished size {}", size);
        }

        outcome.aggregation = aggregate(&outcome.samples);
        self.write_outputs(&outcome)?;
        Ok(outcome)
    }

    fn check_all<P>(
        &self,
        checker: &EquivalenceChecker<'_, C, R>,
        registry: &CaseRegistry<C::Query>,
        prepared: &[PreparedCase<C, R>],
        provider: &P,
    ) -> Result<usize>
    where
        P: DataProvider + ?Sized,
    {
        info!(
            "Running {} cases on a document of size {}",
            registry.len(),
            self.config.check_size
        );
        let document = provider.generate(self.config.check_size)?;
        let shared = checker.load(&document)?;

        let mut checked = 0;
        for (case, prep) in registry.iter().zip(prepared) {
            match case.fixed_document() {
                Some(fixed) => {
                    let loaded: LoadedDocument<C, R> = checker.load(fixed)?;
                    checker.check_prepared(case, prep, &loaded)?;
                }
                None => checker.check_prepared(case, prep, &shared)?,
            }
            info!("✔ {}", case.name());
            checked += 1;
        }
        info!("All {} cases passed correctness checks", checked);
        Ok(checked)
    }

    fn write_outputs(&self, outcome: &RunOutcome) -> Result<()> {
        if self.config.update_report {
            let table = render_table(&outcome.aggregation);
            update_report_file(&self.config.report_path, &table)?;
            info!(path = %self.config.report_path.display(), "Report updated");
        }
        if let Some(path) = &self.config.json_path {
            export_json(outcome, &self.config, path)?;
            info!(path = %path.display(), "Results exported");
        }
        Ok(())
    }
}
