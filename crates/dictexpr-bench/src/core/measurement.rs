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

//! Timing primitives.
//!
//! Every timed run is measured individually with a monotonic clock and the
//! sampler reports the median.

use crate::error::{BenchError, Result};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Collects per-run latencies for a fallible operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSampler {
    runs: usize,
    warmup: usize,
}

impl TimingSampler {
    /// Creates a sampler taking `runs` timed samples after `warmup`
    /// discarded runs.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Configuration`] when `runs` is zero.
    pub fn new(runs: usize, warmup: usize) -> Result<Self> {
        if runs == 0 {
            return Err(BenchError::config("runs", "must be at least 1"));
        }
        Ok(Self { runs, warmup })
    }

    /// Number of timed runs.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Number of discarded warmup runs.
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Runs `f` and returns the median latency of the timed runs.
    ///
    /// The first error from `f`, warmup included, aborts sampling.
    ///
    /// # Example
    ///
    /// ```
    /// use dictexpr_bench::core::measurement::TimingSampler;
    ///
    /// let sampler = TimingSampler::new(5, 1).unwrap();
    /// let median = sampler.sample(|| Ok::<_, ()>(2 + 2)).unwrap();
    /// assert!(median.as_secs() < 1);
    /// ```
    pub fn sample<T, E, F>(&self, mut f: F) -> std::result::Result<Duration, E>
    where
        F: FnMut() -> std::result::Result<T, E>,
    {
        for _ in 0..self.warmup {
            black_box(f()?);
        }

        let mut samples = Vec::with_capacity(self.runs);
        for _ in 0..self.runs {
            let start = Instant::now();
            let out = f()?;
            samples.push(start.elapsed());
            black_box(out);
        }

        Ok(median(&mut samples).unwrap_or(Duration::ZERO))
    }
}

/// Median of a set of durations; the mean of the two middle values for an
/// even count. Sorts `samples` in place.
pub fn median(samples: &mut [Duration]) -> Option<Duration> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_unstable();
    let mid = samples.len() / 2;
    if samples.len() % 2 == 1 {
        Some(samples[mid])
    } else {
        Some((samples[mid - 1] + samples[mid]) / 2)
    }
}

/// Median of a set of ratios, NaN-free input assumed.
pub fn median_f64(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}
