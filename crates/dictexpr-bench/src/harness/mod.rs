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

//! Differential benchmark harness.
//!
//! Checks candidate results against the reference, samples latencies and
//! aggregates them into speedups.
//!
//! # Modules
//!
//! - `evaluator`: Evaluator contract and implementations
//! - `checker`: Structural equivalence checks
//! - `aggregator`: Speedup aggregation
//! - `runner`: Phase orchestration

pub mod aggregator;
pub mod checker;
pub mod evaluator;
pub mod runner;

// Re-export commonly used types
pub use aggregator::{aggregate, AggregatedRow, Aggregation, SamplePair};
pub use checker::{first_divergence, values_equivalent, EquivalenceChecker, Tolerance};
pub use evaluator::{CandidateEvaluator, Evaluator, JmespathEvaluator};
pub use runner::{BenchmarkRunner, RunOutcome};
