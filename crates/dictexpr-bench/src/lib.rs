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

//! DictExpr Benchmark Harness
//!
//! Differential correctness checks and speedup measurements for DictExpr
//! expressions against the `jmespath` crate.
//!
//! ## Features
//!
//! - **Equivalence checks**: Every case runs through both evaluators and the
//!   results are compared structurally, with numeric tolerance
//! - **Synthetic documents**: Seeded store documents that scale with size
//! - **Speedup reports**: Median latencies per size, aggregated into a
//!   markdown table kept inside a managed region of the README
//!
//! ## Usage
//!
//! Check every case (quick mode):
//! ```bash
//! cargo run --release --package dictexpr-bench
//! ```
//!
//! Time every case and refresh the README table:
//! ```bash
//! cargo run --release --package dictexpr-bench -- --update-report
//! ```
//!
//! Criterion micro-benchmarks:
//! ```bash
//! cargo bench --package dictexpr-bench
//! ```

pub mod cases;
pub mod core;
pub mod datasets;
pub mod error;
pub mod harness;
pub mod reporters;

// Re-export key types for convenience
pub use cases::default_cases;
pub use self::core::{BenchConfig, Case, CaseRegistry, RunMode, TimingSampler};
pub use datasets::{DataProvider, Document, SeededProvider, DEFAULT_SEED};
pub use error::{
    validate_document_size, BenchError, EvaluatorError, ReportFormatError, Result,
    MAX_DOCUMENT_SIZE,
};
pub use harness::{
    BenchmarkRunner, CandidateEvaluator, EquivalenceChecker, Evaluator, JmespathEvaluator,
    RunOutcome, Tolerance,
};
