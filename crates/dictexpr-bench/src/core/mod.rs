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

//! Core benchmark infrastructure.
//!
//! Provides run configuration, timing primitives and the case registry.
//!
//! # Modules
//!
//! - `config`: Run configuration and defaults
//! - `measurement`: Median-of-runs timing
//! - `registry`: Equivalence cases and their registry

pub mod config;
pub mod measurement;
pub mod registry;

// Re-export commonly used types
pub use config::{BenchConfig, RunMode, DEFAULT_SIZES, FULL_RUNS, QUICK_RUNS};
pub use measurement::{median, TimingSampler};
pub use registry::{Case, CaseRegistry, CaseRegistryBuilder};
