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

//! Reporters for run outcomes.
//!
//! # Modules
//!
//! - `markdown`: Speedup table rendering
//! - `region`: Managed-region rewrite of the persisted report
//! - `json`: JSON export
//! - `console`: Console output formatting

pub mod console;
pub mod json;
pub mod markdown;
pub mod region;

// Re-export commonly used types
pub use console::print_summary;
pub use json::{export_json, RunExport};
pub use markdown::render_table;
pub use region::{update_report_file, ReportWriter, END_MARKER, START_MARKER};
