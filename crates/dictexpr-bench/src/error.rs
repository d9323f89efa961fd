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

//! Error types for differential checks and benchmark runs.
//!
//! Every variant aborts the run: the harness never reports partial
//! results and never writes the report after a failure.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Largest document size accepted by the data providers.
///
/// Sales scale with `days * 2 * size`, so this keeps a single document well
/// below a few hundred megabytes.
pub const MAX_DOCUMENT_SIZE: usize = 100_000;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Failure reported by an evaluator while preparing, loading or executing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EvaluatorError(pub String);

impl EvaluatorError {
    /// Wraps any displayable error.
    pub fn new(message: impl ToString) -> Self {
        Self(message.to_string())
    }
}

/// Malformed managed region in a report document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportFormatError {
    /// A start marker with no end marker after it.
    #[error("start marker on line {line} has no matching end marker")]
    MissingEnd { line: usize },

    /// An end marker with no start marker.
    #[error("end marker on line {line} has no matching start marker")]
    MissingStart { line: usize },

    /// The end marker precedes the start marker.
    #[error("end marker on line {end} precedes start marker on line {start}")]
    EndBeforeStart { start: usize, end: usize },

    /// More than one start or end marker.
    #[error("report contains {count} {marker} markers, expected at most one")]
    Duplicate { marker: &'static str, count: usize },
}

/// Errors that can occur while checking or benchmarking cases
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    /// The candidate and reference evaluators disagree on a case.
    #[error(
        "{case}: results diverge at {path}\n  Query: {query}\n  Got:   {obtained}\n  Want:  {expected}"
    )]
    EquivalenceMismatch {
        /// Case name
        case: String,
        /// Reference query string
        query: String,
        /// Candidate result
        obtained: Value,
        /// Reference result
        expected: Value,
        /// JSON path of the first divergence
        path: String,
    },

    /// An evaluator failed on a case.
    #[error("{evaluator} evaluator failed on case '{case}' (size {document_size}): {message}\n  Query: {query}")]
    EvaluatorFailure {
        /// Evaluator name
        evaluator: String,
        /// Case name
        case: String,
        /// Query as rendered for this evaluator
        query: String,
        /// Size of the document the case ran on
        document_size: usize,
        /// Underlying error
        message: String,
    },

    /// The report document has a malformed managed region.
    #[error("Malformed report: {0}")]
    ReportFormat(#[from] ReportFormatError),

    /// Invalid configuration parameter
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    Configuration {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Failed to generate a document
    #[error("Failed to generate document of size {size}: {reason}")]
    Generation {
        /// Requested size
        size: usize,
        /// Reason for failure
        reason: String,
    },

    /// I/O error on a report or export file
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File path
        path: String,
        /// Error message
        message: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),
}

impl BenchError {
    /// Builds a [`BenchError::Configuration`].
    pub fn config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        BenchError::Configuration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`BenchError::Io`] for `path`.
    pub fn io(path: &Path, err: impl ToString) -> Self {
        BenchError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Returns the case name for case-level failures.
    pub fn case_name(&self) -> Option<&str> {
        match self {
            BenchError::EquivalenceMismatch { case, .. }
            | BenchError::EvaluatorFailure { case, .. } => Some(case),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Json(err.to_string())
    }
}

/// Validate that a document size is within acceptable limits
///
/// # Examples
///
/// ```
/// use dictexpr_bench::error::{validate_document_size, MAX_DOCUMENT_SIZE};
///
/// assert!(validate_document_size(1000).is_ok());
/// assert!(validate_document_size(0).is_err());
/// assert!(validate_document_size(MAX_DOCUMENT_SIZE + 1).is_err());
/// ```
#[inline]
pub fn validate_document_size(size: usize) -> Result<()> {
    if size == 0 {
        Err(BenchError::Generation {
            size,
            reason: "size must be at least 1".to_string(),
        })
    } else if size > MAX_DOCUMENT_SIZE {
        Err(BenchError::Generation {
            size,
            reason: format!("exceeds maximum allowed size of {}", MAX_DOCUMENT_SIZE),
        })
    } else {
        Ok(())
    }
}
