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

//! Managed region rewriting for persisted reports.
//!
//! A report owns exactly one region delimited by marker lines:
//!
//! ```text
//! <!-- BENCHMARK_RESULTS -->
//! ...generated table...
//! <!-- END_BENCHMARK_RESULTS -->
//! ```
//!
//! Only the content strictly between the markers is replaced. Everything
//! else in the document is preserved byte for byte.

use crate::error::{BenchError, ReportFormatError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Line opening the managed region.
pub const START_MARKER: &str = "<!-- BENCHMARK_RESULTS -->";

/// Line closing the managed region.
pub const END_MARKER: &str = "<!-- END_BENCHMARK_RESULTS -->";

fn line_is(line: &str, marker: &str) -> bool {
    line.trim() == marker
}

/// Pure region rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportWriter;

impl ReportWriter {
    /// Returns `target` with the managed region holding `table`, appending a
    /// fresh region when there is none. Idempotent.
    ///
    /// # Errors
    ///
    /// [`ReportFormatError`] when the markers are unbalanced, out of order
    /// or repeated.
    ///
    /// # Example
    ///
    /// ```
    /// use dictexpr_bench::reporters::region::ReportWriter;
    ///
    /// let once = ReportWriter.write("| a |", "# Title\n").unwrap();
    /// assert_eq!(
    ///     once,
    ///     "# Title\n<!-- BENCHMARK_RESULTS -->\n| a |\n<!-- END_BENCHMARK_RESULTS -->\n"
    /// );
    /// assert_eq!(ReportWriter.write("| a |", &once).unwrap(), once);
    /// ```
    pub fn write(&self, table: &str, target: &str) -> std::result::Result<String, ReportFormatError> {
        let lines: Vec<&str> = target.split_inclusive('\n').collect();
        let starts: Vec<usize> = marker_lines(&lines, START_MARKER);
        let ends: Vec<usize> = marker_lines(&lines, END_MARKER);

        if starts.len() > 1 {
            return Err(ReportFormatError::Duplicate {
                marker: "start",
                count: starts.len(),
            });
        }
        if ends.len() > 1 {
            return Err(ReportFormatError::Duplicate {
                marker: "end",
                count: ends.len(),
            });
        }

        let body = normalize_table(table);
        match (starts.first(), ends.first()) {
            (None, None) => {
                let mut out = String::with_capacity(target.len() + body.len() + 64);
                out.push_str(target);
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(START_MARKER);
                out.push('\n');
                out.push_str(&body);
                out.push_str(END_MARKER);
                out.push('\n');
                Ok(out)
            }
            (Some(&start), None) => Err(ReportFormatError::MissingEnd { line: start + 1 }),
            (None, Some(&end)) => Err(ReportFormatError::MissingStart { line: end + 1 }),
            (Some(&start), Some(&end)) if end < start => Err(ReportFormatError::EndBeforeStart {
                start: start + 1,
                end: end + 1,
            }),
            (Some(&start), Some(&end)) => {
                let mut out = String::with_capacity(target.len() + body.len());
                for line in &lines[..=start] {
                    out.push_str(line);
                }
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&body);
                for line in &lines[end..] {
                    out.push_str(line);
                }
                Ok(out)
            }
        }
    }
}

fn marker_lines(lines: &[&str], marker: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line_is(line, marker))
        .map(|(i, _)| i)
        .collect()
}

/// Ends a non-empty table with exactly one newline.
fn normalize_table(table: &str) -> String {
    let trimmed = table.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

/// Rewrites the managed region of the report at `path`.
///
/// A missing file is treated as empty. The new content goes through a
/// temporary file in the same directory and is renamed into place.
///
/// # Errors
///
/// [`BenchError::ReportFormat`] for a malformed region, [`BenchError::Io`]
/// when the file cannot be read or replaced.
pub fn update_report_file(path: &Path, table: &str) -> Result<()> {
    let current = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(BenchError::io(path, e)),
    };

    let updated = ReportWriter.write(table, &current)?;
    if updated == current {
        debug!(path = %path.display(), "report already up to date");
        return Ok(());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BenchError::io(path, e))?;
    tmp.write_all(updated.as_bytes())
        .map_err(|e| BenchError::io(path, e))?;
    tmp.persist(path).map_err(|e| BenchError::io(path, e.error))?;
    Ok(())
}
