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

//! End-to-end runner tests with stub evaluators of known latency.

use dictexpr_bench::reporters::{END_MARKER, START_MARKER};
use dictexpr_bench::{
    BenchConfig, BenchError, BenchmarkRunner, CaseRegistry, Document, Evaluator, EvaluatorError,
    RunMode, SeededProvider,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Sleeps a fixed time per query and answers with the query text.
struct SleepEvaluator {
    name: &'static str,
    delays: HashMap<&'static str, u64>,
    wrong_answer: Option<&'static str>,
}

impl SleepEvaluator {
    fn new(name: &'static str, delays: &[(&'static str, u64)]) -> Self {
        Self {
            name,
            delays: delays.iter().copied().collect(),
            wrong_answer: None,
        }
    }

    fn answering_wrong(mut self, query: &'static str) -> Self {
        self.wrong_answer = Some(query);
        self
    }

    fn lookup(&self, query: &str) -> Result<(Duration, Value), EvaluatorError> {
        let ms = self
            .delays
            .get(query)
            .ok_or_else(|| EvaluatorError::new(format!("unknown query {}", query)))?;
        let answer = if self.wrong_answer == Some(query) {
            json!("wrong")
        } else {
            json!(query)
        };
        Ok((Duration::from_millis(*ms), answer))
    }
}

struct Candidate(SleepEvaluator);
struct Reference(SleepEvaluator);

impl Evaluator for Candidate {
    type Query = String;
    type Prepared = (Duration, Value);
    type Input = ();

    fn name(&self) -> &str {
        self.0.name
    }

    fn prepare(&self, query: &String) -> Result<Self::Prepared, EvaluatorError> {
        self.0.lookup(query)
    }

    fn load(&self, _document: &Document) -> Result<(), EvaluatorError> {
        Ok(())
    }

    fn execute(&self, prepared: &Self::Prepared, _input: &()) -> Result<Value, EvaluatorError> {
        thread::sleep(prepared.0);
        Ok(prepared.1.clone())
    }
}

impl Evaluator for Reference {
    type Query = str;
    type Prepared = (Duration, Value);
    type Input = ();

    fn name(&self) -> &str {
        self.0.name
    }

    fn prepare(&self, query: &str) -> Result<Self::Prepared, EvaluatorError> {
        self.0.lookup(query)
    }

    fn load(&self, _document: &Document) -> Result<(), EvaluatorError> {
        Ok(())
    }

    fn execute(&self, prepared: &Self::Prepared, _input: &()) -> Result<Value, EvaluatorError> {
        thread::sleep(prepared.0);
        Ok(prepared.1.clone())
    }
}

const QUERIES: &[&str] = &["slow", "even", "fast"];

fn registry() -> CaseRegistry<String> {
    QUERIES
        .iter()
        .fold(CaseRegistry::builder(), |b, q| b.case(*q, q.to_string(), *q))
        .build()
        .unwrap()
}

fn stubs() -> (Candidate, Reference) {
    (
        Candidate(SleepEvaluator::new(
            "stub-candidate",
            &[("slow", 10), ("even", 5), ("fast", 5)],
        )),
        Reference(SleepEvaluator::new(
            "stub-reference",
            &[("slow", 5), ("even", 5), ("fast", 10)],
        )),
    )
}

fn full_config(dir: &TempDir) -> BenchConfig {
    BenchConfig::new(RunMode::Full)
        .with_sizes(&[3, 6])
        .with_runs(5)
        .with_check_size(2)
        .with_report_update(true)
        .with_report_path(dir.path().join("README.md"))
        .with_json_path(dir.path().join("results.json"))
}

#[test]
fn test_speedups_reflect_stub_latencies() {
    let dir = TempDir::new().unwrap();
    let (candidate, reference) = stubs();
    let runner = BenchmarkRunner::new(candidate, reference, full_config(&dir));
    let outcome = runner.run(&registry(), &SeededProvider::default()).unwrap();

    assert_eq!(outcome.checked, 3 + 3 * 2);
    assert_eq!(outcome.samples.len(), 6);
    assert_eq!(outcome.aggregation.sizes, vec![3, 6]);

    let names: Vec<&str> = outcome
        .aggregation
        .rows
        .iter()
        .map(|r| r.case_name.as_str())
        .collect();
    assert_eq!(names, ["fast", "even", "slow"]);

    for (row, expected) in outcome.aggregation.rows.iter().zip([2.0, 1.0, 0.5]) {
        let ratio = row.average_speedup;
        assert!(
            (ratio - expected).abs() < expected * 0.35,
            "{}: speedup {} too far from {}",
            row.case_name,
            ratio,
            expected
        );
    }
}

#[test]
fn test_full_run_writes_report_and_export() {
    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, "# Stub\n\nResults:\n").unwrap();

    let (candidate, reference) = stubs();
    BenchmarkRunner::new(candidate, reference, full_config(&dir))
        .run(&registry(), &SeededProvider::default())
        .unwrap();

    let text = fs::read_to_string(&readme).unwrap();
    assert!(text.starts_with("# Stub\n\nResults:\n"));
    assert_eq!(text.matches(START_MARKER).count(), 1);
    assert_eq!(text.matches(END_MARKER).count(), 1);
    assert!(text.contains("| query | 3 | 6 | average_speedup |"));
    let fast = text.find("| fast |").unwrap();
    let slow = text.find("| slow |").unwrap();
    assert!(fast < slow);

    let export: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("results.json")).unwrap())
            .unwrap();
    assert_eq!(export["mode"], "full");
    assert_eq!(export["runs"], 5);
    assert_eq!(export["samples"].as_array().unwrap().len(), 6);
    assert_eq!(export["rows"][0]["case_name"], "fast");
    assert_eq!(export["reference_overhead_ms"], json!({}));
}

#[test]
fn test_mismatch_names_case_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (candidate, reference) = stubs();
    let candidate = Candidate(candidate.0.answering_wrong("even"));

    let err = BenchmarkRunner::new(candidate, reference, full_config(&dir))
        .run(&registry(), &SeededProvider::default())
        .unwrap_err();

    match &err {
        BenchError::EquivalenceMismatch {
            case,
            obtained,
            expected,
            path,
            ..
        } => {
            assert_eq!(case, "even");
            assert_eq!(obtained, &json!("wrong"));
            assert_eq!(expected, &json!("even"));
            assert_eq!(path, "$");
        }
        other => panic!("expected a mismatch, got {:?}", other),
    }
    assert!(!dir.path().join("README.md").exists());
    assert!(!dir.path().join("results.json").exists());
}

#[test]
fn test_unknown_query_is_an_evaluator_failure() {
    let (candidate, reference) = stubs();
    let registry = CaseRegistry::builder()
        .case("ghost", "ghost".to_string(), "even")
        .build()
        .unwrap();

    let err = BenchmarkRunner::new(candidate, reference, BenchConfig::default())
        .run(&registry, &SeededProvider::default())
        .unwrap_err();

    match err {
        BenchError::EvaluatorFailure {
            evaluator, case, ..
        } => {
            assert_eq!(evaluator, "stub-candidate");
            assert_eq!(case, "ghost");
        }
        other => panic!("expected an evaluator failure, got {:?}", other),
    }
}

#[test]
fn test_quick_run_leaves_report_alone() {
    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    fs::write(&readme, "untouched\n").unwrap();

    let (candidate, reference) = stubs();
    let config = BenchConfig::default()
        .with_check_size(2)
        .with_report_path(&readme);
    let outcome = BenchmarkRunner::new(candidate, reference, config)
        .run(&registry(), &SeededProvider::default())
        .unwrap();

    assert_eq!(outcome.checked, 3);
    assert!(!outcome.is_timed());
    assert_eq!(fs::read_to_string(&readme).unwrap(), "untouched\n");
}

#[test]
fn test_quick_run_exports_checks() {
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("quick.json");

    let (candidate, reference) = stubs();
    let config = BenchConfig::default()
        .with_check_size(2)
        .with_json_path(&export_path);
    BenchmarkRunner::new(candidate, reference, config)
        .run(&registry(), &SeededProvider::default())
        .unwrap();

    let export: Value = serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(export["mode"], "quick");
    assert_eq!(export["checked"], 3);
    assert_eq!(export["samples"], json!([]));
    assert_eq!(export["rows"], json!([]));
    assert!(!dir.path().join("README.md").exists());
}

#[test]
fn test_malformed_report_fails_run() {
    let dir = TempDir::new().unwrap();
    let readme = dir.path().join("README.md");
    let content = format!("{}\nno end marker\n", START_MARKER);
    fs::write(&readme, &content).unwrap();

    let (candidate, reference) = stubs();
    let config = BenchConfig::new(RunMode::Full)
        .with_sizes(&[2])
        .with_runs(1)
        .with_check_size(2)
        .with_report_update(true)
        .with_report_path(&readme);
    let err = BenchmarkRunner::new(candidate, reference, config)
        .run(&registry(), &SeededProvider::default())
        .unwrap_err();

    assert!(matches!(err, BenchError::ReportFormat(_)));
    assert_eq!(fs::read_to_string(&readme).unwrap(), content);
}
