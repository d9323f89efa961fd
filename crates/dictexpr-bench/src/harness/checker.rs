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

//! Differential equivalence checks.
//!
//! Runs a case through both evaluators on the same document and compares
//! the results structurally. Numbers compare within a tolerance (integers and
//! floats compare by value), array order matters, object key order does not,
//! and an object key bound to `null` is the same as the key being absent.

use crate::core::measurement::TimingSampler;
use crate::core::registry::Case;
use crate::datasets::Document;
use crate::error::{BenchError, EvaluatorError, Result};
use crate::harness::evaluator::Evaluator;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Numeric comparison tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Largest accepted difference relative to the larger magnitude.
    pub relative: f64,
    /// Largest accepted absolute difference.
    pub absolute: f64,
}

impl Tolerance {
    /// Exact numeric comparison.
    pub const EXACT: Tolerance = Tolerance {
        relative: 0.0,
        absolute: 0.0,
    };

    /// Returns whether two numbers are equal within this tolerance.
    pub fn accepts(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        diff <= self.absolute || diff <= self.relative * a.abs().max(b.abs())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: 1e-9,
            absolute: 1e-9,
        }
    }
}

/// Compares two values and returns the JSON path of the first divergence,
/// or `None` when they are equivalent.
///
/// ```
/// use dictexpr_bench::harness::checker::{first_divergence, Tolerance};
/// use serde_json::json;
///
/// let tol = Tolerance::default();
/// assert_eq!(first_divergence(&json!({"a": 3, "b": null}), &json!({"a": 3.0}), &tol), None);
/// assert_eq!(
///     first_divergence(&json!({"a": [1, 2]}), &json!({"a": [1, 5]}), &tol),
///     Some("$.a[1]".to_string())
/// );
/// ```
pub fn first_divergence(obtained: &Value, expected: &Value, tolerance: &Tolerance) -> Option<String> {
    let mut path = String::from("$");
    if diverges(obtained, expected, tolerance, &mut path) {
        Some(path)
    } else {
        None
    }
}

/// Returns whether two values are equivalent.
pub fn values_equivalent(obtained: &Value, expected: &Value, tolerance: &Tolerance) -> bool {
    first_divergence(obtained, expected, tolerance).is_none()
}

fn push_key(path: &mut String, key: &str) {
    let plain = key
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        path.push('.');
        path.push_str(key);
    } else {
        path.push('[');
        path.push_str(&Value::String(key.to_string()).to_string());
        path.push(']');
    }
}

/// Leaves `path` pointing at the divergence when returning `true`.
fn diverges(a: &Value, b: &Value, tolerance: &Tolerance, path: &mut String) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x != y,
        (Value::String(x), Value::String(y)) => x != y,
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return false;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => !tolerance.accepts(x, y),
                _ => true,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return true;
            }
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                let mark = path.len();
                path.push_str(&format!("[{}]", i));
                if diverges(x, y, tolerance, path) {
                    return true;
                }
                path.truncate(mark);
            }
            false
        }
        (Value::Object(xs), Value::Object(ys)) => objects_diverge(xs, ys, tolerance, path),
        _ => true,
    }
}

fn objects_diverge(
    xs: &Map<String, Value>,
    ys: &Map<String, Value>,
    tolerance: &Tolerance,
    path: &mut String,
) -> bool {
    let keys: BTreeSet<&String> = xs.keys().chain(ys.keys()).collect();
    for key in keys {
        let x = xs.get(key.as_str()).unwrap_or(&Value::Null);
        let y = ys.get(key.as_str()).unwrap_or(&Value::Null);
        let mark = path.len();
        push_key(path, key);
        if diverges(x, y, tolerance, path) {
            return true;
        }
        path.truncate(mark);
    }
    false
}

/// A case's queries in executable form.
pub struct PreparedCase<C: Evaluator, R: Evaluator> {
    /// Candidate executable.
    pub candidate: C::Prepared,
    /// Reference executable.
    pub reference: R::Prepared,
}

/// A document in both evaluators' native forms.
pub struct LoadedDocument<C: Evaluator, R: Evaluator> {
    /// Candidate input.
    pub candidate: C::Input,
    /// Reference input.
    pub reference: R::Input,
    /// Size of the source document.
    pub size: usize,
}

/// Checks candidate results against reference results.
pub struct EquivalenceChecker<'a, C, R> {
    candidate: &'a C,
    reference: &'a R,
    tolerance: Tolerance,
}

impl<'a, C, R> EquivalenceChecker<'a, C, R>
where
    C: Evaluator,
    C::Query: Sized + fmt::Display,
    R: Evaluator<Query = str>,
{
    /// Creates a checker with the default tolerance.
    pub fn new(candidate: &'a C, reference: &'a R) -> Self {
        Self {
            candidate,
            reference,
            tolerance: Tolerance::default(),
        }
    }

    /// Sets the numeric tolerance.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The candidate evaluator.
    pub fn candidate(&self) -> &C {
        self.candidate
    }

    /// The reference evaluator.
    pub fn reference(&self) -> &R {
        self.reference
    }

    /// Prepares both queries of a case.
    pub fn prepare(&self, case: &Case<C::Query>) -> Result<PreparedCase<C, R>> {
        let candidate = self
            .candidate
            .prepare(case.candidate())
            .map_err(|e| self.candidate_failure(case, 0, e))?;
        let reference = self
            .reference
            .prepare(case.reference())
            .map_err(|e| self.reference_failure(case, 0, e))?;
        Ok(PreparedCase {
            candidate,
            reference,
        })
    }

    /// Loads a document into both evaluators.
    pub fn load(&self, document: &Document) -> Result<LoadedDocument<C, R>> {
        let size = document.size();
        let load_failure = |evaluator: &str, e: EvaluatorError| BenchError::EvaluatorFailure {
            evaluator: evaluator.to_string(),
            case: "<document load>".to_string(),
            query: String::new(),
            document_size: size,
            message: e.to_string(),
        };
        let candidate = self
            .candidate
            .load(document)
            .map_err(|e| load_failure(self.candidate.name(), e))?;
        let reference = self
            .reference
            .load(document)
            .map_err(|e| load_failure(self.reference.name(), e))?;
        Ok(LoadedDocument {
            candidate,
            reference,
            size,
        })
    }

    /// Executes the candidate query.
    pub fn run_candidate(
        &self,
        case: &Case<C::Query>,
        prepared: &PreparedCase<C, R>,
        loaded: &LoadedDocument<C, R>,
    ) -> Result<Value> {
        self.candidate
            .execute(&prepared.candidate, &loaded.candidate)
            .map_err(|e| self.candidate_failure(case, loaded.size, e))
    }

    /// Executes the reference query.
    pub fn run_reference(
        &self,
        case: &Case<C::Query>,
        prepared: &PreparedCase<C, R>,
        loaded: &LoadedDocument<C, R>,
    ) -> Result<Value> {
        self.reference
            .execute(&prepared.reference, &loaded.reference)
            .map_err(|e| self.reference_failure(case, loaded.size, e))
    }

    /// Median time the reference spends converting `loaded` on each
    /// execution, zero when it searches its input as is.
    pub fn reference_overhead(
        &self,
        sampler: &TimingSampler,
        loaded: &LoadedDocument<C, R>,
    ) -> Result<Duration> {
        let failure = |e: EvaluatorError| BenchError::EvaluatorFailure {
            evaluator: self.reference.name().to_string(),
            case: "<input conversion>".to_string(),
            query: String::new(),
            document_size: loaded.size,
            message: e.to_string(),
        };
        match self.reference.convert_input(&loaded.reference) {
            None => Ok(Duration::ZERO),
            Some(first) => {
                first.map_err(failure)?;
                sampler
                    .sample(|| {
                        self.reference
                            .convert_input(&loaded.reference)
                            .unwrap_or(Ok(()))
                    })
                    .map_err(failure)
            }
        }
    }

    /// Runs the candidate then the reference and compares the results.
    ///
    /// # Errors
    ///
    /// [`BenchError::EquivalenceMismatch`] when the results differ, or
    /// [`BenchError::EvaluatorFailure`] when either evaluator fails.
    pub fn check_prepared(
        &self,
        case: &Case<C::Query>,
        prepared: &PreparedCase<C, R>,
        loaded: &LoadedDocument<C, R>,
    ) -> Result<()> {
        let obtained = self.run_candidate(case, prepared, loaded)?;
        let expected = self.run_reference(case, prepared, loaded)?;

        match first_divergence(&obtained, &expected, &self.tolerance) {
            None => {
                debug!(case = case.name(), size = loaded.size, "results match");
                Ok(())
            }
            Some(path) => Err(BenchError::EquivalenceMismatch {
                case: case.name().to_string(),
                query: case.reference().to_string(),
                obtained,
                expected,
                path,
            }),
        }
    }

    /// Prepares, loads and checks a case on a document.
    pub fn check(&self, case: &Case<C::Query>, document: &Document) -> Result<()> {
        let prepared = self.prepare(case)?;
        let loaded = self.load(document)?;
        self.check_prepared(case, &prepared, &loaded)
    }

    fn candidate_failure(&self, case: &Case<C::Query>, size: usize, e: EvaluatorError) -> BenchError {
        BenchError::EvaluatorFailure {
            evaluator: self.candidate.name().to_string(),
            case: case.name().to_string(),
            query: case.candidate().to_string(),
            document_size: size,
            message: e.to_string(),
        }
    }

    fn reference_failure(&self, case: &Case<C::Query>, size: usize, e: EvaluatorError) -> BenchError {
        BenchError::EvaluatorFailure {
            evaluator: self.reference.name().to_string(),
            case: case.name().to_string(),
            query: case.reference().to_string(),
            document_size: size,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::evaluator::{CandidateEvaluator, JmespathEvaluator};
    use dictexpr_core::{field, Expr};
    use serde_json::json;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equivalent(&json!(3), &json!(3.0), &tol()));
        assert!(values_equivalent(&json!(0.1 + 0.2), &json!(0.3), &tol()));
        assert!(!values_equivalent(&json!(3), &json!(3.1), &tol()));
        assert!(!values_equivalent(&json!(0.1 + 0.2), &json!(0.3), &Tolerance::EXACT));
    }

    #[test]
    fn test_strict_leaves() {
        assert!(!values_equivalent(&json!("1"), &json!(1), &tol()));
        assert!(!values_equivalent(&json!(true), &json!(1), &tol()));
        assert!(!values_equivalent(&json!(null), &json!(false), &tol()));
    }

    #[test]
    fn test_order_rules() {
        assert!(!values_equivalent(&json!([1, 2]), &json!([2, 1]), &tol()));
        assert!(values_equivalent(
            &json!({"a": 1, "b": 2}),
            &json!({"b": 2, "a": 1}),
            &tol()
        ));
        assert_eq!(
            first_divergence(&json!([1, 2]), &json!([1, 2, 3]), &tol()),
            Some("$".to_string())
        );
    }

    #[test]
    fn test_null_equals_absent_inside_maps() {
        assert!(values_equivalent(&json!({"a": null}), &json!({}), &tol()));
        assert!(!values_equivalent(&json!({"a": 0}), &json!({}), &tol()));
        assert!(!values_equivalent(&json!([null]), &json!([]), &tol()));
    }

    #[test]
    fn test_divergence_paths() {
        let a = json!({"users": [{"name": "Ada"}, {"first name": "Bob"}]});
        let b = json!({"users": [{"name": "Ada"}, {"first name": "Rob"}]});
        assert_eq!(
            first_divergence(&a, &b, &tol()),
            Some(r#"$.users[1]["first name"]"#.to_string())
        );
    }

    fn case(name: &str, candidate: Expr, reference: &str) -> Case<Expr> {
        Case::new(name, candidate, reference)
    }

    #[test]
    fn test_check_passes_for_equivalent_queries() {
        let (c, r) = (CandidateEvaluator, JmespathEvaluator);
        let checker = EquivalenceChecker::new(&c, &r);
        let doc = Document::new(json!({"users": [{"age": 3}, {"age": 5}]}), 2);
        checker
            .check(&case("ages", field("users").project(field("age")), "users[*].age"), &doc)
            .unwrap();
    }

    #[test]
    fn test_check_reports_mismatch() {
        let (c, r) = (CandidateEvaluator, JmespathEvaluator);
        let checker = EquivalenceChecker::new(&c, &r);
        let doc = Document::new(json!({"users": [{"age": 3}, {"age": 5}]}), 2);
        let err = checker
            .check(&case("wrong-index", field("users").index(0).field("age"), "users[1].age"), &doc)
            .unwrap_err();
        match err {
            BenchError::EquivalenceMismatch {
                case,
                query,
                obtained,
                expected,
                path,
            } => {
                assert_eq!(case, "wrong-index");
                assert_eq!(query, "users[1].age");
                assert_eq!(obtained, json!(3));
                assert!(values_equivalent(&expected, &json!(5), &tol()));
                assert_eq!(path, "$");
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_check_reports_reference_failure() {
        let (c, r) = (CandidateEvaluator, JmespathEvaluator);
        let checker = EquivalenceChecker::new(&c, &r);
        let doc = Document::new(json!({}), 1);
        let err = checker
            .check(&case("bad-syntax", field("a"), "a[?"), &doc)
            .unwrap_err();
        assert!(matches!(
            err,
            BenchError::EvaluatorFailure { ref evaluator, .. } if evaluator == "jmespath"
        ));
    }
}
