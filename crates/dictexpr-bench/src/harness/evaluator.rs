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

//! Evaluator contract and the two shipped evaluators.
//!
//! An evaluator splits work into three steps so that only execution is
//! timed: `prepare` turns a query into its executable form, `load` converts
//! a document into the evaluator's native input, and `execute` runs one
//! against the other.
//!
//! The `jmespath` crate only searches values it converts itself, so its
//! `execute` rebuilds the whole input on every call. That conversion is
//! exposed through [`Evaluator::convert_input`]; the runner times it per
//! document and subtracts it from the reference latency.

use crate::datasets::Document;
use crate::error::EvaluatorError;
use dictexpr_core::Expr;
use jmespath::{Expression, Rcvar, ToJmespath, Variable};
use serde_json::Value;
use std::hint::black_box;
use std::rc::Rc;

/// Result type for evaluator operations.
pub type EvalResult<T> = std::result::Result<T, EvaluatorError>;

/// A query engine the harness can check and time.
pub trait Evaluator {
    /// Query representation accepted by [`prepare`](Evaluator::prepare).
    type Query: ?Sized;
    /// Executable form of a query.
    type Prepared;
    /// Native form of a document.
    type Input;

    /// Short name used in logs, errors and reports.
    fn name(&self) -> &str;

    /// Compiles or validates a query.
    fn prepare(&self, query: &Self::Query) -> EvalResult<Self::Prepared>;

    /// Converts a document into the native input.
    fn load(&self, document: &Document) -> EvalResult<Self::Input>;

    /// Runs a prepared query against a loaded document.
    fn execute(&self, prepared: &Self::Prepared, input: &Self::Input) -> EvalResult<Value>;

    /// Repeats the conversion `execute` applies to its input before the
    /// query runs, or returns `None` when `execute` uses the input as is.
    fn convert_input(&self, _input: &Self::Input) -> Option<EvalResult<()>> {
        None
    }
}

/// Native [`Expr`] evaluation over `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateEvaluator;

impl Evaluator for CandidateEvaluator {
    type Query = Expr;
    type Prepared = Expr;
    type Input = Document;

    fn name(&self) -> &str {
        "dictexpr"
    }

    fn prepare(&self, query: &Expr) -> EvalResult<Expr> {
        Ok(query.clone())
    }

    fn load(&self, document: &Document) -> EvalResult<Document> {
        Ok(document.clone())
    }

    fn execute(&self, prepared: &Expr, input: &Document) -> EvalResult<Value> {
        prepared.search(input.value()).map_err(EvaluatorError::new)
    }
}

/// The `jmespath` crate, used as the trusted reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct JmespathEvaluator;

impl Evaluator for JmespathEvaluator {
    type Query = str;
    type Prepared = Expression<'static>;
    type Input = Rcvar;

    fn name(&self) -> &str {
        "jmespath"
    }

    fn prepare(&self, query: &str) -> EvalResult<Expression<'static>> {
        jmespath::compile(query).map_err(EvaluatorError::new)
    }

    fn load(&self, document: &Document) -> EvalResult<Rcvar> {
        let text = serde_json::to_string(document.value()).map_err(EvaluatorError::new)?;
        let variable = Variable::from_json(&text).map_err(EvaluatorError::new)?;
        Ok(Rc::new(variable))
    }

    fn execute(&self, prepared: &Expression<'static>, input: &Rcvar) -> EvalResult<Value> {
        let found = prepared.search(Rc::clone(input)).map_err(EvaluatorError::new)?;
        serde_json::to_value(&*found).map_err(EvaluatorError::new)
    }

    /// Same conversion `Expression::search` performs on its argument.
    fn convert_input(&self, input: &Rcvar) -> Option<EvalResult<()>> {
        Some(
            Rc::clone(input)
                .to_jmespath()
                .map(|converted| drop(black_box(converted)))
                .map_err(EvaluatorError::new),
        )
    }
}
