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

//! Equivalence case registry.
//!
//! A registry is built once through [`CaseRegistryBuilder`] and is read-only
//! afterwards. The runner borrows it; nothing is registered globally.

use crate::datasets::Document;
use crate::error::{BenchError, Result};
use std::collections::HashSet;

/// A candidate query paired with the reference query it must agree with.
#[derive(Debug, Clone, PartialEq)]
pub struct Case<Q> {
    name: String,
    candidate: Q,
    reference: String,
    fixed_document: Option<Document>,
}

impl<Q> Case<Q> {
    /// Creates a case that runs against the generated documents.
    pub fn new(name: impl Into<String>, candidate: Q, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidate,
            reference: reference.into(),
            fixed_document: None,
        }
    }

    /// Pins the case to a fixed document. Such cases are checked for
    /// correctness but never timed.
    pub fn with_document(mut self, document: Document) -> Self {
        self.fixed_document = Some(document);
        self
    }

    /// Unique case name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidate query.
    pub fn candidate(&self) -> &Q {
        &self.candidate
    }

    /// Reference query string.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Fixed document, if the case has one.
    pub fn fixed_document(&self) -> Option<&Document> {
        self.fixed_document.as_ref()
    }

    /// Whether the case runs on generated documents.
    pub fn is_timed(&self) -> bool {
        self.fixed_document.is_none()
    }
}

/// Ordered, name-unique set of cases.
#[derive(Debug, Clone)]
pub struct CaseRegistry<Q> {
    cases: Vec<Case<Q>>,
}

impl<Q> CaseRegistry<Q> {
    /// Starts an empty builder.
    pub fn builder() -> CaseRegistryBuilder<Q> {
        CaseRegistryBuilder { cases: Vec::new() }
    }

    /// Cases in declaration order.
    pub fn cases(&self) -> &[Case<Q>] {
        &self.cases
    }

    /// Iterates cases in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Case<Q>> {
        self.cases.iter()
    }

    /// Looks a case up by name.
    pub fn get(&self, name: &str) -> Option<&Case<Q>> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns whether the registry has no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Number of cases that run on generated documents.
    pub fn timed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.is_timed()).count()
    }
}

impl<'a, Q> IntoIterator for &'a CaseRegistry<Q> {
    type Item = &'a Case<Q>;
    type IntoIter = std::slice::Iter<'a, Case<Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Appends cases; [`build`](CaseRegistryBuilder::build) validates and freezes.
#[derive(Debug)]
pub struct CaseRegistryBuilder<Q> {
    cases: Vec<Case<Q>>,
}

impl<Q> CaseRegistryBuilder<Q> {
    /// Appends a case.
    pub fn add(mut self, case: Case<Q>) -> Self {
        self.cases.push(case);
        self
    }

    /// Appends a case running on the generated documents.
    pub fn case(self, name: impl Into<String>, candidate: Q, reference: impl Into<String>) -> Self {
        self.add(Case::new(name, candidate, reference))
    }

    /// Appends a case pinned to a fixed document.
    pub fn case_on(
        self,
        name: impl Into<String>,
        candidate: Q,
        reference: impl Into<String>,
        document: Document,
    ) -> Self {
        self.add(Case::new(name, candidate, reference).with_document(document))
    }

    /// Validates and freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Configuration`] when no case was added, and
    /// for an empty name, an empty reference query or a duplicate name.
    pub fn build(self) -> Result<CaseRegistry<Q>> {
        if self.cases.is_empty() {
            return Err(BenchError::config("cases", "no cases registered"));
        }
        let mut seen = HashSet::with_capacity(self.cases.len());
        for case in &self.cases {
            if case.name.trim().is_empty() {
                return Err(BenchError::config("cases", "case name must not be empty"));
            }
            if case.reference.trim().is_empty() {
                return Err(BenchError::config(
                    "cases",
                    format!("case '{}' has an empty reference query", case.name),
                ));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(BenchError::config(
                    "cases",
                    format!("case name '{}' is registered twice", case.name),
                ));
            }
        }
        Ok(CaseRegistry { cases: self.cases })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::user_document;

    #[test]
    fn test_build_preserves_order() {
        let registry = CaseRegistry::builder()
            .case("b", 2, "b")
            .case("a", 1, "a")
            .case_on("c", 3, "c", user_document())
            .build()
            .unwrap();

        let names: Vec<&str> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.timed_count(), 2);
        assert_eq!(registry.get("a").map(|c| *c.candidate()), Some(1));
        assert!(registry.get("c").unwrap().fixed_document().is_some());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = CaseRegistry::builder()
            .case("same", (), "a")
            .case("same", (), "b")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_rejects_empty_reference() {
        let err = CaseRegistry::builder()
            .case("blank", (), "   ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_rejects_empty_registry() {
        let err = CaseRegistry::<()>::builder().build().unwrap_err();
        match err {
            BenchError::Configuration { parameter, reason } => {
                assert_eq!(parameter, "cases");
                assert_eq!(reason, "no cases registered");
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
