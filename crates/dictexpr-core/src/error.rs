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

//! Error types for expression evaluation.

use thiserror::Error;

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors raised while evaluating an [`Expr`](crate::Expr) against a value.
///
/// Type mismatches on ordinary navigation (a field lookup on an array, an
/// index on an object) are not errors: they evaluate to `null`. Errors are
/// reserved for the cases where JMESPath itself refuses to produce a value,
/// which is mostly function arguments of the wrong type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A function received an argument of an unsupported type.
    #[error("invalid type for {function}() argument {position}: expected {expected}, found {actual}")]
    InvalidType {
        /// Function name as written in JMESPath.
        function: &'static str,
        /// Zero-based argument position.
        position: usize,
        /// Human readable description of the accepted types.
        expected: &'static str,
        /// JMESPath type name of the offending value.
        actual: &'static str,
    },

    /// A function was called with the wrong number of arguments.
    #[error("{function}() takes {expected} argument(s), {actual} given")]
    InvalidArity {
        /// Function name.
        function: &'static str,
        /// Expected argument count description.
        expected: &'static str,
        /// Actual argument count.
        actual: usize,
    },

    /// A slice was requested with a step of zero.
    #[error("slice step cannot be 0")]
    ZeroSliceStep,

    /// A numeric result could not be represented as a JSON number.
    #[error("{function}() produced a non-finite number")]
    NonFinite {
        /// Function name.
        function: &'static str,
    },
}

impl EvalError {
    pub(crate) fn invalid_type(
        function: &'static str,
        position: usize,
        expected: &'static str,
        actual: &serde_json::Value,
    ) -> Self {
        Self::InvalidType {
            function,
            position,
            expected,
            actual: crate::value::type_name(actual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_type_display() {
        let err = EvalError::invalid_type("length", 0, "array, object or string", &json!(3));
        let msg = err.to_string();
        assert!(msg.contains("length()"));
        assert!(msg.contains("number"));
    }

    #[test]
    fn test_arity_display() {
        let err = EvalError::InvalidArity {
            function: "join",
            expected: "2",
            actual: 1,
        };
        assert_eq!(err.to_string(), "join() takes 2 argument(s), 1 given");
    }
}
