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

//! DictExpr Core
//!
//! Composable query expressions over nested JSON documents, evaluated
//! natively with JMESPath semantics.
//!
//! ## Features
//!
//! - **Expression trees**: [`Expr`] is an immutable value built from
//!   constructor functions and chaining methods
//! - **Native evaluation**: [`Expr::search`] walks a `serde_json::Value`
//!   directly, no string parsing at query time
//! - **JMESPath rendering**: every expression prints as the equivalent
//!   JMESPath string through `Display`
//!
//! ## Usage
//!
//! ```
//! use dictexpr_core::{field, identity};
//! use serde_json::json;
//!
//! let doc = json!({"users": [{"name": "Ada", "age": 36}, {"name": "Bob", "age": 17}]});
//! let names = field("users")
//!     .sort_by(field("age"))
//!     .project(field("name"))
//!     .pipe(identity().join(", "));
//!
//! assert_eq!(names.search(&doc).unwrap(), json!("Bob, Ada"));
//! assert_eq!(names.to_string(), "sort_by(users, &age)[*].name | join(`\", \"`, @)");
//! ```

pub mod error;
mod eval;
pub mod expr;
pub mod value;

pub use error::{EvalError, Result};
pub use expr::{
    field, identity, lit, merge, not_null, select_dict, select_list, Comparator, Expr, Function,
    IntoExpr, KeyFunction,
};
