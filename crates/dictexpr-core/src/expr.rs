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

//! Immutable query expression trees.
//!
//! An [`Expr`] is a plain value: every builder method consumes the receiver
//! and returns a new node wrapping it, so expressions compose freely and can
//! be cloned, compared and stored in static case tables.
//!
//! ```
//! use dictexpr_core::{field, lit};
//!
//! let adults = field("users")
//!     .filter(field("age").ge(lit(18)))
//!     .project(field("name"));
//! assert_eq!(adults.to_string(), "users[?age >= `18`].name");
//! ```

use serde_json::Value;
use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparator {
    /// Returns the JMESPath spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }
}

/// Built-in functions taking plain value arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Avg,
    Ceil,
    Contains,
    EndsWith,
    Floor,
    Join,
    Keys,
    Length,
    Max,
    Merge,
    Min,
    NotNull,
    Reverse,
    Sort,
    StartsWith,
    Sum,
    ToArray,
    ToNumber,
    ToString,
    Type,
    Values,
}

impl Function {
    /// Returns the JMESPath function name.
    pub fn name(&self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Avg => "avg",
            Function::Ceil => "ceil",
            Function::Contains => "contains",
            Function::EndsWith => "ends_with",
            Function::Floor => "floor",
            Function::Join => "join",
            Function::Keys => "keys",
            Function::Length => "length",
            Function::Max => "max",
            Function::Merge => "merge",
            Function::Min => "min",
            Function::NotNull => "not_null",
            Function::Reverse => "reverse",
            Function::Sort => "sort",
            Function::StartsWith => "starts_with",
            Function::Sum => "sum",
            Function::ToArray => "to_array",
            Function::ToNumber => "to_number",
            Function::ToString => "to_string",
            Function::Type => "type",
            Function::Values => "values",
        }
    }
}

/// Built-in functions taking an expression reference (`&expr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFunction {
    /// `map(&expr, array)`
    Map,
    /// `sort_by(array, &expr)`
    SortBy,
    /// `min_by(array, &expr)`
    MinBy,
    /// `max_by(array, &expr)`
    MaxBy,
}

impl KeyFunction {
    /// Returns the JMESPath function name.
    pub fn name(&self) -> &'static str {
        match self {
            KeyFunction::Map => "map",
            KeyFunction::SortBy => "sort_by",
            KeyFunction::MinBy => "min_by",
            KeyFunction::MaxBy => "max_by",
        }
    }
}

/// A query expression node.
///
/// Nodes that navigate (`Field`, `Index`, `Slice`, projections) carry the
/// expression they apply to as `base`. Nodes evaluated per element
/// (`then`, `predicate`, `key`) are relative: they see the element as the
/// current value, exactly like the right-hand side of a JMESPath projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The current value (`@`).
    Identity,
    /// A constant JSON value.
    Literal(Value),
    /// Object member lookup; `null` on anything but an object.
    Field { base: Box<Expr>, name: String },
    /// Array index, negative values count from the end.
    Index { base: Box<Expr>, index: i64 },
    /// Array slice with Python-style endpoints.
    Slice {
        base: Box<Expr>,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
    /// List projection (`base[*].then`); `null` results are dropped.
    Project { base: Box<Expr>, then: Box<Expr> },
    /// Object value projection (`base.*.then`); `null` results are dropped.
    ProjectValues { base: Box<Expr>, then: Box<Expr> },
    /// Flatten one level of nesting (`base[]`).
    Flatten(Box<Expr>),
    /// Keeps the array elements for which `predicate` is truthy.
    Filter { base: Box<Expr>, predicate: Box<Expr> },
    /// Multi-select list (`[a, b]`).
    MultiList(Vec<Expr>),
    /// Multi-select hash (`{k: a}`).
    MultiDict(Vec<(String, Expr)>),
    /// Binary comparison.
    Compare {
        op: Comparator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Short-circuit `&&`, yields the deciding operand.
    And(Box<Expr>, Box<Expr>),
    /// Short-circuit `||`, yields the deciding operand.
    Or(Box<Expr>, Box<Expr>),
    /// Logical negation, always a boolean.
    Not(Box<Expr>),
    /// Evaluates `rhs` against the result of `lhs` (`lhs | rhs`).
    Pipe(Box<Expr>, Box<Expr>),
    /// Function call with value arguments.
    Call { func: Function, args: Vec<Expr> },
    /// Function call with an array argument and an expression reference.
    ByKey {
        func: KeyFunction,
        base: Box<Expr>,
        key: Box<Expr>,
    },
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Identity
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

/// Anything that can stand as an operand: an expression or a plain literal.
pub trait IntoExpr {
    /// Converts `self` into an expression node.
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Literal(self)
    }
}

macro_rules! literal_operand {
    ($($ty:ty),*) => {
        $(impl IntoExpr for $ty {
            fn into_expr(self) -> Expr {
                Expr::Literal(Value::from(self))
            }
        })*
    };
}

literal_operand!(bool, i32, i64, u32, u64, f64, &str, String);

// ---------------------------------------------------------------------------
// Constructor functions
// ---------------------------------------------------------------------------

/// The current value (`@`).
pub fn identity() -> Expr {
    Expr::Identity
}

/// A field of the current value.
pub fn field(name: impl Into<String>) -> Expr {
    Expr::Identity.field(name)
}

/// A literal operand.
pub fn lit(value: impl IntoExpr) -> Expr {
    value.into_expr()
}

/// Multi-select list of expressions evaluated against the current value.
pub fn select_list(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::MultiList(items.into_iter().collect())
}

/// Multi-select hash of named expressions evaluated against the current value.
pub fn select_dict<K: Into<String>>(items: impl IntoIterator<Item = (K, Expr)>) -> Expr {
    Expr::MultiDict(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

/// `merge(a, b, ...)`: later objects override earlier keys.
pub fn merge(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Call {
        func: Function::Merge,
        args: items.into_iter().collect(),
    }
}

/// `not_null(a, b, ...)`: the first argument that is not `null`.
pub fn not_null(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Call {
        func: Function::NotNull,
        args: items.into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Chaining methods
// ---------------------------------------------------------------------------

impl Expr {
    fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }

    fn call(self, func: Function) -> Expr {
        Expr::Call {
            func,
            args: vec![self],
        }
    }

    fn compare(self, op: Comparator, other: impl IntoExpr) -> Expr {
        Expr::Compare {
            op,
            lhs: self.boxed(),
            rhs: other.into_expr().boxed(),
        }
    }

    fn by_key(self, func: KeyFunction, key: Expr) -> Expr {
        Expr::ByKey {
            func,
            base: self.boxed(),
            key: key.boxed(),
        }
    }

    /// Member lookup on the result of `self`.
    pub fn field(self, name: impl Into<String>) -> Expr {
        Expr::Field {
            base: self.boxed(),
            name: name.into(),
        }
    }

    /// Array element at `index`.
    pub fn index(self, index: i64) -> Expr {
        Expr::Index {
            base: self.boxed(),
            index,
        }
    }

    /// Array slice `[start:stop:step]`.
    pub fn slice(self, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Expr {
        Expr::Slice {
            base: self.boxed(),
            start,
            stop,
            step,
        }
    }

    /// List projection; `then` is evaluated against each element.
    pub fn project(self, then: Expr) -> Expr {
        Expr::Project {
            base: self.boxed(),
            then: then.boxed(),
        }
    }

    /// Object value projection; `then` is evaluated against each value.
    pub fn project_values(self, then: Expr) -> Expr {
        Expr::ProjectValues {
            base: self.boxed(),
            then: then.boxed(),
        }
    }

    /// Flattens one level of nested arrays.
    pub fn flatten(self) -> Expr {
        Expr::Flatten(self.boxed())
    }

    /// Keeps the elements for which `predicate` is truthy.
    pub fn filter(self, predicate: Expr) -> Expr {
        Expr::Filter {
            base: self.boxed(),
            predicate: predicate.boxed(),
        }
    }

    /// Evaluates `next` against the result of `self`.
    pub fn pipe(self, next: Expr) -> Expr {
        Expr::Pipe(self.boxed(), next.boxed())
    }

    pub fn eq(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Eq, other)
    }

    pub fn ne(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Ne, other)
    }

    pub fn lt(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Lt, other)
    }

    pub fn le(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Le, other)
    }

    pub fn gt(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Gt, other)
    }

    pub fn ge(self, other: impl IntoExpr) -> Expr {
        self.compare(Comparator::Ge, other)
    }

    pub fn and(self, other: impl IntoExpr) -> Expr {
        Expr::And(self.boxed(), other.into_expr().boxed())
    }

    pub fn or(self, other: impl IntoExpr) -> Expr {
        Expr::Or(self.boxed(), other.into_expr().boxed())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Expr {
        Expr::Not(self.boxed())
    }

    pub fn abs(self) -> Expr {
        self.call(Function::Abs)
    }

    pub fn avg(self) -> Expr {
        self.call(Function::Avg)
    }

    pub fn ceil(self) -> Expr {
        self.call(Function::Ceil)
    }

    pub fn floor(self) -> Expr {
        self.call(Function::Floor)
    }

    pub fn keys(self) -> Expr {
        self.call(Function::Keys)
    }

    pub fn values(self) -> Expr {
        self.call(Function::Values)
    }

    pub fn length(self) -> Expr {
        self.call(Function::Length)
    }

    pub fn max(self) -> Expr {
        self.call(Function::Max)
    }

    pub fn min(self) -> Expr {
        self.call(Function::Min)
    }

    pub fn reverse(self) -> Expr {
        self.call(Function::Reverse)
    }

    pub fn sort(self) -> Expr {
        self.call(Function::Sort)
    }

    pub fn sum(self) -> Expr {
        self.call(Function::Sum)
    }

    pub fn to_array(self) -> Expr {
        self.call(Function::ToArray)
    }

    pub fn to_number(self) -> Expr {
        self.call(Function::ToNumber)
    }

    /// `to_string(self)`; named to avoid clashing with [`ToString`].
    pub fn to_json_string(self) -> Expr {
        self.call(Function::ToString)
    }

    pub fn type_of(self) -> Expr {
        self.call(Function::Type)
    }

    /// `contains(self, needle)` for arrays and strings.
    pub fn contains(self, needle: impl IntoExpr) -> Expr {
        Expr::Call {
            func: Function::Contains,
            args: vec![self, needle.into_expr()],
        }
    }

    pub fn starts_with(self, prefix: impl IntoExpr) -> Expr {
        Expr::Call {
            func: Function::StartsWith,
            args: vec![self, prefix.into_expr()],
        }
    }

    pub fn ends_with(self, suffix: impl IntoExpr) -> Expr {
        Expr::Call {
            func: Function::EndsWith,
            args: vec![self, suffix.into_expr()],
        }
    }

    /// `join(glue, self)`.
    pub fn join(self, glue: impl Into<String>) -> Expr {
        Expr::Call {
            func: Function::Join,
            args: vec![Expr::Literal(Value::String(glue.into())), self],
        }
    }

    /// `map(&func, self)`.
    pub fn map_with(self, func: Expr) -> Expr {
        self.by_key(KeyFunction::Map, func)
    }

    pub fn sort_by(self, key: Expr) -> Expr {
        self.by_key(KeyFunction::SortBy, key)
    }

    pub fn min_by(self, key: Expr) -> Expr {
        self.by_key(KeyFunction::MinBy, key)
    }

    pub fn max_by(self, key: Expr) -> Expr {
        self.by_key(KeyFunction::MaxBy, key)
    }
}

// ---------------------------------------------------------------------------
// JMESPath rendering
// ---------------------------------------------------------------------------

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_identifier(name) {
        f.write_str(name)
    } else {
        write!(f, "{}", Value::String(name.to_string()))
    }
}

fn write_slice(
    f: &mut fmt::Formatter<'_>,
    start: &Option<i64>,
    stop: &Option<i64>,
    step: &Option<i64>,
) -> fmt::Result {
    f.write_str("[")?;
    if let Some(s) = start {
        write!(f, "{}", s)?;
    }
    f.write_str(":")?;
    if let Some(s) = stop {
        write!(f, "{}", s)?;
    }
    if let Some(s) = step {
        write!(f, ":{}", s)?;
    }
    f.write_str("]")
}

/// Whether a postfix (`.name`, `[0]`, `[*]`, ...) written after `expr`
/// applies to its value. Projections would carry the postfix into every
/// element, and operators bind looser than any postfix.
fn takes_postfix(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Identity
            | Expr::Literal(_)
            | Expr::Field { .. }
            | Expr::Index { .. }
            | Expr::MultiList(_)
            | Expr::MultiDict(_)
            | Expr::Call { .. }
            | Expr::ByKey { .. }
    )
}

fn write_base(f: &mut fmt::Formatter<'_>, base: &Expr) -> fmt::Result {
    if takes_postfix(base) {
        write!(f, "{}", base)
    } else {
        write!(f, "({})", base)
    }
}

/// `@` followed only by fields and indexes.
fn is_relative_path(expr: &Expr) -> bool {
    match expr {
        Expr::Identity => true,
        Expr::Field { base, .. } | Expr::Index { base, .. } => is_relative_path(base),
        _ => false,
    }
}

/// Writes the per-element side of a projection. Paths rooted at `@` render
/// as a suffix (`[*].a[0]`); anything else is wrapped in `not_null`, which
/// yields the same value and lets the projection drop the same nulls.
fn write_projected(f: &mut fmt::Formatter<'_>, then: &Expr) -> fmt::Result {
    match then {
        Expr::Identity => Ok(()),
        Expr::Field { .. } | Expr::Index { .. } if is_relative_path(then) => write_suffix(f, then),
        Expr::Slice { base, .. }
        | Expr::Project { base, .. }
        | Expr::ProjectValues { base, .. }
        | Expr::Filter { base, .. }
            if is_relative_path(base) =>
        {
            write_suffix(f, then)
        }
        Expr::MultiList(_) | Expr::MultiDict(_) => write!(f, ".{}", then),
        other => write!(f, ".not_null({})", other),
    }
}

/// Writes a relative path with its leading `@` elided, so `Field(@, "a")`
/// renders as `.a`.
fn write_suffix(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Identity => Ok(()),
        Expr::Field { base, name } => {
            write_suffix(f, base)?;
            f.write_str(".")?;
            write_name(f, name)
        }
        Expr::Index { base, index } => {
            write_suffix(f, base)?;
            write!(f, "[{}]", index)
        }
        Expr::Slice {
            base,
            start,
            stop,
            step,
        } => {
            write_suffix(f, base)?;
            write_slice(f, start, stop, step)
        }
        Expr::Project { base, then } => {
            write_suffix(f, base)?;
            f.write_str("[*]")?;
            write_projected(f, then)
        }
        Expr::ProjectValues { base, then } => {
            write_suffix(f, base)?;
            f.write_str(".*")?;
            write_projected(f, then)
        }
        Expr::Filter { base, predicate } => {
            write_suffix(f, base)?;
            write!(f, "[?{}]", predicate)
        }
        other => write!(f, ".not_null({})", other),
    }
}

/// Writes an operand, parenthesized when it binds looser than its parent.
/// Comparisons bind tighter than `&&`/`||` but cannot nest unparenthesized.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, inside_compare: bool) -> fmt::Result {
    match expr {
        Expr::And(..) | Expr::Or(..) | Expr::Pipe(..) => write!(f, "({})", expr),
        Expr::Compare { .. } if inside_compare => write!(f, "({})", expr),
        _ => write!(f, "{}", expr),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identity => f.write_str("@"),
            Expr::Literal(value) => write!(f, "`{}`", value),
            Expr::Field { base, name } => {
                if **base != Expr::Identity {
                    write_base(f, base)?;
                    f.write_str(".")?;
                }
                write_name(f, name)
            }
            Expr::Index { base, index } => {
                write_base(f, base)?;
                write!(f, "[{}]", index)
            }
            Expr::Slice {
                base,
                start,
                stop,
                step,
            } => {
                write_base(f, base)?;
                write_slice(f, start, stop, step)
            }
            Expr::Project { base, then } => {
                match **base {
                    // Neither yields nulls, so extending their projection
                    // equals projecting over their result.
                    Expr::Filter { .. } | Expr::Flatten(_) => write!(f, "{}", base)?,
                    _ => {
                        write_base(f, base)?;
                        f.write_str("[*]")?;
                    }
                }
                write_projected(f, then)
            }
            Expr::ProjectValues { base, then } => {
                write_base(f, base)?;
                f.write_str(".*")?;
                write_projected(f, then)
            }
            Expr::Flatten(base) => {
                write_base(f, base)?;
                f.write_str("[]")
            }
            Expr::Filter { base, predicate } => {
                write_base(f, base)?;
                write!(f, "[?{}]", predicate)
            }
            Expr::MultiList(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Expr::MultiDict(items) => {
                f.write_str("{")?;
                for (i, (key, item)) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_name(f, key)?;
                    write!(f, ": {}", item)?;
                }
                f.write_str("}")
            }
            Expr::Compare { op, lhs, rhs } => {
                write_operand(f, lhs, true)?;
                write!(f, " {} ", op.as_str())?;
                write_operand(f, rhs, true)
            }
            Expr::And(lhs, rhs) => {
                write_operand(f, lhs, false)?;
                f.write_str(" && ")?;
                write_operand(f, rhs, false)
            }
            Expr::Or(lhs, rhs) => {
                write_operand(f, lhs, false)?;
                f.write_str(" || ")?;
                write_operand(f, rhs, false)
            }
            Expr::Not(inner) => {
                // `!` binds tighter than `.`, so only a bare name or a
                // self-delimited operand goes unparenthesized.
                f.write_str("!")?;
                match **inner {
                    Expr::Field { ref base, .. } if **base != Expr::Identity => {
                        write!(f, "({})", inner)
                    }
                    Expr::Not(_) => write!(f, "{}", inner),
                    ref other if takes_postfix(other) && !matches!(other, Expr::Index { .. }) => {
                        write!(f, "{}", inner)
                    }
                    _ => write!(f, "({})", inner),
                }
            }
            Expr::Pipe(lhs, rhs) => write!(f, "{} | {}", lhs, rhs),
            Expr::Call { func, args } => {
                write!(f, "{}(", func.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::ByKey { func, base, key } => match func {
                KeyFunction::Map => write!(f, "map(&{}, {})", key, base),
                _ => write!(f, "{}({}, &{})", func.name(), base, key),
            },
        }
    }
}
