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

//! Native evaluation of expression trees over `serde_json::Value`.
//!
//! Semantics follow JMESPath: navigation on the wrong type
//! yields `null`, projections drop `null` results, ordering comparisons are
//! only defined between numbers, and `&&`/`||` return the deciding operand.
//!
//! Navigation borrows from the input document. Only the values that end up
//! in a result (or feed a function that builds a new value) are cloned, so
//! `users[0].name` costs the same on a document of ten users or ten thousand.

use crate::error::{EvalError, Result};
use crate::expr::{Comparator, Expr, Function, KeyFunction};
use crate::value::{
    canonical, compare_sortable, is_truthy, number, sorted_keys, type_name, values_equal,
};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::cmp::Ordering;

static NULL: Value = Value::Null;

impl Expr {
    /// Evaluates the expression against `data`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] when a function receives arguments it does
    /// not accept or a slice uses a zero step.
    pub fn search(&self, data: &Value) -> Result<Value> {
        eval(self, data).map(Cow::into_owned)
    }
}

fn null<'a>() -> Cow<'a, Value> {
    Cow::Borrowed(&NULL)
}

fn eval<'a>(expr: &'a Expr, current: &'a Value) -> Result<Cow<'a, Value>> {
    match expr {
        Expr::Identity => Ok(Cow::Borrowed(current)),
        Expr::Literal(value) => Ok(Cow::Borrowed(value)),
        Expr::Field { base, name } => Ok(match eval(base, current)? {
            Cow::Borrowed(Value::Object(map)) => match map.get(name) {
                Some(value) => Cow::Borrowed(value),
                None => null(),
            },
            Cow::Owned(Value::Object(mut map)) => match map.remove(name) {
                Some(value) => Cow::Owned(value),
                None => null(),
            },
            _ => null(),
        }),
        Expr::Index { base, index } => Ok(match eval(base, current)? {
            Cow::Borrowed(Value::Array(items)) => match resolve_index(items.len(), *index) {
                Some(i) => Cow::Borrowed(&items[i]),
                None => null(),
            },
            Cow::Owned(Value::Array(mut items)) => match resolve_index(items.len(), *index) {
                Some(i) => Cow::Owned(items.swap_remove(i)),
                None => null(),
            },
            _ => null(),
        }),
        Expr::Slice {
            base,
            start,
            stop,
            step,
        } => {
            let step = step.unwrap_or(1);
            if step == 0 {
                return Err(EvalError::ZeroSliceStep);
            }
            Ok(match eval(base, current)?.as_ref() {
                Value::Array(items) => Cow::Owned(Value::Array(slice(items, *start, *stop, step))),
                _ => null(),
            })
        }
        Expr::Project { base, then } => match eval(base, current)?.as_ref() {
            Value::Array(items) => project(items.iter(), then).map(Cow::Owned),
            _ => Ok(null()),
        },
        Expr::ProjectValues { base, then } => match eval(base, current)?.as_ref() {
            Value::Object(map) => {
                let values = sorted_keys(map).into_iter().map(|k| &map[k.as_str()]);
                project(values, then).map(Cow::Owned)
            }
            _ => Ok(null()),
        },
        Expr::Flatten(base) => match eval(base, current)?.as_ref() {
            Value::Array(items) => {
                // `[]` is itself a projection, so nulls never survive it.
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Array(inner) => {
                            out.extend(inner.iter().filter(|v| !v.is_null()).cloned())
                        }
                        Value::Null => {}
                        other => out.push(other.clone()),
                    }
                }
                Ok(Cow::Owned(Value::Array(out)))
            }
            _ => Ok(null()),
        },
        Expr::Filter { base, predicate } => match eval(base, current)?.as_ref() {
            Value::Array(items) => {
                let mut out = Vec::new();
                for item in items {
                    // A filter is a projection: a null that passes is still dropped.
                    if is_truthy(&*eval(predicate, item)?) && !item.is_null() {
                        out.push(item.clone());
                    }
                }
                Ok(Cow::Owned(Value::Array(out)))
            }
            _ => Ok(null()),
        },
        Expr::MultiList(items) => {
            if current.is_null() {
                return Ok(null());
            }
            let out = items
                .iter()
                .map(|item| eval(item, current).map(Cow::into_owned))
                .collect::<Result<Vec<_>>>()?;
            Ok(Cow::Owned(Value::Array(out)))
        }
        Expr::MultiDict(items) => {
            if current.is_null() {
                return Ok(null());
            }
            let mut out = Map::with_capacity(items.len());
            for (key, item) in items {
                out.insert(key.clone(), eval(item, current)?.into_owned());
            }
            Ok(Cow::Owned(Value::Object(out)))
        }
        Expr::Compare { op, lhs, rhs } => {
            let left = eval(lhs, current)?;
            let right = eval(rhs, current)?;
            Ok(Cow::Owned(compare(*op, &left, &right)))
        }
        Expr::And(lhs, rhs) => {
            let left = eval(lhs, current)?;
            if is_truthy(&left) {
                eval(rhs, current)
            } else {
                Ok(left)
            }
        }
        Expr::Or(lhs, rhs) => {
            let left = eval(lhs, current)?;
            if is_truthy(&left) {
                Ok(left)
            } else {
                eval(rhs, current)
            }
        }
        Expr::Not(inner) => Ok(Cow::Owned(Value::Bool(!is_truthy(&*eval(inner, current)?)))),
        Expr::Pipe(lhs, rhs) => match eval(lhs, current)? {
            Cow::Borrowed(left) => eval(rhs, left),
            Cow::Owned(left) => eval(rhs, &left).map(|v| Cow::Owned(v.into_owned())),
        },
        Expr::Call { func, args } => {
            let values = args
                .iter()
                .map(|arg| eval(arg, current))
                .collect::<Result<Vec<_>>>()?;
            call(*func, values).map(Cow::Owned)
        }
        Expr::ByKey { func, base, key } => {
            let base = eval(base, current)?;
            call_by_key(*func, &base, key).map(Cow::Owned)
        }
    }
}

fn project<'v>(items: impl Iterator<Item = &'v Value>, then: &Expr) -> Result<Value> {
    let mut out = Vec::new();
    for item in items {
        let value = eval(then, item)?;
        if !value.is_null() {
            out.push(value.into_owned());
        }
    }
    Ok(Value::Array(out))
}

/// Resolves a possibly negative index against `len`.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = if index < 0 { len.checked_add(index)? } else { index };
    if (0..len).contains(&idx) {
        usize::try_from(idx).ok()
    } else {
        None
    }
}

fn adjust_endpoint(len: i64, endpoint: i64, step: i64) -> i64 {
    if endpoint < 0 {
        let shifted = endpoint + len;
        if shifted >= 0 {
            shifted
        } else if step < 0 {
            -1
        } else {
            0
        }
    } else if endpoint >= len {
        if step < 0 {
            len - 1
        } else {
            len
        }
    } else {
        endpoint
    }
}

fn slice(items: &[Value], start: Option<i64>, stop: Option<i64>, step: i64) -> Vec<Value> {
    let len = items.len() as i64;
    if len == 0 {
        return Vec::new();
    }
    let from = match start {
        Some(s) => adjust_endpoint(len, s, step),
        None if step < 0 => len - 1,
        None => 0,
    };
    let to = match stop {
        Some(s) => adjust_endpoint(len, s, step),
        None if step < 0 => -1,
        None => len,
    };

    let mut out = Vec::new();
    let mut i = from;
    while (step > 0 && i < to) || (step < 0 && i > to) {
        out.push(items[i as usize].clone());
        // A step past the i64 range has already left the array.
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    out
}

fn compare(op: Comparator, left: &Value, right: &Value) -> Value {
    match op {
        Comparator::Eq => Value::Bool(values_equal(left, right)),
        Comparator::Ne => Value::Bool(!values_equal(left, right)),
        _ => {
            let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
                return Value::Null;
            };
            Value::Bool(match op {
                Comparator::Lt => l < r,
                Comparator::Le => l <= r,
                Comparator::Gt => l > r,
                Comparator::Ge => l >= r,
                Comparator::Eq | Comparator::Ne => unreachable!("handled above"),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in functions
// ---------------------------------------------------------------------------

fn expect_arity(func: Function, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(EvalError::InvalidArity {
            function: func.name(),
            expected: match expected {
                1 => "1",
                2 => "2",
                _ => "a fixed number of",
            },
            actual,
        })
    }
}

fn as_f64(func: Function, position: usize, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| EvalError::invalid_type(func.name(), position, "number", value))
}

fn as_str<'a>(func: Function, position: usize, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| EvalError::invalid_type(func.name(), position, "string", value))
}

fn as_array<'a>(func: &'static str, position: usize, value: &'a Value) -> Result<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(EvalError::invalid_type(func, position, "array", other)),
    }
}

/// Takes the array out of an argument, cloning only when it is borrowed.
fn into_array(func: &'static str, position: usize, value: Cow<'_, Value>) -> Result<Vec<Value>> {
    match value {
        Cow::Owned(Value::Array(items)) => Ok(items),
        Cow::Borrowed(Value::Array(items)) => Ok(items.clone()),
        other => Err(EvalError::invalid_type(func, position, "array", &other)),
    }
}

fn finite(func: Function, n: f64) -> Result<Value> {
    number(n).ok_or(EvalError::NonFinite {
        function: func.name(),
    })
}

/// Checks that every element is a number, or that every element is a string.
fn check_sortable(func: &'static str, items: &[Value]) -> Result<()> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let kind = type_name(first);
    if kind != "number" && kind != "string" {
        return Err(EvalError::invalid_type(func, 0, "array of numbers or strings", first));
    }
    match items.iter().find(|v| type_name(v) != kind) {
        Some(odd) => Err(EvalError::invalid_type(
            func,
            0,
            "array of numbers or strings",
            odd,
        )),
        None => Ok(()),
    }
}

fn extremum(func: Function, items: &[Value], wanted: Ordering) -> Result<Value> {
    check_sortable(func.name(), items)?;
    let mut best: Option<&Value> = None;
    for item in items {
        best = match best {
            Some(current) if compare_sortable(item, current) != Some(wanted) => Some(current),
            _ => Some(item),
        };
    }
    Ok(best.cloned().unwrap_or(Value::Null))
}

fn call(func: Function, mut args: Vec<Cow<'_, Value>>) -> Result<Value> {
    match func {
        Function::NotNull => {
            if args.is_empty() {
                return Err(EvalError::InvalidArity {
                    function: func.name(),
                    expected: "at least 1",
                    actual: 0,
                });
            }
            Ok(args
                .into_iter()
                .find(|v| !v.is_null())
                .map_or(Value::Null, Cow::into_owned))
        }
        Function::Merge => {
            if args.is_empty() {
                return Err(EvalError::InvalidArity {
                    function: func.name(),
                    expected: "at least 1",
                    actual: 0,
                });
            }
            let mut out = Map::new();
            for (position, arg) in args.into_iter().enumerate() {
                match arg {
                    Cow::Owned(Value::Object(map)) => out.extend(map),
                    Cow::Borrowed(Value::Object(map)) => {
                        out.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())))
                    }
                    other => {
                        return Err(EvalError::invalid_type(
                            func.name(),
                            position,
                            "object",
                            &other,
                        ))
                    }
                }
            }
            Ok(Value::Object(out))
        }
        Function::Contains | Function::StartsWith | Function::EndsWith | Function::Join => {
            expect_arity(func, args.len(), 2)?;
            call_binary(func, &args[0], &args[1])
        }
        _ => {
            expect_arity(func, args.len(), 1)?;
            let arg = args.pop().unwrap_or_else(null);
            call_unary(func, arg)
        }
    }
}

fn call_binary(func: Function, first: &Value, second: &Value) -> Result<Value> {
    match func {
        Function::Contains => Ok(Value::Bool(match first {
            Value::Array(items) => items.iter().any(|item| values_equal(item, second)),
            Value::String(s) => second.as_str().map_or(false, |needle| s.contains(needle)),
            other => {
                return Err(EvalError::invalid_type(
                    func.name(),
                    0,
                    "array or string",
                    other,
                ))
            }
        })),
        Function::StartsWith => {
            let subject = as_str(func, 0, first)?;
            let prefix = as_str(func, 1, second)?;
            Ok(Value::Bool(subject.starts_with(prefix)))
        }
        Function::EndsWith => {
            let subject = as_str(func, 0, first)?;
            let suffix = as_str(func, 1, second)?;
            Ok(Value::Bool(subject.ends_with(suffix)))
        }
        Function::Join => {
            let glue = as_str(func, 0, first)?;
            let items = as_array(func.name(), 1, second)?;
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(as_str(func, 1, item)?);
            }
            Ok(Value::String(parts.join(glue)))
        }
        _ => unreachable!("{} is not a binary function", func.name()),
    }
}

fn call_unary(func: Function, arg: Cow<'_, Value>) -> Result<Value> {
    match func {
        Function::Abs => finite(func, as_f64(func, 0, &arg)?.abs()),
        Function::Ceil => finite(func, as_f64(func, 0, &arg)?.ceil()),
        Function::Floor => finite(func, as_f64(func, 0, &arg)?.floor()),
        Function::Avg | Function::Sum => {
            let items = as_array(func.name(), 0, &arg)?;
            let mut total = 0.0;
            for item in items {
                total += as_f64(func, 0, item)?;
            }
            if func == Function::Sum {
                finite(func, total)
            } else if items.is_empty() {
                Ok(Value::Null)
            } else {
                finite(func, total / items.len() as f64)
            }
        }
        Function::Keys => match arg.as_ref() {
            Value::Object(map) => Ok(Value::Array(
                sorted_keys(map)
                    .into_iter()
                    .map(|k| Value::String(k.clone()))
                    .collect(),
            )),
            other => Err(EvalError::invalid_type(func.name(), 0, "object", other)),
        },
        Function::Values => match arg.as_ref() {
            Value::Object(map) => Ok(Value::Array(
                sorted_keys(map)
                    .into_iter()
                    .map(|k| map[k.as_str()].clone())
                    .collect(),
            )),
            other => Err(EvalError::invalid_type(func.name(), 0, "object", other)),
        },
        Function::Length => match arg.as_ref() {
            Value::Array(items) => Ok(Value::from(items.len())),
            Value::Object(map) => Ok(Value::from(map.len())),
            Value::String(s) => Ok(Value::from(s.chars().count())),
            other => Err(EvalError::invalid_type(
                func.name(),
                0,
                "array, object or string",
                other,
            )),
        },
        Function::Max => extremum(func, as_array(func.name(), 0, &arg)?, Ordering::Greater),
        Function::Min => extremum(func, as_array(func.name(), 0, &arg)?, Ordering::Less),
        Function::Reverse => match arg.as_ref() {
            Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
            Value::Array(_) => {
                let mut items = into_array(func.name(), 0, arg)?;
                items.reverse();
                Ok(Value::Array(items))
            }
            other => Err(EvalError::invalid_type(
                func.name(),
                0,
                "array or string",
                other,
            )),
        },
        Function::Sort => {
            let mut items = into_array(func.name(), 0, arg)?;
            check_sortable(func.name(), &items)?;
            items.sort_by(|a, b| compare_sortable(a, b).unwrap_or(Ordering::Equal));
            Ok(Value::Array(items))
        }
        Function::ToArray => Ok(match arg.into_owned() {
            Value::Array(items) => Value::Array(items),
            other => Value::Array(vec![other]),
        }),
        Function::ToNumber => Ok(match arg.as_ref() {
            Value::Number(n) => Value::Number(n.clone()),
            Value::String(s) => {
                if let Ok(i) = s.parse::<i64>() {
                    Value::from(i)
                } else {
                    s.parse::<f64>().ok().and_then(number).unwrap_or(Value::Null)
                }
            }
            _ => Value::Null,
        }),
        Function::ToString => Ok(match arg.as_ref() {
            Value::String(s) => Value::String(s.clone()),
            other => Value::String(canonical(other).to_string()),
        }),
        Function::Type => Ok(Value::String(type_name(&arg).to_string())),
        _ => unreachable!("{} is not a unary function", func.name()),
    }
}

fn call_by_key(func: KeyFunction, base: &Value, key: &Expr) -> Result<Value> {
    let items = as_array(func.name(), if func == KeyFunction::Map { 1 } else { 0 }, base)?;
    let keys = items
        .iter()
        .map(|item| eval(key, item).map(Cow::into_owned))
        .collect::<Result<Vec<_>>>()?;

    if func == KeyFunction::Map {
        return Ok(Value::Array(keys));
    }
    check_sortable(func.name(), &keys)?;

    match func {
        KeyFunction::SortBy => {
            let mut order: Vec<usize> = (0..items.len()).collect();
            order.sort_by(|&a, &b| compare_sortable(&keys[a], &keys[b]).unwrap_or(Ordering::Equal));
            Ok(Value::Array(order.into_iter().map(|i| items[i].clone()).collect()))
        }
        KeyFunction::MinBy | KeyFunction::MaxBy => {
            let wanted = if func == KeyFunction::MinBy {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            let mut best: Option<usize> = None;
            for (i, k) in keys.iter().enumerate() {
                best = match best {
                    Some(b) if compare_sortable(k, &keys[b]) != Some(wanted) => Some(b),
                    _ => Some(i),
                };
            }
            Ok(best.map_or(Value::Null, |i| items[i].clone()))
        }
        KeyFunction::Map => unreachable!("handled above"),
    }
}
