//! Filter documents
//!
//! A filter is compiled once per call into a [`Predicate`] tree and then
//! evaluated against each stored document.
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{"f": v}` | `f` equals `v`, or `f` is an array containing `v` |
//! | `{"f": {"$gt": v, ...}}` | every operator condition holds |
//! | `{"$and": [...]}` / `$or` / `$nor` | logical combination of sub-filters |
//! | `{"a.b": v}` | dotted paths walk nested objects |
//!
//! Supported field operators: `$eq $ne $gt $gte $lt $lte $in $nin $exists`.

use std::cmp::Ordering;

use querygate_core::{JsonValue, Row};

use crate::{EngineError, EngineResult};

/// Compiled filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All sub-predicates hold (an empty list always holds).
    And(Vec<Predicate>),
    /// At least one sub-predicate holds.
    Or(Vec<Predicate>),
    /// No sub-predicate holds.
    Nor(Vec<Predicate>),
    /// A condition on the value at a dotted path.
    Field {
        /// Dotted field path.
        path: String,
        /// Condition on the resolved value.
        cond: Condition,
    },
}

/// Condition on a single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `$eq` or implicit equality.
    Eq(JsonValue),
    /// `$ne`
    Ne(JsonValue),
    /// `$gt`
    Gt(JsonValue),
    /// `$gte`
    Gte(JsonValue),
    /// `$lt`
    Lt(JsonValue),
    /// `$lte`
    Lte(JsonValue),
    /// `$in`
    In(Vec<JsonValue>),
    /// `$nin`
    Nin(Vec<JsonValue>),
    /// `$exists`
    Exists(bool),
    /// Several operators on the same field.
    All(Vec<Condition>),
}

/// Parse a JSON object from query-language text.
pub(crate) fn parse_object(what: &'static str, text: &str) -> EngineResult<Row> {
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| EngineError::invalid_query(what, e.to_string()))?;
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(EngineError::invalid_query(
            what,
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

pub(crate) fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl Predicate {
    /// Compile filter text. `None` or blank text matches every document.
    pub fn parse(text: Option<&str>) -> EngineResult<Self> {
        match text.map(str::trim) {
            None | Some("") => Ok(Predicate::And(Vec::new())),
            Some(text) => Self::compile(&parse_object("filter", text)?),
        }
    }

    fn compile(doc: &Row) -> EngineResult<Self> {
        let mut parts = Vec::with_capacity(doc.len());
        for (key, value) in doc {
            let part = match key.as_str() {
                "$and" => Predicate::And(Self::compile_list(key, value)?),
                "$or" => Predicate::Or(Self::compile_list(key, value)?),
                "$nor" => Predicate::Nor(Self::compile_list(key, value)?),
                op if op.starts_with('$') => {
                    return Err(EngineError::invalid_query(
                        "filter",
                        format!("unknown top level operator: {op}"),
                    ))
                }
                path => Predicate::Field {
                    path: path.to_string(),
                    cond: Condition::compile(value)?,
                },
            };
            parts.push(part);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Predicate::And(parts)
        })
    }

    fn compile_list(op: &str, value: &JsonValue) -> EngineResult<Vec<Self>> {
        let items = match value {
            JsonValue::Array(items) if !items.is_empty() => items,
            _ => {
                return Err(EngineError::invalid_query(
                    "filter",
                    format!("{op} must be a non-empty array"),
                ))
            }
        };
        items
            .iter()
            .map(|item| match item {
                JsonValue::Object(doc) => Self::compile(doc),
                _ => Err(EngineError::invalid_query(
                    "filter",
                    format!("{op} entries must be objects"),
                )),
            })
            .collect()
    }

    /// Evaluate against a document.
    pub fn matches(&self, doc: &Row) -> bool {
        match self {
            Predicate::And(parts) => parts.iter().all(|p| p.matches(doc)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(doc)),
            Predicate::Nor(parts) => !parts.iter().any(|p| p.matches(doc)),
            Predicate::Field { path, cond } => cond.holds(resolve(doc, path)),
        }
    }
}

impl Condition {
    fn compile(value: &JsonValue) -> EngineResult<Self> {
        let ops = match value {
            JsonValue::Object(map) if map.keys().next().is_some_and(|k| k.starts_with('$')) => map,
            other => return Ok(Condition::Eq(other.clone())),
        };

        let mut conds = Vec::with_capacity(ops.len());
        for (op, arg) in ops {
            let cond = match op.as_str() {
                "$eq" => Condition::Eq(arg.clone()),
                "$ne" => Condition::Ne(arg.clone()),
                "$gt" => Condition::Gt(arg.clone()),
                "$gte" => Condition::Gte(arg.clone()),
                "$lt" => Condition::Lt(arg.clone()),
                "$lte" => Condition::Lte(arg.clone()),
                "$in" => Condition::In(expect_array(op, arg)?),
                "$nin" => Condition::Nin(expect_array(op, arg)?),
                "$exists" => Condition::Exists(truthy(arg)),
                other => {
                    return Err(EngineError::invalid_query(
                        "filter",
                        format!("unknown operator: {other}"),
                    ))
                }
            };
            conds.push(cond);
        }
        Ok(if conds.len() == 1 {
            conds.remove(0)
        } else {
            Condition::All(conds)
        })
    }

    fn holds(&self, field: Option<&JsonValue>) -> bool {
        match self {
            Condition::Eq(expected) => field.is_some_and(|v| matches_eq(v, expected)),
            Condition::Ne(expected) => !field.is_some_and(|v| matches_eq(v, expected)),
            Condition::Gt(bound) => compare_any(field, bound, |o| o == Ordering::Greater),
            Condition::Gte(bound) => compare_any(field, bound, |o| o != Ordering::Less),
            Condition::Lt(bound) => compare_any(field, bound, |o| o == Ordering::Less),
            Condition::Lte(bound) => compare_any(field, bound, |o| o != Ordering::Greater),
            Condition::In(options) => {
                field.is_some_and(|v| options.iter().any(|opt| matches_eq(v, opt)))
            }
            Condition::Nin(options) => {
                !field.is_some_and(|v| options.iter().any(|opt| matches_eq(v, opt)))
            }
            Condition::Exists(wanted) => field.is_some() == *wanted,
            Condition::All(conds) => conds.iter().all(|c| c.holds(field)),
        }
    }
}

fn expect_array(op: &str, arg: &JsonValue) -> EngineResult<Vec<JsonValue>> {
    match arg {
        JsonValue::Array(items) => Ok(items.clone()),
        _ => Err(EngineError::invalid_query(
            "filter",
            format!("{op} needs an array"),
        )),
    }
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

/// Resolve a dotted path inside a document.
pub(crate) fn resolve<'a>(doc: &'a Row, path: &str) -> Option<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Equality with numeric widening (`1 == 1.0`).
pub(crate) fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

fn matches_eq(field: &JsonValue, expected: &JsonValue) -> bool {
    if values_equal(field, expected) {
        return true;
    }
    match field {
        JsonValue::Array(items) => items.iter().any(|item| values_equal(item, expected)),
        _ => false,
    }
}

fn compare(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_any(field: Option<&JsonValue>, bound: &JsonValue, accept: impl Fn(Ordering) -> bool) -> bool {
    match field {
        None => false,
        Some(JsonValue::Array(items)) => items
            .iter()
            .any(|item| compare(item, bound).is_some_and(&accept)),
        Some(value) => compare(value, bound).is_some_and(accept),
    }
}
