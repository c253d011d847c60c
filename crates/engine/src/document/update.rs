//! Update documents
//!
//! Supported operators are `$set`, `$unset` and `$inc`. An update document
//! without any operator is shorthand for `$set` of each of its fields.
//! `_id` may not be changed.

use querygate_core::{JsonValue, Row};

use super::filter::{parse_object, resolve, type_name, values_equal};
use crate::{EngineError, EngineResult};

/// A single compiled update step.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Assign a value at a dotted path, creating intermediate objects.
    Set(String, JsonValue),
    /// Remove the value at a dotted path.
    Unset(String),
    /// Add a number to the value at a dotted path (missing counts as zero).
    Inc(String, serde_json::Number),
}

/// Compiled update document.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    /// Compile update text.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let doc = parse_object("update", text)?;
        if doc.is_empty() {
            return Err(EngineError::invalid_query("update", "update document is empty"));
        }

        let operator_count = doc.keys().filter(|k| k.starts_with('$')).count();
        if operator_count == 0 {
            let ops = doc
                .into_iter()
                .map(|(path, value)| UpdateOp::Set(path, value))
                .collect();
            return Ok(Self { ops });
        }
        if operator_count != doc.len() {
            return Err(EngineError::invalid_query(
                "update",
                "cannot mix update operators with plain fields",
            ));
        }

        let mut ops = Vec::new();
        for (op, arg) in doc {
            let fields = match arg {
                JsonValue::Object(fields) => fields,
                other => {
                    return Err(EngineError::invalid_query(
                        "update",
                        format!("{op} expects an object, got {}", type_name(&other)),
                    ))
                }
            };
            for (path, value) in fields {
                ops.push(match op.as_str() {
                    "$set" => UpdateOp::Set(path, value),
                    "$unset" => UpdateOp::Unset(path),
                    "$inc" => match value {
                        JsonValue::Number(n) => UpdateOp::Inc(path, n),
                        other => {
                            return Err(EngineError::invalid_query(
                                "update",
                                format!("$inc on '{path}' needs a number, got {}", type_name(&other)),
                            ))
                        }
                    },
                    other => {
                        return Err(EngineError::invalid_query(
                            "update",
                            format!("unknown update operator: {other}"),
                        ))
                    }
                });
            }
        }
        Ok(Self { ops })
    }

    /// Apply to a document in place. Returns whether the document changed.
    pub fn apply(&self, doc: &mut Row) -> EngineResult<bool> {
        let before = doc.clone();
        for op in &self.ops {
            match op {
                UpdateOp::Set(path, value) => {
                    guard_id(doc, path, Some(value))?;
                    set_path(doc, path, value.clone())?;
                }
                UpdateOp::Unset(path) => {
                    guard_id(doc, path, None)?;
                    unset_path(doc, path);
                }
                UpdateOp::Inc(path, delta) => {
                    guard_id(doc, path, None)?;
                    let next = match resolve(doc, path) {
                        None => JsonValue::Number(delta.clone()),
                        Some(JsonValue::Number(current)) => JsonValue::Number(add(current, delta)?),
                        Some(other) => {
                            return Err(EngineError::unsupported(format!(
                                "cannot apply $inc to '{path}' holding a {}",
                                type_name(other)
                            )))
                        }
                    };
                    set_path(doc, path, next)?;
                }
            }
        }
        Ok(*doc != before)
    }
}

fn guard_id(doc: &Row, path: &str, value: Option<&JsonValue>) -> EngineResult<()> {
    if path != "_id" && !path.starts_with("_id.") {
        return Ok(());
    }
    match (resolve(doc, path), value) {
        (Some(current), Some(next)) if values_equal(current, next) => Ok(()),
        _ => Err(EngineError::unsupported(
            "performing an update on the path '_id' would modify the immutable field '_id'",
        )),
    }
}

fn add(a: &serde_json::Number, b: &serde_json::Number) -> EngineResult<serde_json::Number> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Ok(sum.into());
        }
    }
    let sum = a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0);
    serde_json::Number::from_f64(sum)
        .ok_or_else(|| EngineError::unsupported("$inc produced a non-finite number"))
}

fn set_path(doc: &mut Row, path: &str, value: JsonValue) -> EngineResult<()> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop().unwrap_or(path);
    let mut current = doc;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| JsonValue::Object(Row::new()));
        current = match slot {
            JsonValue::Object(map) => map,
            other => {
                return Err(EngineError::unsupported(format!(
                    "cannot create field in '{path}': '{segment}' holds a {}",
                    type_name(other)
                )))
            }
        };
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

fn unset_path(doc: &mut Row, path: &str) {
    match path.split_once('.') {
        None => {
            doc.shift_remove(path);
        }
        Some((head, tail)) => {
            if let Some(JsonValue::Object(inner)) = doc.get_mut(head) {
                unset_path(inner, tail);
            }
        }
    }
}
