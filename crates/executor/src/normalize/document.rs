//! Document-store command parsing.
//!
//! A document command is a JSON object:
//!
//! ```json
//! {"collection": "users", "operation": "find", "query": {"age": {"$gt": 30}}, "limit": 10}
//! ```
//!
//! `operation` defaults to `find` and is case-insensitive. Query-language
//! parameters (`query`, `fields`, `document`, `update`, `pipeline`) may be
//! JSON strings or inline JSON; either way they are handed to the backend as
//! text.

use querygate_core::{json_to_text, JsonValue, Row};

use crate::{Error, Result};

/// One document-store operation with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOperation {
    Find {
        query: Option<String>,
        fields: Option<String>,
        limit: Option<u64>,
        skip: Option<u64>,
    },
    Count {
        query: Option<String>,
    },
    Aggregate {
        pipeline: String,
    },
    Insert {
        document: String,
    },
    Update {
        query: String,
        update: String,
    },
    Delete {
        query: String,
    },
}

impl DocumentOperation {
    /// Canonical lowercase operation name.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentOperation::Find { .. } => "find",
            DocumentOperation::Count { .. } => "count",
            DocumentOperation::Aggregate { .. } => "aggregate",
            DocumentOperation::Insert { .. } => "insert",
            DocumentOperation::Update { .. } => "update",
            DocumentOperation::Delete { .. } => "delete",
        }
    }
}

/// A parsed document command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCommand {
    /// Target collection.
    pub collection: String,
    /// What to do there.
    pub operation: DocumentOperation,
}

impl DocumentCommand {
    /// Parse command text.
    pub fn parse(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text.trim())
            .map_err(|e| Error::invalid(format!("malformed document command: {e}")))?;
        let JsonValue::Object(obj) = value else {
            return Err(Error::invalid("document command must be a JSON object"));
        };

        let collection = text_param(&obj, "collection")
            .ok_or_else(|| Error::invalid("collection must not be blank"))?;
        let operation = text_param(&obj, "operation").unwrap_or_else(|| "find".to_string());

        let operation = match operation.to_ascii_lowercase().as_str() {
            "find" => DocumentOperation::Find {
                query: text_param(&obj, "query"),
                fields: text_param(&obj, "fields"),
                limit: positive_param(&obj, "limit")?,
                skip: positive_param(&obj, "skip")?,
            },
            "count" => DocumentOperation::Count {
                query: text_param(&obj, "query"),
            },
            "aggregate" => DocumentOperation::Aggregate {
                pipeline: required(&obj, "aggregate", &["pipeline"])?.remove(0),
            },
            "insert" => DocumentOperation::Insert {
                document: required(&obj, "insert", &["document"])?.remove(0),
            },
            "update" => {
                let mut parts = required(&obj, "update", &["query", "update"])?.into_iter();
                DocumentOperation::Update {
                    query: parts.next().unwrap_or_default(),
                    update: parts.next().unwrap_or_default(),
                }
            }
            "delete" => DocumentOperation::Delete {
                query: required(&obj, "delete", &["query"])?.remove(0),
            },
            _ => {
                return Err(Error::invalid(format!(
                    "unsupported document operation: {operation}"
                )))
            }
        };

        Ok(Self {
            collection,
            operation,
        })
    }

    /// Operation kind tag, e.g. `DOCUMENT_FIND`.
    pub fn kind(&self) -> String {
        format!("DOCUMENT_{}", self.operation.name().to_ascii_uppercase())
    }
}

/// Field as text; absent, null and blank all count as missing.
fn text_param(obj: &Row, name: &str) -> Option<String> {
    obj.get(name)
        .and_then(json_to_text)
        .filter(|s| !s.trim().is_empty())
}

/// All `names` as text, or an error naming every missing one.
fn required(obj: &Row, operation: &str, names: &[&str]) -> Result<Vec<String>> {
    let values: Vec<Option<String>> = names.iter().map(|n| text_param(obj, n)).collect();
    if values.iter().any(Option::is_none) {
        return Err(Error::invalid(format!(
            "{operation} requires {}",
            names.join(" and ")
        )));
    }
    Ok(values.into_iter().flatten().collect())
}

/// Integer field kept only when positive. Numbers and numeric strings are accepted.
fn positive_param(obj: &Row, name: &str) -> Result<Option<u64>> {
    let n = match obj.get(name) {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::invalid(format!("{name} must be an integer, got {n}")))?,
        Some(JsonValue::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::invalid(format!("{name} must be an integer: {e}")))?,
        Some(other) => {
            return Err(Error::invalid(format!(
                "{name} must be an integer, got {other}"
            )))
        }
    };
    Ok((n > 0).then_some(n as u64))
}
