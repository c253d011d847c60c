//! Projection documents
//!
//! `{"a": 1, "b.c": 1}` keeps only the listed paths (plus `_id` unless
//! `"_id": 0`); `{"a": 0}` drops the listed paths. Kept fields stay in the
//! document's own order.

use querygate_core::{JsonValue, Row};

use super::filter::parse_object;
use crate::{EngineError, EngineResult};

/// Compiled projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Keep only these paths.
    Include {
        /// Dotted paths to keep.
        paths: Vec<String>,
        /// Whether `_id` is kept as well.
        keep_id: bool,
    },
    /// Drop these paths.
    Exclude(Vec<String>),
}

fn flag(path: &str, value: &JsonValue) -> EngineResult<bool> {
    match value {
        JsonValue::Bool(b) => Ok(*b),
        JsonValue::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        _ => Err(EngineError::invalid_query(
            "projection",
            format!("value for '{path}' must be 0/1 or a boolean"),
        )),
    }
}

impl Projection {
    /// Compile projection text. `None` or blank text means no projection.
    pub fn parse(text: Option<&str>) -> EngineResult<Option<Self>> {
        let text = match text.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(text) => text,
        };
        let doc = parse_object("projection", text)?;
        if doc.is_empty() {
            return Ok(None);
        }

        let mut keep_id = true;
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for (path, value) in &doc {
            let on = flag(path, value)?;
            if path == "_id" {
                keep_id = on;
            } else if on {
                include.push(path.clone());
            } else {
                exclude.push(path.clone());
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (false, false) => Err(EngineError::invalid_query(
                "projection",
                "cannot mix inclusion and exclusion",
            )),
            (false, true) => Ok(Some(Projection::Include {
                paths: include,
                keep_id,
            })),
            (true, _) => {
                if !keep_id {
                    exclude.insert(0, "_id".to_string());
                }
                Ok(Some(Projection::Exclude(exclude)))
            }
        }
    }

    /// Produce the projected copy of a document.
    pub fn apply(&self, doc: &Row) -> Row {
        match self {
            Projection::Include { paths, keep_id } => {
                let split: Vec<Vec<&str>> = paths.iter().map(|p| p.split('.').collect()).collect();
                let mut out = include(doc, &split);
                if !keep_id {
                    out.shift_remove("_id");
                } else if let Some(id) = doc.get("_id") {
                    if !out.contains_key("_id") {
                        // Rebuild with _id leading, as stored documents have it first
                        let mut with_id = Row::new();
                        with_id.insert("_id".to_string(), id.clone());
                        with_id.extend(out);
                        out = with_id;
                    }
                }
                out
            }
            Projection::Exclude(paths) => {
                let mut out = doc.clone();
                for path in paths {
                    exclude(&mut out, path);
                }
                out
            }
        }
    }
}

fn include(doc: &Row, paths: &[Vec<&str>]) -> Row {
    let mut out = Row::new();
    for (key, value) in doc {
        let matching: Vec<&Vec<&str>> = paths.iter().filter(|p| p[0] == key.as_str()).collect();
        if matching.is_empty() {
            continue;
        }
        if matching.iter().any(|p| p.len() == 1) {
            out.insert(key.clone(), value.clone());
            continue;
        }
        if let JsonValue::Object(inner) = value {
            let tails: Vec<Vec<&str>> = matching.iter().map(|p| p[1..].to_vec()).collect();
            let projected = include(inner, &tails);
            if !projected.is_empty() {
                out.insert(key.clone(), JsonValue::Object(projected));
            }
        }
    }
    out
}

fn exclude(doc: &mut Row, path: &str) {
    match path.split_once('.') {
        None => {
            doc.shift_remove(path);
        }
        Some((head, tail)) => {
            if let Some(JsonValue::Object(inner)) = doc.get_mut(head) {
                exclude(inner, tail);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: JsonValue) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn project(spec: &str, value: JsonValue) -> JsonValue {
        let projection = Projection::parse(Some(spec)).unwrap().unwrap();
        JsonValue::Object(projection.apply(&doc(value)))
    }

    #[test]
    fn test_inclusion_keeps_id_and_document_order() {
        let out = project(
            r#"{"c": 1, "a": 1}"#,
            json!({"_id": "x", "a": 1, "b": 2, "c": 3}),
        );
        let keys: Vec<String> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["_id", "a", "c"]);
    }

    #[test]
    fn test_inclusion_without_id_and_nested() {
        let out = project(
            r#"{"_id": 0, "user.name": 1}"#,
            json!({"_id": "x", "user": {"name": "n", "pw": "p"}, "z": 1}),
        );
        assert_eq!(out, json!({"user": {"name": "n"}}));
    }

    #[test]
    fn test_exclusion() {
        let out = project(r#"{"pw": 0, "_id": 0}"#, json!({"_id": 1, "name": "n", "pw": "p"}));
        assert_eq!(out, json!({"name": "n"}));
    }

    #[test]
    fn test_blank_and_invalid() {
        assert_eq!(Projection::parse(None).unwrap(), None);
        assert_eq!(Projection::parse(Some("{}")).unwrap(), None);
        assert!(Projection::parse(Some(r#"{"a": 1, "b": 0}"#)).is_err());
        assert!(Projection::parse(Some(r#"{"a": "yes"}"#)).is_err());
    }
}
