//! Result rows and column tracking
//!
//! Every backend reports records as [`Row`]s: ordered maps from field name to
//! JSON value. Field order is the order the backend produced them in, so a
//! document keeps its own insertion order and a SQL row keeps the statement's
//! column order.

use rustc_hash::FxHashSet;

use crate::JsonValue;

/// One result record: field name → value, in backend order.
pub type Row = serde_json::Map<String, JsonValue>;

/// Deduplicated union of column names in first-seen order.
///
/// Rows from schemaless backends may disagree on their fields. The column list
/// must cover every field of every row, so each new name is appended the first
/// time any row mentions it.
///
/// # Example
///
/// ```
/// use querygate_core::{ColumnSet, Row};
/// use serde_json::json;
///
/// let rows: Vec<Row> = vec![
///     json!({"a": 1, "b": 2}).as_object().unwrap().clone(),
///     json!({"a": 3, "c": 4}).as_object().unwrap().clone(),
/// ];
/// assert_eq!(ColumnSet::from_rows(&rows).into_names(), vec!["a", "b", "c"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    names: Vec<String>,
    seen: FxHashSet<String>,
}

impl ColumnSet {
    /// Create an empty column set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the column union of a slice of rows.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut set = Self::new();
        for row in rows {
            set.observe(row);
        }
        set
    }

    /// Record a single column name; duplicates are ignored.
    pub fn push(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    /// Record every field name of `row`.
    pub fn observe(&mut self, row: &Row) {
        for name in row.keys() {
            self.push(name);
        }
    }

    /// Number of distinct columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no column has been recorded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Consume the set, yielding the names in first-seen order.
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

impl<'a> FromIterator<&'a str> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.push(name);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: JsonValue) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_union_keeps_first_seen_order() {
        let rows = vec![
            row(json!({"name": "a", "age": 1})),
            row(json!({"age": 2, "email": "x@y"})),
            row(json!({"zip": "1", "name": "b"})),
        ];
        let names = ColumnSet::from_rows(&rows).into_names();
        assert_eq!(names, vec!["name", "age", "email", "zip"]);
    }

    #[test]
    fn test_late_field_is_not_truncated() {
        let mut rows: Vec<Row> = (0..50).map(|i| row(json!({"i": i}))).collect();
        rows.push(row(json!({"i": 50, "late": true})));
        let names = ColumnSet::from_rows(&rows).into_names();
        assert_eq!(names, vec!["i", "late"]);
    }

    #[test]
    fn test_empty_rows() {
        let set = ColumnSet::from_rows(&[]);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_from_iter_dedups() {
        let set: ColumnSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.into_names(), vec!["a", "b"]);
    }
}
