//! The uniform result shape.
//!
//! Every adapter fills a [`QueryResult`]; the executor stamps it with the
//! elapsed time and the original command text before returning it.

use querygate_core::{ColumnSet, Row};
use serde::{Deserialize, Serialize};

/// Operation kind reported by batch error markers.
pub const ERROR_KIND: &str = "ERROR";

/// Normalized result of one command, whatever the backend.
///
/// For reads `rows.len() == row_count`; for writes `rows` and `column_names`
/// are empty and `row_count` is the number of items mutated or created.
/// `column_names` is the union of every row's field names in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Backend-specific tag such as `SELECT`, `DOCUMENT_FIND`, `KV_GET`.
    pub operation_kind: String,
    /// Rows returned (reads) or items affected (writes).
    #[serde(rename = "affectedOrReturnedRowCount")]
    pub row_count: u64,
    /// Result rows, each an ordered field mapping.
    pub rows: Vec<Row>,
    /// Deduplicated field names in first-seen order.
    pub column_names: Vec<String>,
    /// Wall-clock time spent in the adapter.
    pub elapsed_millis: u64,
    /// The command text as submitted.
    pub original_command: String,
    /// Failure description, set only on batch error markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QueryResult {
    /// A read result; columns are derived from the rows.
    pub fn read(kind: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::read_with_columns(kind, Vec::new(), rows)
    }

    /// A read result whose column list starts with `columns` (e.g. statement
    /// labels) and is extended by any field the rows introduce.
    pub fn read_with_columns(kind: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut set: ColumnSet = columns.iter().map(String::as_str).collect();
        for row in &rows {
            set.observe(row);
        }
        Self {
            operation_kind: kind.into(),
            row_count: rows.len() as u64,
            rows,
            column_names: set.into_names(),
            elapsed_millis: 0,
            original_command: String::new(),
            error_message: None,
        }
    }

    /// A write result reporting `count` affected items.
    pub fn write(kind: impl Into<String>, count: u64) -> Self {
        Self {
            operation_kind: kind.into(),
            row_count: count,
            rows: Vec::new(),
            column_names: Vec::new(),
            elapsed_millis: 0,
            original_command: String::new(),
            error_message: None,
        }
    }

    /// The marker that replaces a failed item in a batch.
    pub fn error(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            original_command: command.into(),
            error_message: Some(message.into()),
            ..Self::write(ERROR_KIND, 0)
        }
    }

    /// Whether this is a batch error marker.
    pub fn is_error(&self) -> bool {
        self.operation_kind == ERROR_KIND
    }
}
