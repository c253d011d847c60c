//! Common test utilities for executor tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use querygate::{Executor, QueryResult, Request, SqliteClient};
use querygate_engine::{MemoryDocumentStore, MemoryKeyValueStore};

/// Create an executor over the embedded backends
pub fn create_executor() -> Executor {
    Executor::embedded().unwrap()
}

/// Create an executor whose relational backend is a SQLite file at `path`
pub fn create_file_executor(path: &Path) -> Executor {
    Executor::default()
        .with_relational(Arc::new(SqliteClient::open(path).unwrap()))
        .with_document(Arc::new(MemoryDocumentStore::new()))
        .with_keyvalue(Arc::new(MemoryKeyValueStore::new()))
}

/// Run a SQL statement and unwrap the result
pub fn sql(executor: &Executor, command: &str) -> QueryResult {
    executor.execute(&Request::relational(command)).unwrap()
}

/// Run a document command and unwrap the result
pub fn doc(executor: &Executor, command: &str) -> QueryResult {
    executor.execute(&Request::document(command)).unwrap()
}

/// Run a key-value command and unwrap the result
pub fn kv(executor: &Executor, command: &str) -> QueryResult {
    executor.execute(&Request::keyvalue(command)).unwrap()
}

/// Assert the shape every result must have
pub fn assert_well_formed(result: &QueryResult) {
    if result.rows.is_empty() {
        return;
    }
    assert_eq!(result.rows.len() as u64, result.row_count, "{result:?}");
    for row in &result.rows {
        for key in row.keys() {
            assert!(result.column_names.contains(key), "column {key} missing in {result:?}");
        }
    }
    let mut seen = std::collections::HashSet::new();
    assert!(
        result.column_names.iter().all(|c| seen.insert(c)),
        "duplicate columns in {result:?}"
    );
}
