//! Document adapter tests against the embedded document store.

use serde_json::json;

use crate::handlers::document::AGGREGATE_NOTICE;
use crate::{Error, Executor, QueryResult, Request};

fn run(executor: &Executor, command: &str) -> crate::Result<QueryResult> {
    executor.execute(&Request::document(command))
}

fn seeded() -> Executor {
    let executor = Executor::embedded().unwrap();
    for doc in [
        r#"{"collection": "items", "operation": "insert", "document": {"_id": 1, "a": 1, "b": 2}}"#,
        r#"{"collection": "items", "operation": "insert", "document": "{\"_id\": 2, \"a\": 3, \"c\": 4}"}"#,
    ] {
        run(&executor, doc).unwrap();
    }
    executor
}

#[test]
fn test_find_columns_are_union_in_first_seen_order() {
    let executor = seeded();
    let result = run(&executor, r#"{"collection": "items", "fields": {"_id": 0}}"#).unwrap();
    assert_eq!(result.operation_kind, "DOCUMENT_FIND");
    assert_eq!(result.row_count, 2);
    assert_eq!(result.column_names, vec!["a", "b", "c"]);
    assert_eq!(
        serde_json::to_value(&result.rows).unwrap(),
        json!([{"a": 1, "b": 2}, {"a": 3, "c": 4}])
    );
}

#[test]
fn test_find_filter_limit_skip() {
    let executor = seeded();
    let result = run(
        &executor,
        r#"{"collection": "items", "operation": "FIND", "query": {"a": {"$gte": 1}}, "skip": 1, "limit": "1"}"#,
    )
    .unwrap();
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0]["_id"], json!(2));

    // Non-positive limit and skip are ignored
    let result = run(&executor, r#"{"collection": "items", "limit": 0, "skip": -3}"#).unwrap();
    assert_eq!(result.row_count, 2);
}

#[test]
fn test_count() {
    let executor = seeded();
    let result = run(&executor, r#"{"collection": "items", "operation": "count", "query": {"a": 3}}"#).unwrap();
    assert_eq!(result.operation_kind, "DOCUMENT_COUNT");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.column_names, vec!["count"]);
    assert_eq!(result.rows[0]["count"], json!(1));
}

#[test]
fn test_writes_report_counts_without_rows() {
    let executor = seeded();
    let update = run(
        &executor,
        r#"{"collection": "items", "operation": "update", "query": {}, "update": {"$inc": {"a": 10}}}"#,
    )
    .unwrap();
    assert_eq!(update.operation_kind, "DOCUMENT_UPDATE");
    assert_eq!(update.row_count, 2);
    assert!(update.rows.is_empty() && update.column_names.is_empty());

    let delete = run(
        &executor,
        r#"{"collection": "items", "operation": "delete", "query": {"a": {"$gt": 12}}}"#,
    )
    .unwrap();
    assert_eq!(delete.operation_kind, "DOCUMENT_DELETE");
    assert_eq!(delete.row_count, 1);

    let insert = run(
        &executor,
        r#"{"collection": "items", "operation": "insert", "document": {"z": true}}"#,
    )
    .unwrap();
    assert_eq!(insert.operation_kind, "DOCUMENT_INSERT");
    assert_eq!(insert.row_count, 1);
    assert!(insert.rows.is_empty());
}

#[test]
fn test_aggregate_is_a_stub() {
    let executor = seeded();
    let result = run(
        &executor,
        r#"{"collection": "items", "operation": "aggregate", "pipeline": [{"$match": {}}]}"#,
    )
    .unwrap();
    assert_eq!(result.operation_kind, "DOCUMENT_AGGREGATE");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0]["message"], json!(AGGREGATE_NOTICE));
}

#[test]
fn test_invalid_commands_are_client_errors() {
    let executor = seeded();
    for command in [
        "{oops",
        r#"{"operation": "find"}"#,
        r#"{"collection": "items", "operation": "drop"}"#,
        r#"{"collection": "items", "operation": "insert"}"#,
        r#"{"collection": "items", "operation": "update", "update": {"a": 1}}"#,
    ] {
        let err = run(&executor, command).unwrap_err();
        assert!(err.is_client_error(), "{command}: {err:?}");
    }
}

#[test]
fn test_bad_query_text_is_an_execution_failure() {
    let executor = seeded();
    let err = run(&executor, r#"{"collection": "items", "query": "{broken"}"#).unwrap_err();
    assert!(matches!(err, Error::ExecutionFailed { .. }), "{err:?}");

    let err = run(
        &executor,
        r#"{"collection": "items", "operation": "insert", "document": {"_id": 1}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::ExecutionFailed { .. }));
}
