//! Result-shape properties that hold across all backends.

use crate::common::*;
use querygate::Request;
use serde_json::json;

#[test]
fn select_rows_match_count_and_columns() {
    let executor = create_executor();
    sql(&executor, "CREATE TABLE t (id INTEGER, name TEXT)");
    sql(&executor, "INSERT INTO t VALUES (1, 'a'), (2, 'b'), (3, NULL)");

    let result = sql(&executor, "SELECT * FROM t");
    assert_eq!(result.row_count, 3);
    assert_well_formed(&result);
    assert_eq!(result.column_names, vec!["id", "name"]);
}

#[test]
fn writes_have_no_rows_or_columns() {
    let executor = create_executor();
    let writes = [
        sql(&executor, "CREATE TABLE w (x INTEGER)"),
        sql(&executor, "INSERT INTO w VALUES (1)"),
        doc(&executor, r#"{"collection": "c", "operation": "insert", "document": {"a": 1}}"#),
        doc(&executor, r#"{"collection": "c", "operation": "update", "query": {}, "update": {"a": 2}}"#),
        doc(&executor, r#"{"collection": "c", "operation": "delete", "query": {"a": 2}}"#),
        kv(&executor, "SET k v"),
        kv(&executor, "HSET h f v"),
        kv(&executor, "RPUSH l a"),
        kv(&executor, "SADD s a"),
        kv(&executor, "EXPIRE k 100"),
        kv(&executor, "DEL k"),
    ];
    for result in writes {
        assert!(result.rows.is_empty(), "{result:?}");
        assert!(result.column_names.is_empty(), "{result:?}");
    }
}

#[test]
fn keys_then_exists() {
    let executor = create_executor();
    kv(&executor, "SET user:1 a");
    kv(&executor, "SET user:22 b");
    let keys = kv(&executor, "KEYS user:*");
    assert_well_formed(&keys);
    assert_eq!(keys.row_count, 2);
    for row in &keys.rows {
        let key = row["key"].as_str().unwrap();
        assert_eq!(kv(&executor, &format!("EXISTS {key}")).rows[0]["exists"], json!(true));
    }
}

#[test]
fn set_get_and_ttl() {
    let executor = create_executor();
    kv(&executor, "SET k v");
    assert_eq!(kv(&executor, "GET k").rows[0]["value"], json!("v"));

    kv(&executor, "SET k v EX 10");
    let ttl = kv(&executor, "TTL k").rows[0]["ttl"].as_i64().unwrap();
    assert!(0 < ttl && ttl <= 10);
}

#[test]
fn native_and_json_get_are_identical() {
    let executor = create_executor();
    kv(&executor, "SET user:1 alice");
    let mut native = kv(&executor, "GET user:1");
    let mut json_form = kv(&executor, r#"{"command":"GET","key":"user:1"}"#);
    for result in [&mut native, &mut json_form] {
        result.elapsed_millis = 0;
        result.original_command.clear();
    }
    assert_eq!(native, json_form);
}

#[test]
fn batch_with_blank_second_item() {
    let executor = create_executor();
    let results = executor
        .execute_batch(&[
            Request::keyvalue("SET a 1"),
            Request::keyvalue(""),
            Request::keyvalue("GET a"),
        ])
        .unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[1].operation_kind, "ERROR");
    assert_eq!(results[2].rows[0]["value"], json!("1"));
}

#[test]
fn lrange_full_list_has_sequential_indices() {
    let executor = create_executor();
    kv(&executor, "RPUSH l a b c d");
    let result = kv(&executor, "LRANGE l 0 -1");
    assert_well_formed(&result);
    let indices: Vec<u64> = result.rows.iter().map(|r| r["index"].as_u64().unwrap()).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn document_columns_union() {
    let executor = create_executor();
    doc(&executor, r#"{"collection": "c", "operation": "insert", "document": {"a": 1, "b": 2}}"#);
    doc(&executor, r#"{"collection": "c", "operation": "insert", "document": {"a": 3, "c": 4}}"#);
    let result = doc(&executor, r#"{"collection": "c", "fields": {"_id": 0}}"#);
    assert_well_formed(&result);
    assert_eq!(result.column_names, vec!["a", "b", "c"]);

    // With ids included the generated _id leads every document
    let result = doc(&executor, r#"{"collection": "c"}"#);
    assert_eq!(result.column_names, vec!["_id", "a", "b", "c"]);
}

#[test]
fn file_backed_sqlite_persists_across_executors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gate.db");
    {
        let executor = create_file_executor(&path);
        sql(&executor, "CREATE TABLE notes (body TEXT)");
        sql(&executor, "INSERT INTO notes VALUES ('kept')");
    }
    let executor = create_file_executor(&path);
    let result = sql(&executor, "SELECT body FROM notes");
    assert_eq!(result.rows[0]["body"], json!("kept"));
}
