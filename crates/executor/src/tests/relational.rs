//! Relational adapter tests against the embedded SQLite client.

use std::sync::Arc;

use querygate_engine::SqliteClient;
use serde_json::json;

use crate::{Error, Executor, Request};

fn executor_with_people() -> Executor {
    let sqlite = SqliteClient::in_memory().unwrap();
    sqlite
        .run_script(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, score REAL);
             INSERT INTO people VALUES (1, 'ada', 9.5), (2, 'bob', NULL);",
        )
        .unwrap();
    Executor::default().with_relational(Arc::new(sqlite))
}

#[test]
fn test_select_rows_follow_labels() {
    let executor = executor_with_people();
    let result = executor
        .execute(&Request::relational("select id, name AS who, score FROM people ORDER BY id"))
        .unwrap();
    assert_eq!(result.operation_kind, "SELECT");
    assert_eq!(result.row_count, 2);
    assert_eq!(result.rows.len() as u64, result.row_count);
    assert_eq!(result.column_names, vec!["id", "who", "score"]);
    assert_eq!(
        serde_json::to_value(&result.rows).unwrap(),
        json!([
            {"id": 1, "who": "ada", "score": 9.5},
            {"id": 2, "who": "bob", "score": null}
        ])
    );
    let keys: Vec<&String> = result.rows[0].keys().collect();
    assert_eq!(keys, vec!["id", "who", "score"]);
}

#[test]
fn test_empty_select_keeps_labels() {
    let executor = executor_with_people();
    let result = executor
        .execute(&Request::relational("SELECT id, name FROM people WHERE id > 100"))
        .unwrap();
    assert_eq!(result.row_count, 0);
    assert!(result.rows.is_empty());
    assert_eq!(result.column_names, vec!["id", "name"]);
}

#[test]
fn test_writes_report_counts_without_rows() {
    let executor = executor_with_people();
    let insert = executor
        .execute(&Request::relational("INSERT INTO people (name) VALUES ('c'), ('d')"))
        .unwrap();
    assert_eq!(insert.operation_kind, "INSERT");
    assert_eq!(insert.row_count, 2);
    assert!(insert.rows.is_empty());
    assert!(insert.column_names.is_empty());

    let update = executor
        .execute(&Request::relational("UPDATE people SET score = 1"))
        .unwrap();
    assert_eq!(update.row_count, 4);

    let create = executor
        .execute(&Request::relational("create table other (x int)"))
        .unwrap();
    assert_eq!(create.operation_kind, "CREATE");
    assert_eq!(create.row_count, 0);
}

#[test]
fn test_backend_errors_are_execution_failures() {
    let executor = executor_with_people();
    let err = executor
        .execute(&Request::relational("SELECT * FROM missing_table"))
        .unwrap_err();
    match err {
        Error::ExecutionFailed { reason } => assert!(reason.contains("missing_table"), "{reason}"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!executor
        .execute(&Request::relational("DROP TABLE nope"))
        .unwrap_err()
        .is_client_error());
}

#[test]
fn test_timeout_interrupts_long_statement() {
    let executor = executor_with_people();
    let runaway = "SELECT (WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) \
                   SELECT count(*) FROM c)";
    let err = executor
        .execute(&Request::relational(runaway).with_timeout(1))
        .unwrap_err();
    assert_eq!(
        err,
        Error::ExecutionFailed {
            reason: "statement exceeded timeout of 1s".into()
        }
    );
}

#[test]
fn test_timeout_beyond_clock_range_runs_without_deadline() {
    let executor = executor_with_people();
    let result = executor
        .execute(&Request::relational("SELECT count(*) AS n FROM people").with_timeout(i64::MAX))
        .unwrap();
    assert_eq!(result.rows[0]["n"], json!(2));
}
