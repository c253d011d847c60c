//! Command Dispatch Tests
//!
//! Tests that the Executor routes each backend type to its adapter and
//! returns the expected operation kinds.

use crate::common::*;
use querygate::{BackendType, Error, Request};

#[test]
fn each_backend_type_reaches_its_adapter() {
    let executor = create_executor();

    let rel = executor.execute(&Request::new("SELECT 1 AS one")).unwrap();
    assert_eq!(rel.operation_kind, "SELECT");

    let document = executor
        .execute(&Request::new(r#"{"collection": "c", "operation": "count"}"#).with_backend("MongoDB"))
        .unwrap();
    assert_eq!(document.operation_kind, "DOCUMENT_COUNT");

    let keyvalue = executor
        .execute(&Request::new("EXISTS k").with_backend("redis"))
        .unwrap();
    assert_eq!(keyvalue.operation_kind, "KV_EXISTS");
}

#[test]
fn unknown_backend_type_is_rejected() {
    let executor = create_executor();
    let err = executor
        .execute(&Request::new("SELECT 1").with_backend("oracle"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { ref reason } if reason.contains("oracle")));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn backend_type_display_round_trips() {
    for backend in BackendType::ALL {
        assert_eq!(backend.to_string().parse::<BackendType>().unwrap(), backend);
    }
}

#[test]
fn sql_kinds_follow_leading_keyword() {
    let executor = create_executor();
    let cases = [
        ("CREATE TABLE t (id INTEGER, v TEXT)", "CREATE"),
        ("insert into t values (1, 'a')", "INSERT"),
        ("UPDATE t SET v = 'b'", "UPDATE"),
        ("ALTER TABLE t ADD COLUMN w TEXT", "ALTER"),
        ("DELETE FROM t", "DELETE"),
        ("DROP TABLE t", "DROP"),
        ("PRAGMA user_version = 3", "OTHER"),
    ];
    for (command, kind) in cases {
        assert_eq!(sql(&executor, command).operation_kind, kind, "{command}");
    }
}
