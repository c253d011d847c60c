//! Error Handling Tests
//!
//! Error classification and propagation across the executor boundary.

use std::sync::Arc;

use crate::common::*;
use querygate::{Error, Executor, MemoryKeyValueStore, Request};

#[test]
fn validation_errors_are_400() {
    let executor = create_executor();
    let requests = [
        Request::relational(" "),
        Request::document("[]"),
        Request::document(r#"{"collection": "c", "operation": "explode"}"#),
        Request::keyvalue("SET only_key"),
        Request::keyvalue("LRANGE l one two"),
        Request::new("x").with_backend("cassandra"),
    ];
    for request in &requests {
        let err = executor.execute(request).unwrap_err();
        assert_eq!(err.status_code(), 400, "{request:?} -> {err}");
    }
}

#[test]
fn backend_errors_are_500_with_message() {
    let executor = create_executor();
    let err = executor
        .execute(&Request::relational("SELEKT 1"))
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("syntax error"), "{err}");
}

#[test]
fn unconfigured_backends_are_unavailable() {
    let executor = Executor::default().with_keyvalue(Arc::new(MemoryKeyValueStore::new()));
    let err = executor.execute(&Request::relational("SELECT 1")).unwrap_err();
    assert_eq!(
        err,
        Error::BackendUnavailable {
            backend: "relational".into()
        }
    );
    assert_eq!(err.to_string(), "relational backend is not configured");
    assert!(executor.execute(&Request::keyvalue("KEYS")).is_ok());
}

#[test]
fn batch_marks_each_failure_independently() {
    let executor = Executor::default().with_keyvalue(Arc::new(MemoryKeyValueStore::new()));
    let results = executor
        .execute_batch(&[
            Request::relational("SELECT 1"),
            Request::keyvalue("SET a 1"),
            Request::keyvalue("BOGUS"),
        ])
        .unwrap();
    assert!(results[0].is_error());
    assert_eq!(
        results[0].error_message.as_deref(),
        Some("relational backend is not configured")
    );
    assert!(!results[1].is_error());
    assert!(results[2].is_error());
    assert_eq!(results[2].original_command, "BOGUS");
}
