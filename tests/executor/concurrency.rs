//! Shared-executor tests: one Executor used from many threads.

use std::sync::Arc;
use std::thread;

use crate::common::*;
use querygate::Request;

#[test]
fn concurrent_key_value_writers() {
    let executor = Arc::new(create_executor());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                for i in 0..50 {
                    executor
                        .execute(&Request::keyvalue(format!("SADD members m{t}_{i}")))
                        .unwrap();
                    executor
                        .execute(&Request::keyvalue(format!("RPUSH log {t}")))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(kv(&executor, "SMEMBERS members").row_count, 400);
    assert_eq!(kv(&executor, "LRANGE log 0 -1").row_count, 400);
}

#[test]
fn concurrent_sql_and_documents() {
    let executor = Arc::new(create_executor());
    sql(&executor, "CREATE TABLE hits (n INTEGER)");
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                for i in 0..25 {
                    executor
                        .execute(&Request::relational(format!("INSERT INTO hits VALUES ({i})")))
                        .unwrap();
                    executor
                        .execute(&Request::document(format!(
                            r#"{{"collection": "events", "operation": "insert", "document": {{"t": {t}, "i": {i}}}}}"#
                        )))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(sql(&executor, "SELECT n FROM hits").row_count, 100);
    let count = doc(&executor, r#"{"collection": "events", "operation": "count"}"#);
    assert_eq!(count.rows[0]["count"], 100);
}
