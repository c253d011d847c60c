//! Executor Layer Tests
//!
//! Cross-crate tests for the querygate-executor crate which provides:
//! - Request / QueryResult - the uniform request and result shapes
//! - Executor - backend dispatch, single and batch execution
//! - Normalizers for SQL, document and key-value command text

mod common;

mod command_dispatch;
mod concurrency;
mod error_handling;
mod properties;
