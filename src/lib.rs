//! QueryGate - one command gateway for relational, document and key-value backends
//!
//! A request names a backend type and carries raw command text: a SQL
//! statement, a JSON document-store command, or a key-value command. The
//! gateway normalizes the command, runs it on the matching backend, and
//! returns the same [`QueryResult`] shape whichever backend answered.
//!
//! # Quick Start
//!
//! ```
//! use querygate::{Executor, Request};
//!
//! let executor = Executor::embedded().unwrap();
//!
//! executor.execute(&Request::keyvalue("HSET user:1 name ada")).unwrap();
//! let result = executor.execute(&Request::keyvalue("HGETALL user:1")).unwrap();
//! assert_eq!(result.column_names, vec!["field", "value"]);
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which selects an adapter by
//! [`BackendType`]. Backends are reached only through the client traits, so
//! the embedded SQLite and in-memory stores can be swapped for real clients.

// Re-export the public API from querygate-executor
pub use querygate_executor::*;
