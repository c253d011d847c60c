//! # QueryGate Executor
//!
//! Dispatch and normalization for QueryGate: one request shape in, one result
//! shape out, whatever the backend.
//!
//! This crate provides:
//! - [`Request`] - declared backend type, raw command text, timeout
//! - [`QueryResult`] - the uniform result every backend fills
//! - [`Executor`] - selects the backend adapter and runs single requests or batches
//!
//! ## Quick Start
//!
//! ```text
//! use querygate_executor::{Executor, Request};
//!
//! let executor = Executor::embedded()?;
//!
//! executor.execute(&Request::relational("CREATE TABLE t (id INTEGER)"))?;
//! executor.execute(&Request::document(r#"{"collection": "users", "operation": "count"}"#))?;
//! executor.execute(&Request::keyvalue("SET user:1 alice EX 60"))?;
//! ```
//!
//! ## Command Surfaces
//!
//! | Backend | Command text | Operation kinds |
//! |---------|--------------|-----------------|
//! | **relational** | SQL statement | `SELECT`, `INSERT`, ..., `OTHER` |
//! | **document** | JSON object with `collection` and `operation` | `DOCUMENT_FIND`, `DOCUMENT_COUNT`, ... |
//! | **keyvalue** | `GET key` or `{"command": "GET", "key": "..."}` | `KV_GET`, `KV_SET`, ... |

#![warn(missing_docs)]

mod command;
mod convert;
mod error;
mod executor;
mod output;

pub mod handlers;
pub mod normalize;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::{BackendType, Request, DEFAULT_TIMEOUT_SECONDS};
pub use error::Error;
pub use executor::Executor;
pub use output::{QueryResult, ERROR_KIND};

// Re-export backend types so users don't need querygate-engine directly
pub use querygate_core::{JsonValue, Row};
pub use querygate_engine::{
    DocumentClient, EngineError, KeyValueClient, MemoryDocumentStore, MemoryKeyValueStore,
    RelationalClient, SqliteClient,
};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
