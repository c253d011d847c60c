//! Backend engine for QueryGate
//!
//! This crate owns everything that talks to an actual data backend:
//! - Capability traits: RelationalClient, DocumentClient, KeyValueClient
//! - EngineError: the single error type every backend reports
//! - Embedded backends so the gateway runs without external services:
//!   SqliteClient, MemoryDocumentStore, MemoryKeyValueStore
//!
//! The executor only ever sees the traits. Query-language text (SQL, filter
//! documents, update documents) is passed through untouched and validated by
//! the backend that receives it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod keyvalue;
pub mod relational;
pub mod traits;

pub use document::MemoryDocumentStore;
pub use error::{EngineError, EngineResult};
pub use keyvalue::MemoryKeyValueStore;
pub use relational::SqliteClient;
pub use traits::{
    DocumentClient, FindQuery, KeyValueClient, RelationalClient, TabularRows,
};
