//! Backend capability traits
//!
//! Each trait is the complete surface the executor needs from one kind of
//! backend. Implementations must be safe to call concurrently (`Send + Sync`);
//! any pooling or locking is the implementation's business.
//!
//! Query-language inputs are raw text. The trait implementation parses and
//! validates them and reports problems as [`EngineError`](crate::EngineError).

use std::time::Duration;

use querygate_core::Row;

use crate::EngineResult;

/// Rows produced by a relational read, with the statement's column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularRows {
    /// Column labels in statement order (aliases win over raw names).
    pub columns: Vec<String>,
    /// One ordered mapping per record, keyed by column label.
    pub rows: Vec<Row>,
}

/// Relational execute capability.
pub trait RelationalClient: Send + Sync {
    /// Run a row-returning statement.
    ///
    /// `timeout` of `None` leaves the backend default in place.
    fn query(&self, sql: &str, timeout: Option<Duration>) -> EngineResult<TabularRows>;

    /// Run a single non-row-returning statement and report the mutation count.
    fn execute(&self, sql: &str, timeout: Option<Duration>) -> EngineResult<u64>;

    /// Cheap liveness probe.
    fn ping(&self) -> EngineResult<()>;
}

/// Parameters of a document `find`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Filter document text; `None` matches everything.
    pub filter: Option<String>,
    /// Projection document text; `None` returns whole documents.
    pub projection: Option<String>,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Number of matching documents to skip first.
    pub skip: Option<u64>,
}

/// Document-store capability.
pub trait DocumentClient: Send + Sync {
    /// Return matching documents, each with its own field order preserved.
    fn find(&self, collection: &str, query: &FindQuery) -> EngineResult<Vec<Row>>;

    /// Count documents matching `filter` (all documents when `None`).
    fn count(&self, collection: &str, filter: Option<&str>) -> EngineResult<u64>;

    /// Insert one document given as text.
    fn insert_one(&self, collection: &str, document: &str) -> EngineResult<()>;

    /// Apply `update` to every document matching `filter`; returns the modified count.
    fn update_many(&self, collection: &str, filter: &str, update: &str) -> EngineResult<u64>;

    /// Remove every document matching `filter`; returns the deleted count.
    fn delete_many(&self, collection: &str, filter: &str) -> EngineResult<u64>;

    /// Cheap liveness probe.
    fn ping(&self) -> EngineResult<()>;
}

/// Key-value capability: string, hash, list and set primitives with expiry.
///
/// TTL sentinels follow the usual cache convention: `-1` for a key without an
/// expiry, `-2` for a missing key.
pub trait KeyValueClient: Send + Sync {
    /// Get a string value.
    fn get(&self, key: &str) -> EngineResult<Option<String>>;

    /// Set a string value, replacing any previous value and expiry.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> EngineResult<()>;

    /// Delete keys; returns how many existed.
    fn delete(&self, keys: &[String]) -> EngineResult<u64>;

    /// Whether the key exists.
    fn exists(&self, key: &str) -> EngineResult<bool>;

    /// Keys matching a glob pattern (`*`, `?`, `[...]`, `\` escapes).
    fn keys(&self, pattern: &str) -> EngineResult<Vec<String>>;

    /// Get one hash field.
    fn hget(&self, key: &str, field: &str) -> EngineResult<Option<String>>;

    /// Set one hash field; returns `true` if the field was new.
    fn hset(&self, key: &str, field: &str, value: &str) -> EngineResult<bool>;

    /// All hash field/value pairs.
    fn hgetall(&self, key: &str) -> EngineResult<Vec<(String, String)>>;

    /// List elements between `start` and `end` inclusive; negative indices count from the tail.
    fn lrange(&self, key: &str, start: i64, end: i64) -> EngineResult<Vec<String>>;

    /// Push values onto the head of a list, one at a time; returns the new length.
    fn lpush(&self, key: &str, values: &[String]) -> EngineResult<u64>;

    /// Append values to the tail of a list; returns the new length.
    fn rpush(&self, key: &str, values: &[String]) -> EngineResult<u64>;

    /// All set members.
    fn smembers(&self, key: &str) -> EngineResult<Vec<String>>;

    /// Add members to a set; returns how many were not already present.
    fn sadd(&self, key: &str, members: &[String]) -> EngineResult<u64>;

    /// Remaining time to live in whole seconds, or a `-1`/`-2` sentinel.
    fn ttl(&self, key: &str) -> EngineResult<i64>;

    /// Set a key's time to live; returns `false` if the key does not exist.
    fn expire(&self, key: &str, seconds: i64) -> EngineResult<bool>;

    /// Cheap liveness probe.
    fn ping(&self) -> EngineResult<()>;
}
