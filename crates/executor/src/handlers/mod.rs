//! Backend adapters.
//!
//! Each submodule executes normalized commands against one backend client
//! and fills a [`QueryResult`](crate::QueryResult):
//!
//! | Module | Client | Input |
//! |--------|--------|-------|
//! | `relational` | `RelationalClient` | SQL text |
//! | `document` | `DocumentClient` | JSON command object |
//! | `keyvalue` | `KeyValueClient` | native or JSON key-value command |
//!
//! Adapters never see a missing client: the executor reports
//! `BackendUnavailable` before calling them.

pub mod document;
pub mod keyvalue;
pub mod relational;

use querygate_core::{JsonValue, Row};

/// Build a result row from ordered field/value pairs.
pub(crate) fn row<const N: usize>(fields: [(&str, JsonValue); N]) -> Row {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
