//! Command normalization.
//!
//! Each backend accepts a different command surface. The normalizers turn raw
//! command text into a typed operation before any backend is touched, so every
//! input problem is reported as [`Error::InvalidArgument`](crate::Error).
//!
//! | Module | Surface | Output |
//! |--------|---------|--------|
//! | `sql` | SQL text | [`StatementKind`] |
//! | `document` | JSON command object | [`DocumentCommand`] |
//! | `kv` | native tokens or JSON object | [`KvOperation`] |

pub mod document;
pub mod kv;
pub mod sql;

pub use document::{DocumentCommand, DocumentOperation};
pub use kv::{KvAction, KvCommand, KvOperation, KvParams};
pub use sql::StatementKind;
