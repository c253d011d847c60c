//! Core types for QueryGate
//!
//! This crate defines the small set of types shared by the backend engine and
//! the executor:
//! - Row: an ordered field-name → value mapping, one per result record
//! - ColumnSet: first-seen-order union of row field names
//! - Value helpers: JSON encodings for bytes and text coercion of JSON scalars

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod row;
pub mod value;

pub use row::{ColumnSet, Row};
pub use value::{bytes_to_json, json_to_text, JsonValue};
