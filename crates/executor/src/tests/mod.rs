//! Test modules for the executor crate.

pub mod document;
pub mod relational;
