//! HTTP surface for QueryGate
//!
//! - [`ServerConfig`]: `querygate.toml` settings and backend wiring
//! - [`Envelope`]: the `{code, message, data, success}` response body
//! - [`router`] / [`run`]: axum routes over a shared [`Executor`]
//!
//! [`Executor`]: querygate_executor::Executor

#![warn(missing_docs)]

pub mod config;
pub mod envelope;
pub mod server;

pub use config::{BackendToggle, ConfigError, RelationalConfig, ServerConfig, CONFIG_FILE_NAME};
pub use envelope::Envelope;
pub use server::{router, run, warm_up, HEALTH_MESSAGE};
