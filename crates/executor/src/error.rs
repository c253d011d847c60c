//! Dispatch failures.
//!
//! A request fails in one of three places: its text is rejected before any
//! backend is touched, the backend it names has no client, or the backend
//! itself refuses the operation. [`Error`] has one variant per place, and
//! [`Error::status_code`] is what the HTTP layer reports.

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Variant | Raised when | HTTP |
/// |---------|-------------|------|
/// | `InvalidArgument` | Blank command, bad JSON, missing field, bad integer, unknown command/operation/backend | 400 |
/// | `BackendUnavailable` | The adapter for the requested backend has no client | 500 |
/// | `ExecutionFailed` | The backend rejected or failed a well-formed operation | 500 |
///
/// Invalid arguments are always detected before any backend call.
///
/// # Example
///
/// ```ignore
/// use querygate_executor::{Error, Executor, Request};
///
/// match executor.execute(&Request::keyvalue("GET")) {
///     Ok(result) => { /* handle success */ }
///     Err(Error::InvalidArgument { reason }) => {
///         println!("bad request: {}", reason);
///     }
///     Err(e) => {
///         println!("Error: {}", e);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// Malformed or incomplete input
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Backend not configured
    #[error("{backend} backend is not configured")]
    BackendUnavailable { backend: String },

    /// Backend-side failure
    #[error("execution failed: {reason}")]
    ExecutionFailed { reason: String },
}

impl Error {
    /// Build an [`Error::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// HTTP status code the error maps to.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
