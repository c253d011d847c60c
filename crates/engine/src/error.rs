//! Error types for backend operations
//!
//! Backends never see malformed gateway input: normalization happens in the
//! executor. Everything reported here is a backend-side failure on an
//! otherwise well-formed operation, and the executor surfaces it as an
//! execution failure carrying this error's message.

use thiserror::Error;

/// Result type alias for backend operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Backend failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The relational backend rejected or failed a statement.
    #[error("{message}")]
    Sql {
        /// Message reported by the SQL engine.
        message: String,
    },

    /// A statement ran past its per-statement deadline and was interrupted.
    #[error("statement exceeded timeout of {seconds}s")]
    Timeout {
        /// Timeout that was applied, in seconds.
        seconds: u64,
    },

    /// Query-language text (filter, projection, update, document) was rejected.
    #[error("invalid {what}: {reason}")]
    InvalidQuery {
        /// Which piece of text was rejected ("filter", "update", ...).
        what: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A key-value operation targeted a key holding another data type.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// A stored value could not be interpreted as required (e.g. `$inc` on text).
    #[error("{reason}")]
    Unsupported {
        /// Description of the rejected operation.
        reason: String,
    },
}

impl EngineError {
    /// Build an [`EngineError::InvalidQuery`].
    pub fn invalid_query(what: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidQuery {
            what,
            reason: reason.into(),
        }
    }

    /// Build an [`EngineError::Unsupported`].
    pub fn unsupported(reason: impl Into<String>) -> Self {
        EngineError::Unsupported {
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Sql {
            message: err.to_string(),
        }
    }
}
