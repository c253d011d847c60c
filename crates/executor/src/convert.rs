//! Error conversion from backend error types.
//!
//! Every [`EngineError`] is a failure of a well-formed operation, so all of
//! them become [`Error::ExecutionFailed`] carrying the backend's message.

use querygate_engine::EngineError;

use crate::Error;

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Error::ExecutionFailed {
            reason: err.to_string(),
        }
    }
}
