//! Response envelope for the HTTP surface
//!
//! Every response body has the same shape:
//! - Success: `{code: 200, message, data, success: true}`
//! - Failure: `{code: 400|500, message, data: null, success: false}`
//!
//! The HTTP status mirrors `code`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use querygate_executor::Error;
use serde::{Deserialize, Serialize};

/// Wire envelope around every HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status code, also used as the HTTP status
    pub code: u16,
    /// Human-readable outcome
    pub message: String,
    /// Payload (success only)
    pub data: Option<T>,
    /// `code == 200`
    pub success: bool,
}

impl<T> Envelope<T> {
    /// A 200 envelope carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Envelope {
            code: 200,
            message: message.into(),
            data: Some(data),
            success: true,
        }
    }

    /// A failure envelope with no payload.
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Envelope {
            code,
            message: message.into(),
            data: None,
            success: false,
        }
    }

    /// Map an executor error to 400 or 500.
    pub fn from_error(err: &Error) -> Self {
        Self::error(err.status_code(), err.to_string())
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
