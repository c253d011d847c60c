//! JSON value helpers
//!
//! | Input | JSON Representation |
//! |-------|---------------------|
//! | raw bytes | `{"$bytes": "<base64>"}` |
//! | JSON string parameter | the string itself |
//! | JSON object/array parameter | its compact serialization |
//! | number / bool parameter | its display form |

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// JSON value type used for every row cell and command parameter.
pub use serde_json::Value as JsonValue;

/// Encode binary data as `{"$bytes": "<base64>"}`.
pub fn bytes_to_json(bytes: &[u8]) -> JsonValue {
    serde_json::json!({ "$bytes": BASE64.encode(bytes) })
}

/// Read a command parameter as text.
///
/// Callers historically sent nested query documents either inline or as
/// JSON-in-a-string; both are accepted. Scalars are stringified. `null`
/// counts as absent.
pub fn json_to_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => Some(value.to_string()),
    }
}
