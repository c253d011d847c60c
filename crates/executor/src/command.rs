//! Request types.
//!
//! A [`Request`] is what callers send: a declared backend type, the raw
//! command text, and a timeout. The backend type stays a free-form string
//! until dispatch so that an unknown name can be reported back verbatim.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 30;

/// The closed set of backend kinds a request can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendType {
    /// SQL database.
    #[default]
    Relational,
    /// JSON document store.
    Document,
    /// Key-value cache.
    KeyValue,
}

impl BackendType {
    /// All backend types, in dispatch-table order.
    pub const ALL: [BackendType; 3] = [
        BackendType::Relational,
        BackendType::Document,
        BackendType::KeyValue,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Relational => "relational",
            BackendType::Document => "document",
            BackendType::KeyValue => "keyvalue",
        }
    }

    /// Resolve an optional declared type. Absent or blank means relational.
    pub fn resolve(declared: Option<&str>) -> Result<Self, Error> {
        match declared.map(str::trim) {
            None | Some("") => Ok(BackendType::default()),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for BackendType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relational" | "mysql" | "sql" | "sqlite" => Ok(BackendType::Relational),
            "document" | "mongodb" | "mongo" => Ok(BackendType::Document),
            "keyvalue" | "redis" | "kv" => Ok(BackendType::KeyValue),
            _ => Err(Error::invalid(format!("unsupported backend type: {}", s.trim()))),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_timeout() -> i64 {
    DEFAULT_TIMEOUT_SECONDS
}

// Explicit nulls read the same as absent fields.
fn null_as_blank<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

fn null_as_default_timeout<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(de)?.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
}

/// A single command addressed to one backend.
///
/// JSON uses camelCase field names; `dataSourceType`, `sql` and `timeout` are
/// accepted as aliases. A `null` field means the same as an absent one, so a
/// null command fails later as a blank command.
///
/// ```
/// use querygate_executor::Request;
///
/// let req: Request = serde_json::from_str(r#"{"dataSourceType": "redis", "sql": "GET a"}"#).unwrap();
/// assert_eq!(req.backend_type.as_deref(), Some("redis"));
/// assert_eq!(req.command, "GET a");
/// assert_eq!(req.timeout_seconds, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Declared backend type; `None` or blank selects relational.
    #[serde(default, alias = "dataSourceType", skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,
    /// Raw command text.
    #[serde(default, alias = "sql", deserialize_with = "null_as_blank")]
    pub command: String,
    /// Timeout in seconds; zero or negative leaves the backend default.
    #[serde(
        default = "default_timeout",
        alias = "timeout",
        deserialize_with = "null_as_default_timeout"
    )]
    pub timeout_seconds: i64,
}

impl Request {
    /// A request with no declared backend type (relational).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            backend_type: None,
            command: command.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// A SQL request.
    pub fn relational(command: impl Into<String>) -> Self {
        Self::new(command).with_backend(BackendType::Relational.as_str())
    }

    /// A document-store request.
    pub fn document(command: impl Into<String>) -> Self {
        Self::new(command).with_backend(BackendType::Document.as_str())
    }

    /// A key-value request.
    pub fn keyvalue(command: impl Into<String>) -> Self {
        Self::new(command).with_backend(BackendType::KeyValue.as_str())
    }

    /// Set the declared backend type.
    pub fn with_backend(mut self, backend_type: impl Into<String>) -> Self {
        self.backend_type = Some(backend_type.into());
        self
    }

    /// Set the timeout in seconds.
    pub fn with_timeout(mut self, seconds: i64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Timeout to hand to a backend, or `None` for its default.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds as u64))
    }
}
