//! Server configuration via `querygate.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! gateway on `127.0.0.1:8080` with all three embedded backends enabled.
//! Command-line flags override the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use querygate_engine::{EngineError, MemoryDocumentStore, MemoryKeyValueStore, SqliteClient};
use querygate_executor::Executor;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "querygate.toml";

/// SQLite path that keeps the relational backend in memory.
pub const IN_MEMORY: &str = ":memory:";

/// Configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config file '{path}': {reason}")]
    Io { path: PathBuf, reason: String },

    /// File is not valid TOML or has a mistyped field
    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Parsed but unusable
    #[error("invalid config: {reason}")]
    Invalid { reason: String },

    /// A backend could not be opened
    #[error("backend initialization failed: {0}")]
    Backend(#[from] EngineError),
}

/// Relational backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalConfig {
    /// Attach the backend
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// SQLite database file, or `:memory:`
    #[serde(default = "default_sqlite_path")]
    pub path: String,
    /// SQL file executed once after the database is opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_script: Option<PathBuf>,
}

impl Default for RelationalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_sqlite_path(),
            init_script: None,
        }
    }
}

/// On/off switch for a backend with no further settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendToggle {
    /// Attach the backend
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for BackendToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Gateway configuration loaded from `querygate.toml`.
///
/// # Example
///
/// ```toml
/// host = "0.0.0.0"
/// port = 9000
///
/// [relational]
/// path = "/var/lib/querygate/data.db"
///
/// [keyvalue]
/// enabled = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Relational backend
    #[serde(default)]
    pub relational: RelationalConfig,
    /// Document backend
    #[serde(default)]
    pub document: BackendToggle,
    /// Key-value backend
    #[serde(default)]
    pub keyvalue: BackendToggle,
}

fn default_enabled() -> bool {
    true
}

fn default_sqlite_path() -> String {
    IN_MEMORY.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "querygate=info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
            relational: RelationalConfig::default(),
            document: BackendToggle::default(),
            keyvalue: BackendToggle::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The default config file content, with comments.
    pub fn default_toml() -> &'static str {
        r#"# QueryGate configuration

# Listen address and port
host = "127.0.0.1"
port = 8080

# Log filter used when RUST_LOG is not set
log_filter = "querygate=info"

# Relational backend (SQLite). path = ":memory:" keeps data in memory.
# init_script = "schema.sql" runs once at startup.
[relational]
enabled = true
path = ":memory:"

# In-process document store
[document]
enabled = true

# In-process key-value store
[keyvalue]
enabled = true
"#
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: ServerConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            reason: format!("failed to serialize config: {e}"),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reject settings that cannot produce a working server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "host must not be blank".into(),
            });
        }
        if self.relational.enabled && self.relational.path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "relational.path must not be blank".into(),
            });
        }
        Ok(())
    }

    /// Open every enabled backend and wire them into an executor.
    pub fn build_executor(&self) -> Result<Executor, ConfigError> {
        let mut executor = Executor::default();

        if self.relational.enabled {
            let client = SqliteClient::open(&self.relational.path)?;
            if let Some(script) = &self.relational.init_script {
                let sql = std::fs::read_to_string(script).map_err(|e| ConfigError::Io {
                    path: script.clone(),
                    reason: e.to_string(),
                })?;
                client.run_script(&sql)?;
                info!(target: "querygate::server", script = %script.display(), "Init script applied");
            }
            executor = executor.with_relational(Arc::new(client));
        }
        if self.document.enabled {
            executor = executor.with_document(Arc::new(MemoryDocumentStore::new()));
        }
        if self.keyvalue.enabled {
            executor = executor.with_keyvalue(Arc::new(MemoryKeyValueStore::new()));
        }
        Ok(executor)
    }
}
