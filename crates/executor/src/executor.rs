//! The Executor - single entry point to the backends.
//!
//! The Executor is a stateless dispatcher: it holds one optional client per
//! backend type, selects the adapter matching a request's declared type, and
//! stamps the adapter's result with timing and the original command.

use std::sync::Arc;
use std::time::Instant;

use querygate_engine::{
    DocumentClient, EngineResult, KeyValueClient, MemoryDocumentStore, MemoryKeyValueStore,
    RelationalClient, SqliteClient,
};
use tracing::{info, warn};

use crate::handlers;
use crate::{BackendType, Error, QueryResult, Request, Result};

/// The command executor.
///
/// Built once at startup and shared read-only; all mutable state lives in
/// the backend clients.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use querygate_executor::{Executor, Request};
///
/// let executor = Executor::embedded().unwrap();
///
/// // Single command execution
/// let result = executor.execute(&Request::keyvalue("SET greeting hello")).unwrap();
/// assert_eq!(result.row_count, 1);
///
/// // Batch execution
/// let results = executor
///     .execute_batch(&[
///         Request::keyvalue("GET greeting"),
///         Request::keyvalue("   "),
///     ])
///     .unwrap();
/// assert_eq!(results[0].rows[0]["value"], "hello");
/// assert!(results[1].is_error());
/// ```
#[derive(Default, Clone)]
pub struct Executor {
    relational: Option<Arc<dyn RelationalClient>>,
    document: Option<Arc<dyn DocumentClient>>,
    keyvalue: Option<Arc<dyn KeyValueClient>>,
}

impl Executor {
    /// Create an executor from optional clients. A `None` backend reports
    /// [`Error::BackendUnavailable`] when addressed.
    pub fn new(
        relational: Option<Arc<dyn RelationalClient>>,
        document: Option<Arc<dyn DocumentClient>>,
        keyvalue: Option<Arc<dyn KeyValueClient>>,
    ) -> Self {
        Self {
            relational,
            document,
            keyvalue,
        }
    }

    /// An executor over the embedded backends: in-memory SQLite plus the
    /// in-process document and key-value stores.
    pub fn embedded() -> EngineResult<Self> {
        Ok(Self::default()
            .with_relational(Arc::new(SqliteClient::in_memory()?))
            .with_document(Arc::new(MemoryDocumentStore::new()))
            .with_keyvalue(Arc::new(MemoryKeyValueStore::new())))
    }

    /// Attach a relational client.
    pub fn with_relational(mut self, client: Arc<dyn RelationalClient>) -> Self {
        self.relational = Some(client);
        self
    }

    /// Attach a document client.
    pub fn with_document(mut self, client: Arc<dyn DocumentClient>) -> Self {
        self.document = Some(client);
        self
    }

    /// Attach a key-value client.
    pub fn with_keyvalue(mut self, client: Arc<dyn KeyValueClient>) -> Self {
        self.keyvalue = Some(client);
        self
    }

    /// Whether a client is configured for `backend`.
    pub fn is_configured(&self, backend: BackendType) -> bool {
        match backend {
            BackendType::Relational => self.relational.is_some(),
            BackendType::Document => self.document.is_some(),
            BackendType::KeyValue => self.keyvalue.is_some(),
        }
    }

    /// Ping every configured backend, in [`BackendType::ALL`] order.
    pub fn ping(&self) -> Vec<(BackendType, Result<()>)> {
        let mut results = Vec::new();
        if let Some(client) = &self.relational {
            results.push((BackendType::Relational, client.ping().map_err(Error::from)));
        }
        if let Some(client) = &self.document {
            results.push((BackendType::Document, client.ping().map_err(Error::from)));
        }
        if let Some(client) = &self.keyvalue {
            results.push((BackendType::KeyValue, client.ping().map_err(Error::from)));
        }
        results
    }

    fn unavailable(backend: BackendType) -> Error {
        Error::BackendUnavailable {
            backend: backend.as_str().to_string(),
        }
    }

    /// Execute a single request.
    ///
    /// Blank commands and unknown backend types are rejected before any
    /// adapter is reached. Adapter failures propagate unchanged.
    pub fn execute(&self, request: &Request) -> Result<QueryResult> {
        let command = request.command.trim();
        if command.is_empty() {
            return Err(Error::invalid("command must not be blank"));
        }
        let backend = BackendType::resolve(request.backend_type.as_deref())?;

        let started = Instant::now();
        let outcome = match backend {
            BackendType::Relational => {
                let client = self.relational.as_deref().ok_or_else(|| Self::unavailable(backend))?;
                handlers::relational::execute(client, command, request.timeout())
            }
            // Document and key-value backends have no per-command timeout
            BackendType::Document => {
                let client = self.document.as_deref().ok_or_else(|| Self::unavailable(backend))?;
                handlers::document::execute(client, command)
            }
            BackendType::KeyValue => {
                let client = self.keyvalue.as_deref().ok_or_else(|| Self::unavailable(backend))?;
                handlers::keyvalue::execute(client, command)
            }
        };
        let elapsed = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(mut result) => {
                result.elapsed_millis = elapsed;
                result.original_command = command.to_string();
                info!(
                    target: "querygate::executor",
                    backend = backend.as_str(),
                    kind = %result.operation_kind,
                    rows = result.row_count,
                    elapsed_ms = elapsed,
                    "Command executed"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(
                    target: "querygate::executor",
                    backend = backend.as_str(),
                    error = %e,
                    elapsed_ms = elapsed,
                    "Command failed"
                );
                Err(e)
            }
        }
    }

    /// Execute requests in order, returning each outcome.
    ///
    /// Never stops early: a failing request yields an `Err` in its slot and
    /// the remaining requests still run.
    pub fn execute_many(&self, requests: &[Request]) -> Vec<Result<QueryResult>> {
        requests.iter().map(|req| self.execute(req)).collect()
    }

    /// Execute a batch, replacing each failure with an error marker.
    ///
    /// The output has the same length and order as the input. An empty batch
    /// is an [`Error::InvalidArgument`].
    pub fn execute_batch(&self, requests: &[Request]) -> Result<Vec<QueryResult>> {
        if requests.is_empty() {
            return Err(Error::invalid("batch must contain at least one request"));
        }
        let results = self
            .execute_many(requests)
            .into_iter()
            .zip(requests)
            .enumerate()
            .map(|(index, (outcome, request))| match outcome {
                Ok(result) => result,
                Err(e) => {
                    warn!(target: "querygate::executor", index, error = %e, "Batch item failed");
                    QueryResult::error(request.command.trim(), e.to_string())
                }
            })
            .collect();
        Ok(results)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("relational", &self.relational.is_some())
            .field("document", &self.document.is_some())
            .field("keyvalue", &self.keyvalue.is_some())
            .finish()
    }
}
