//! Embedded relational backend on SQLite
//!
//! A single connection guarded by a mutex. Per-statement timeouts are enforced
//! with SQLite's progress handler: while a statement runs, the handler is polled
//! every few thousand VM instructions and interrupts the statement once the
//! deadline has passed.

use std::path::Path;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use querygate_core::{bytes_to_json, ColumnSet, JsonValue, Row};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode};
use tracing::debug;

use crate::traits::{RelationalClient, TabularRows};
use crate::{EngineError, EngineResult};

/// VM instructions between deadline checks.
const PROGRESS_INTERVAL: i32 = 1_000;

/// SQLite-backed [`RelationalClient`].
pub struct SqliteClient {
    conn: Mutex<Connection>,
}

impl SqliteClient {
    /// Open (or create) a database file. `":memory:"` opens a private in-memory database.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        debug!(target: "querygate::engine", path = ?path, "Opened SQLite database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> EngineResult<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Run a script of `;`-separated statements, e.g. a schema or seed file.
    pub fn run_script(&self, sql: &str) -> EngineResult<()> {
        self.conn.lock().execute_batch(sql)?;
        Ok(())
    }

    fn with_deadline<T>(
        &self,
        timeout: Option<Duration>,
        op: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> EngineResult<T> {
        let conn = self.conn.lock();
        // A limit past the clock's range means no deadline
        let deadline = timeout.and_then(|limit| Instant::now().checked_add(limit));
        if let Some(deadline) = deadline {
            conn.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
        }

        let result = op(&conn);

        if deadline.is_some() {
            conn.progress_handler(0, None::<fn() -> bool>);
        }

        result.map_err(|err| match (err.sqlite_error_code(), timeout) {
            (Some(ErrorCode::OperationInterrupted), Some(limit)) => EngineError::Timeout {
                seconds: limit.as_secs(),
            },
            _ => EngineError::from(err),
        })
    }
}

fn cell_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(text) => JsonValue::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => bytes_to_json(bytes),
    }
}

impl RelationalClient for SqliteClient {
    fn query(&self, sql: &str, timeout: Option<Duration>) -> EngineResult<TabularRows> {
        self.with_deadline(timeout, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let labels: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let mut records = stmt.query([])?;
            let mut rows = Vec::new();
            while let Some(record) = records.next()? {
                let mut row = Row::new();
                for (idx, label) in labels.iter().enumerate() {
                    row.insert(label.clone(), cell_to_json(record.get_ref(idx)?));
                }
                rows.push(row);
            }

            let columns = labels.iter().map(String::as_str).collect::<ColumnSet>();
            Ok(TabularRows {
                columns: columns.into_names(),
                rows,
            })
        })
    }

    fn execute(&self, sql: &str, timeout: Option<Duration>) -> EngineResult<u64> {
        self.with_deadline(timeout, |conn| conn.execute(sql, []).map(|n| n as u64))
    }

    fn ping(&self) -> EngineResult<()> {
        self.conn
            .lock()
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
