//! Relational adapter.
//!
//! The statement is classified by its leading keyword. `SELECT` runs as a
//! query and returns rows keyed by column label; everything else runs as a
//! single statement and reports the backend's mutation count.

use std::time::Duration;

use querygate_engine::{RelationalClient, TabularRows};
use tracing::debug;

use crate::normalize::StatementKind;
use crate::{Error, QueryResult, Result};

/// Execute one SQL statement.
pub fn execute(
    client: &dyn RelationalClient,
    sql: &str,
    timeout: Option<Duration>,
) -> Result<QueryResult> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(Error::invalid("SQL statement must not be blank"));
    }

    let kind = StatementKind::classify(sql);
    debug!(target: "querygate::executor", kind = kind.as_str(), ?timeout, "relational statement");

    if kind.is_read() {
        let TabularRows { columns, rows } = client.query(sql, timeout)?;
        Ok(QueryResult::read_with_columns(kind.as_str(), columns, rows))
    } else {
        let affected = client.execute(sql, timeout)?;
        Ok(QueryResult::write(kind.as_str(), affected))
    }
}
