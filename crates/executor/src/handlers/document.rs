//! Document-store adapter.

use querygate_engine::{DocumentClient, FindQuery};
use serde_json::json;
use tracing::debug;

use super::row;
use crate::normalize::{DocumentCommand, DocumentOperation};
use crate::{QueryResult, Result};

/// Informational row returned for `aggregate`.
pub const AGGREGATE_NOTICE: &str = "aggregate pipelines are accepted but not executed";

/// Execute one document command.
pub fn execute(client: &dyn DocumentClient, command: &str) -> Result<QueryResult> {
    let cmd = DocumentCommand::parse(command)?;
    let kind = cmd.kind();
    let collection = cmd.collection.as_str();
    debug!(target: "querygate::executor", collection, operation = cmd.operation.name(), "document command");

    Ok(match cmd.operation {
        DocumentOperation::Find {
            query,
            fields,
            limit,
            skip,
        } => {
            let find = FindQuery {
                filter: query,
                projection: fields,
                limit,
                skip,
            };
            QueryResult::read(kind, client.find(collection, &find)?)
        }
        DocumentOperation::Count { query } => {
            let count = client.count(collection, query.as_deref())?;
            QueryResult::read(kind, vec![row([("count", json!(count))])])
        }
        DocumentOperation::Aggregate { pipeline } => {
            debug!(target: "querygate::executor", collection, pipeline_len = pipeline.len(), "aggregate not executed");
            QueryResult::read(kind, vec![row([("message", json!(AGGREGATE_NOTICE))])])
        }
        DocumentOperation::Insert { document } => {
            client.insert_one(collection, &document)?;
            QueryResult::write(kind, 1)
        }
        DocumentOperation::Update { query, update } => {
            QueryResult::write(kind, client.update_many(collection, &query, &update)?)
        }
        DocumentOperation::Delete { query } => {
            QueryResult::write(kind, client.delete_many(collection, &query)?)
        }
    })
}
