//! MemoryDocumentStore: embedded document backend
//!
//! ## Design
//!
//! Collections are ordered vectors of documents behind a single
//! `RwLock`. Reads (`find`, `count`) share the lock; writes take it
//! exclusively for the whole multi-document operation, so an `update_many`
//! or `delete_many` is atomic with respect to other callers.
//!
//! Collections are created implicitly on first insert. Querying a collection
//! that does not exist behaves like querying an empty one.
//!
//! ## Identity
//!
//! Every stored document has an `_id` as its first field. Inserts without one
//! get a generated UUID; inserting a duplicate `_id` is rejected.

pub mod filter;
pub mod projection;
pub mod update;

use std::collections::HashMap;

use parking_lot::RwLock;
use querygate_core::{JsonValue, Row};
use tracing::debug;

use crate::traits::{DocumentClient, FindQuery};
use crate::{EngineError, EngineResult};

pub use filter::Predicate;
pub use projection::Projection;
pub use update::Update;

/// In-process [`DocumentClient`].
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the collections that currently hold documents.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

fn with_id(mut doc: Row) -> Row {
    if doc.contains_key("_id") {
        if doc.keys().next().map(String::as_str) == Some("_id") {
            return doc;
        }
        let id = doc.shift_remove("_id").unwrap_or(JsonValue::Null);
        let mut ordered = Row::new();
        ordered.insert("_id".to_string(), id);
        ordered.extend(doc);
        return ordered;
    }
    let mut ordered = Row::new();
    ordered.insert(
        "_id".to_string(),
        JsonValue::String(uuid::Uuid::new_v4().simple().to_string()),
    );
    ordered.extend(doc);
    ordered
}

impl DocumentClient for MemoryDocumentStore {
    fn find(&self, collection: &str, query: &FindQuery) -> EngineResult<Vec<Row>> {
        let predicate = Predicate::parse(query.filter.as_deref())?;
        let projection = Projection::parse(query.projection.as_deref())?;
        let skip = query.skip.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        let collections = self.collections.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let found: Vec<Row> = docs
            .iter()
            .filter(|doc| predicate.matches(doc))
            .skip(skip)
            .take(limit)
            .map(|doc| match &projection {
                Some(p) => p.apply(doc),
                None => doc.clone(),
            })
            .collect();
        debug!(target: "querygate::engine", collection, found = found.len(), "find");
        Ok(found)
    }

    fn count(&self, collection: &str, filter: Option<&str>) -> EngineResult<u64> {
        let predicate = Predicate::parse(filter)?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| predicate.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    fn insert_one(&self, collection: &str, document: &str) -> EngineResult<()> {
        let doc = with_id(filter::parse_object("document", document)?);
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if let Some(id) = doc.get("_id") {
            if docs
                .iter()
                .any(|existing| existing.get("_id").is_some_and(|e| filter::values_equal(e, id)))
            {
                return Err(EngineError::unsupported(format!(
                    "duplicate key error: collection {collection} already has _id {id}"
                )));
            }
        }
        docs.push(doc);
        Ok(())
    }

    fn update_many(&self, collection: &str, filter: &str, update: &str) -> EngineResult<u64> {
        let predicate = Predicate::parse(Some(filter))?;
        let update = Update::parse(update)?;

        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        // Stage changes so a failing document leaves the collection untouched
        let mut staged = Vec::new();
        for (idx, doc) in docs.iter().enumerate() {
            if predicate.matches(doc) {
                let mut next = doc.clone();
                if update.apply(&mut next)? {
                    staged.push((idx, next));
                }
            }
        }
        let modified = staged.len() as u64;
        for (idx, next) in staged {
            docs[idx] = next;
        }
        Ok(modified)
    }

    fn delete_many(&self, collection: &str, filter: &str) -> EngineResult<u64> {
        let predicate = Predicate::parse(Some(filter))?;
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !predicate.matches(doc));
        Ok((before - docs.len()) as u64)
    }

    fn ping(&self) -> EngineResult<()> {
        Ok(())
    }
}
