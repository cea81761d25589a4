//! In-process document store.
//!
//! Collections are `BTreeMap<id, body>` so enumeration order is stable
//! across runs, which keeps query results and batch effects deterministic
//! in tests.  A batch commit validates every op before applying any of
//! them under a single write lock, giving the same fail-whole atomicity
//! the managed store promises.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::batch::{WriteBatch, WriteOp};
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::filter::Filter;
use crate::store::DocumentStore;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory [`DocumentStore`] used by the server binary and all tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document directly, bypassing batch semantics.  Test setup
    /// and seeding convenience.
    pub async fn insert(&self, collection: &str, id: &str, data: Value) {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }

    /// Number of documents currently in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, data)| filter.matches(data))
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let mut collections = self.collections.write().await;

        // Validate first so a failing op leaves the store untouched.
        for op in batch.ops() {
            if let WriteOp::Update { collection, id, .. } = op {
                let exists = collections
                    .get(collection)
                    .is_some_and(|docs| docs.contains_key(id));
                if !exists {
                    return Err(StoreError::MissingDocument {
                        collection: collection.clone(),
                        id: id.clone(),
                    });
                }
            }
        }

        let ops = batch.len();
        for op in batch.ops() {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    data,
                } => {
                    collections
                        .entry(collection.clone())
                        .or_default()
                        .insert(id.clone(), data.clone());
                }
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    // Presence was validated above.
                    if let Some(Value::Object(body)) = collections
                        .get_mut(collection)
                        .and_then(|docs| docs.get_mut(id))
                    {
                        for (key, value) in fields {
                            body.insert(key.clone(), value.clone());
                        }
                    }
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(collection) {
                        docs.remove(id);
                    }
                }
            }
        }

        debug!(ops, "Committed batch");
        Ok(())
    }
}
