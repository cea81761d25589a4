use async_trait::async_trait;

use crate::batch::WriteBatch;
use crate::document::Document;
use crate::error::Result;
use crate::filter::Filter;

/// The document-store capability.
///
/// Handlers and jobs take this as `Arc<dyn DocumentStore>` so tests can
/// substitute [`crate::MemoryStore`] (or any fake) without touching the
/// logic under test.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document by id.  `Ok(None)` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// All documents in a collection matching the filter, in a
    /// deterministic (id) order.
    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    /// Commit a batch atomically: either every op applies or none do.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}
