//! Document store trait

use crate::batch::{CommitReceipt, WriteBatch};
use crate::error::StoreError;
use crate::query::Query;
use activity_model::{Document, DocumentId};
use async_trait::async_trait;
use std::fmt::Debug;

/// Operation limit of a single batch commit on the managed store
pub const DEFAULT_MAX_BATCH_OPS: usize = 500;

/// Document returned by a query
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Document,
}

/// Collection-oriented document store
///
/// Implementations must apply every operation of a [`WriteBatch`] atomically.
/// Queries carry no transactional guarantee relative to later commits.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Run an equality query
    async fn query(&self, query: &Query) -> Result<Vec<StoredDocument>, StoreError>;

    /// Apply a batch all-or-nothing
    async fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;

    /// Generate an identifier for a new document
    fn generate_id(&self) -> DocumentId {
        DocumentId::generate()
    }

    /// Largest batch this store accepts
    fn max_batch_ops(&self) -> usize {
        DEFAULT_MAX_BATCH_OPS
    }
}
