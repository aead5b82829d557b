//! Write batches
//!
//! A [`WriteBatch`] collects sets and deletes that a store applies as one
//! atomic unit.

use crate::store::StoredDocument;
use activity_model::{Document, DocumentId};

/// Single batched operation
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite a document
    Set {
        collection: String,
        id: DocumentId,
        document: Document,
    },
    /// Remove a document (no-op if absent)
    Delete { collection: String, id: DocumentId },
}

impl WriteOp {
    #[inline]
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Set { collection, .. } | Self::Delete { collection, .. } => collection,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        match self {
            Self::Set { id, .. } | Self::Delete { id, .. } => id,
        }
    }
}

/// Ordered set of operations committed atomically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a document write
    pub fn set(&mut self, collection: impl Into<String>, id: DocumentId, document: Document) {
        self.ops.push(WriteOp::Set {
            collection: collection.into(),
            id,
            document,
        });
    }

    /// Queue a document delete
    ///
    /// Deleting the same document twice in one batch is collapsed into one op.
    pub fn delete(&mut self, collection: impl Into<String>, id: DocumentId) {
        let collection = collection.into();
        let duplicate = self.ops.iter().any(|op| {
            matches!(op, WriteOp::Delete { collection: c, id: existing } if *c == collection && *existing == id)
        });
        if !duplicate {
            self.ops.push(WriteOp::Delete { collection, id });
        }
    }

    /// Queue deletes for every snapshot
    pub fn delete_all(&mut self, collection: &str, documents: &[StoredDocument]) {
        for doc in documents {
            self.delete(collection, doc.id.clone());
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of queued writes
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, WriteOp::Set { .. })).count()
    }

    /// Number of queued deletes
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, WriteOp::Delete { .. })).count()
    }

    #[inline]
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    #[inline]
    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Documents written
    pub written: usize,
    /// Documents deleted (only those that existed)
    pub deleted: usize,
}
