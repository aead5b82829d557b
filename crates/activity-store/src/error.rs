//! Error types for document store operations

use activity_model::{DocumentId, ModelError};

/// Document store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Remote store could not be reached or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Batch exceeds the store's per-commit operation limit
    #[error("batch of {len} operations exceeds limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// Document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored document has an unexpected shape
    #[error("invalid document {id}: {reason}")]
    InvalidDocument { id: DocumentId, reason: String },

    /// Model conversion failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Failure injected by a test store
    #[error("injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    /// Check if the operation may succeed when repeated
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Injected(_))
    }
}
