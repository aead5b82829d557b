//! Error types for mention resolution

use activity_store::StoreError;

/// Mention resolution errors
#[derive(Debug, thiserror::Error)]
pub enum MentionError {
    /// Underlying store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// User document is missing a usable id
    #[error("invalid user document for '{username}': {reason}")]
    InvalidUser { username: String, reason: String },

    /// Directory-specific failure
    #[error("directory error: {0}")]
    Directory(String),
}

impl MentionError {
    /// Check if retrying the lookup may help
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Directory(_) => true,
            Self::InvalidUser { .. } => false,
        }
    }
}
