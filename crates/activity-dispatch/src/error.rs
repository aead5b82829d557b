//! Error types for activity dispatch
//!
//! Provides error handling for:
//! - Invalid request parameters
//! - Store reads and batch commits
//! - Mention resolution
//! - Configuration loading

use activity_mentions::MentionError;
use activity_model::ModelError;
use activity_store::StoreError;
use std::path::PathBuf;

/// Error for a single dispatch branch
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Required identifier or namespace missing
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Store read or commit failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Mention lookup failed
    #[error("mention resolution failed: {0}")]
    Mentions(#[from] MentionError),

    /// Record could not be encoded
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Branch would exceed the batch operation limit
    #[error("batch of {len} operations exceeds limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DispatchError {
    /// Check if the branch may succeed when repeated
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Mentions(e) => e.is_transient(),
            Self::InvalidParams(_) | Self::Model(_) | Self::BatchTooLarge { .. } | Self::Config(_) => false,
        }
    }

    /// Create invalid-params error
    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("invalid toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered
    #[error("cannot render toml: {0}")]
    Render(#[from] toml::ser::Error),

    /// Parsed but out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
