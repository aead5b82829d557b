//! Error types for the activity model

/// Errors raised while building or decoding model values
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Network namespace was empty
    #[error("network must not be empty")]
    EmptyNetwork,

    /// Identifier was empty
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },

    /// Document did not decode into the expected shape
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    /// Record encoded to something other than a field map
    #[error("record did not encode to an object")]
    NotAnObject,
}
