//! Error types for the declarative crate

use thiserror::Error;

/// Errors that can occur while assembling or synthesizing resources
#[derive(Error, Debug)]
pub enum Error {
    /// Construct ID used twice in one stack
    #[error("duplicate construct id: {0}")]
    DuplicateConstruct(String),

    /// Two constructs declare the same real-world resource
    #[error("{id}: physical id {physical_id} already declared by {existing}")]
    DuplicatePhysicalId {
        id: String,
        physical_id: String,
        existing: String,
    },

    /// Two construct paths hashed to the same logical ID
    #[error("logical id collision: {0}")]
    LogicalIdCollision(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template does not have the expected structure
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

/// Result type for declarative operations
pub type Result<T> = std::result::Result<T, Error>;
