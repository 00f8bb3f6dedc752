//! Error types for the organizations crate

use thiserror::Error;

/// Errors that can occur while resolving accounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Reference is neither a known alias nor a literal account ID
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// Empty account reference
    #[error("empty account reference")]
    EmptyReference,
}

/// Result type for organizations operations
pub type Result<T> = std::result::Result<T, Error>;
