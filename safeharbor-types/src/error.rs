//! Error types for the allowlist model.

use thiserror::Error;

/// Result type for allowlist model operations.
pub type AllowlistResult<T> = Result<T, AllowlistError>;

/// Errors raised when an allowlist or one of its entries violates an invariant.
#[derive(Debug, Error)]
pub enum AllowlistError {
    /// The allowlist contained no entries.
    #[error("allowlist has no entries")]
    EmptyAllowlist,

    /// The version string is not `major.minor.patch[-suffix]`.
    #[error("invalid allowlist version: {0:?}")]
    InvalidVersion(String),

    /// An entry is missing a required field or carries a malformed domain.
    #[error("invalid entry {id:?}: {reason}")]
    InvalidEntry { id: String, reason: String },

    /// Two entries share the same id.
    #[error("duplicate entry id: {0}")]
    DuplicateEntry(String),

    /// A cache record whose metadata disagrees with the allowlist it holds.
    #[error("inconsistent cache record: {0}")]
    InconsistentCache(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AllowlistError {
    pub(crate) fn invalid_entry(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
