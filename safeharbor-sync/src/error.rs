//! Error types for the allowlist sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while fetching or persisting the allowlist.
///
/// None of these escape `sync()` or `force_sync()`: they are resolved through
/// the fallback chain and surface only as a `fallback_reason`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// The response body was not a valid allowlist.
    #[error("invalid allowlist payload: {0}")]
    InvalidPayload(#[from] safeharbor_types::AllowlistError),

    /// Persistent storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Returns true for failures worth retrying: connection errors, timeouts
    /// and 5xx responses. Other statuses (401, 404, ...) and invalid payloads
    /// fail immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network(_) | SyncError::Timeout => true,
            SyncError::Status(code) => (500..600).contains(code),
            _ => false,
        }
    }
}
