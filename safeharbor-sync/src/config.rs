//! Sync service configuration.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Configuration for [`AllowlistSyncService`](crate::AllowlistSyncService).
///
/// Durations are serialized as milliseconds. Missing fields take their
/// defaults, so a platform config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowlistSyncConfig {
    /// URL the allowlist is fetched from.
    pub endpoint: String,
    /// Platform label reported in sync status (e.g. `android`, `windows`).
    pub platform: String,
    /// Cache lifetime for regular versions.
    #[serde(with = "crate::duration_ms")]
    pub normal_ttl: Duration,
    /// Cache lifetime for emergency versions.
    #[serde(with = "crate::duration_ms")]
    pub emergency_ttl: Duration,
    /// Age after which `needs_refresh()` reports true. Advisory only.
    #[serde(with = "crate::duration_ms")]
    pub stale_threshold: Duration,
    /// Bound on each network attempt.
    #[serde(with = "crate::duration_ms")]
    pub request_timeout: Duration,
    /// Total number of fetch attempts, including the first.
    pub max_retry_attempts: u32,
    /// Base delay between attempts; attempt `n` waits `retry_delay * n`.
    #[serde(with = "crate::duration_ms")]
    pub retry_delay: Duration,
}

impl Default for AllowlistSyncConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://allowlist.safeharbor.app/v1/crisis-allowlist.json".to_string(),
            platform: "generic".to_string(),
            normal_ttl: 24 * HOUR,
            emergency_ttl: HOUR,
            stale_threshold: 12 * HOUR,
            request_timeout: Duration::from_secs(10),
            max_retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl AllowlistSyncConfig {
    /// Rejects configurations that would break the sync contract.
    pub fn validate(&self) -> SyncResult<()> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| SyncError::Config(format!("invalid endpoint {:?}: {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::Config(format!(
                "endpoint must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(SyncError::Config("request_timeout must be non-zero".to_string()));
        }
        if self.emergency_ttl > self.normal_ttl {
            return Err(SyncError::Config(
                "emergency_ttl must not exceed normal_ttl".to_string(),
            ));
        }
        Ok(())
    }
}
