//! Operator-facing sync status.

use chrono::{DateTime, Utc};
use safeharbor_types::CachedAllowlist;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the local allowlist cache for operational reporting.
///
/// This is a telemetry channel for operators. It must never be surfaced to
/// the monitored child or to the parent-facing UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistSyncStatus {
    pub platform: String,
    pub version: String,
    pub last_sync_at: DateTime<Utc>,
    pub is_stale: bool,
    #[serde(with = "crate::duration_ms")]
    pub cache_age: Duration,
    pub is_emergency: bool,
}

impl AllowlistSyncStatus {
    /// Builds a status from a cache record as seen at `now`.
    #[must_use]
    pub fn from_cache(
        platform: &str,
        cache: &CachedAllowlist,
        now: DateTime<Utc>,
        stale_threshold: Duration,
    ) -> Self {
        let cache_age = cache.age(now);
        Self {
            platform: platform.to_string(),
            version: cache.version().to_string(),
            last_sync_at: cache.cached_at(),
            is_stale: cache_age >= stale_threshold,
            cache_age,
            is_emergency: cache.is_emergency(),
        }
    }
}
