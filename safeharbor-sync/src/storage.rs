//! Per-platform persistence for the allowlist cache.
//!
//! Implementations must replace the cache record atomically: a reader sees
//! either the previous record or the new one, never a mix.

use crate::error::SyncResult;
use crate::status::AllowlistSyncStatus;
use async_trait::async_trait;
use chrono::Utc;
use safeharbor_types::{CachedAllowlist, CrisisAllowlist};
use tokio::sync::RwLock;

/// Abstract allowlist storage.
///
/// The ETag and status hooks are optional capabilities: platforms that do
/// not support them keep the default no-op implementations.
#[async_trait]
pub trait AllowlistStorage: Send + Sync {
    /// Reads the cached record, if any.
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>>;

    /// Replaces the cached record with `allowlist`, stamped with the current
    /// time.
    async fn save_to_cache(&self, allowlist: &CrisisAllowlist, is_emergency: bool) -> SyncResult<()>;

    /// Returns the ETag of the last successful fetch.
    async fn get_stored_etag(&self) -> SyncResult<Option<String>> {
        Ok(None)
    }

    /// Persists the ETag of a successful fetch.
    async fn save_etag(&self, _etag: &str) -> SyncResult<()> {
        Ok(())
    }

    /// Forgets the stored ETag, so the next fetch is unconditional.
    ///
    /// The default writes an empty ETag, which readers treat as none.
    async fn clear_etag(&self) -> SyncResult<()> {
        self.save_etag("").await
    }

    /// Receives operator-facing status after each sync. Runs detached from
    /// the sync call; failures are logged and otherwise ignored.
    async fn report_sync_status(&self, _status: &AllowlistSyncStatus) -> SyncResult<()> {
        Ok(())
    }
}

/// In-memory storage.
///
/// Useful on platforms that persist elsewhere and for tests. Every write swaps
/// the whole record under a write lock.
#[derive(Debug, Default)]
pub struct MemoryAllowlistStore {
    cache: RwLock<Option<CachedAllowlist>>,
    etag: RwLock<Option<String>>,
    reported: RwLock<Vec<AllowlistSyncStatus>>,
}

impl MemoryAllowlistStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a cache record.
    pub fn with_cached(record: CachedAllowlist) -> Self {
        Self {
            cache: RwLock::new(Some(record)),
            ..Self::default()
        }
    }

    /// Sets the stored ETag.
    pub async fn set_etag(&self, etag: impl Into<String>) {
        *self.etag.write().await = Some(etag.into());
    }

    /// Returns every status reported so far, oldest first.
    pub async fn reported_statuses(&self) -> Vec<AllowlistSyncStatus> {
        self.reported.read().await.clone()
    }
}

#[async_trait]
impl AllowlistStorage for MemoryAllowlistStore {
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>> {
        Ok(self.cache.read().await.clone())
    }

    async fn save_to_cache(&self, allowlist: &CrisisAllowlist, is_emergency: bool) -> SyncResult<()> {
        let record = CachedAllowlist::new(allowlist.clone(), is_emergency, Utc::now());
        *self.cache.write().await = Some(record);
        Ok(())
    }

    async fn get_stored_etag(&self) -> SyncResult<Option<String>> {
        Ok(self.etag.read().await.clone())
    }

    async fn save_etag(&self, etag: &str) -> SyncResult<()> {
        *self.etag.write().await = Some(etag.to_string());
        Ok(())
    }

    async fn clear_etag(&self) -> SyncResult<()> {
        *self.etag.write().await = None;
        Ok(())
    }

    async fn report_sync_status(&self, status: &AllowlistSyncStatus) -> SyncResult<()> {
        self.reported.write().await.push(status.clone());
        Ok(())
    }
}
