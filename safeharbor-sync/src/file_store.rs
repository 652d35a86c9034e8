//! File-backed allowlist storage.
//!
//! Stores the cache record and the ETag as two files in one directory. Writes
//! go to a temporary sibling first and are renamed into place, so a crash or
//! a concurrent reader never observes a half-written record.

use crate::error::{SyncError, SyncResult};
use crate::storage::AllowlistStorage;
use async_trait::async_trait;
use chrono::Utc;
use safeharbor_types::{CachedAllowlist, CrisisAllowlist};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

const CACHE_FILE: &str = "crisis_allowlist_cache.json";
const ETAG_FILE: &str = "crisis_allowlist_etag";

/// Allowlist storage in a local directory.
#[derive(Debug, Clone)]
pub struct FileAllowlistStore {
    dir: PathBuf,
    /// Distinguishes temporary files of concurrent writers.
    write_seq: Arc<AtomicU64>,
}

impl FileAllowlistStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the directory holding the store's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the cache record.
    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE)
    }

    /// Returns the path of the ETag record.
    pub fn etag_path(&self) -> PathBuf {
        self.dir.join(ETAG_FILE)
    }

    async fn read_optional(path: &Path) -> SyncResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write_atomic(&self, name: &str, contents: &[u8]) -> SyncResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            SyncError::Storage(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let target = self.dir.join(name);
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{name}.{}.{seq}.tmp", std::process::id()));
        fs::write(&tmp, contents)
            .await
            .map_err(|e| SyncError::Storage(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &target).await.map_err(|e| {
            SyncError::Storage(format!("failed to replace {}: {e}", target.display()))
        })?;

        debug!("Wrote {} ({} bytes)", target.display(), contents.len());
        Ok(())
    }
}

#[async_trait]
impl AllowlistStorage for FileAllowlistStore {
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>> {
        let path = self.cache_path();
        let Some(bytes) = Self::read_optional(&path).await? else {
            return Ok(None);
        };

        // A corrupt record is as good as no record: the service falls back to
        // the bundled copy and the next successful fetch overwrites it.
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Ignoring unreadable allowlist cache {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    async fn save_to_cache(&self, allowlist: &CrisisAllowlist, is_emergency: bool) -> SyncResult<()> {
        let record = CachedAllowlist::new(allowlist.clone(), is_emergency, Utc::now());
        let json = serde_json::to_vec(&record)?;
        self.write_atomic(CACHE_FILE, &json).await
    }

    async fn get_stored_etag(&self) -> SyncResult<Option<String>> {
        let bytes = Self::read_optional(&self.etag_path()).await?;
        Ok(bytes
            .map(|b| String::from_utf8_lossy(&b).trim().to_string())
            .filter(|etag| !etag.is_empty()))
    }

    async fn save_etag(&self, etag: &str) -> SyncResult<()> {
        self.write_atomic(ETAG_FILE, etag.as_bytes()).await
    }

    async fn clear_etag(&self) -> SyncResult<()> {
        let path = self.etag_path();
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SyncError::Storage(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}
