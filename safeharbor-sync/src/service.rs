//! The allowlist sync service.
//!
//! The fallback chain is network → cache → bundled. `sync()` and
//! `force_sync()` never return an error and never return an empty
//! allowlist; failures surface only as an advisory `fallback_reason`.

use crate::config::AllowlistSyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::fetcher::{AllowlistFetcher, FetchResponse, HttpAllowlistFetcher};
use crate::status::AllowlistSyncStatus;
use crate::storage::AllowlistStorage;
use chrono::Utc;
use safeharbor_types::{
    bundled_allowlist, is_emergency_version, should_resync, CachedAllowlist, CrisisAllowlist,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Where the returned allowlist came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    Network,
    Cache,
    Bundled,
}

impl SyncSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Cache => "cache",
            Self::Bundled => "bundled",
        }
    }
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of `sync()` / `force_sync()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// The allowlist now in effect. Never empty.
    pub allowlist: CrisisAllowlist,
    pub source: SyncSource,
    pub is_emergency: bool,
    /// True when a network fetch replaced the previous version under the
    /// re-sync rule.
    pub was_resync: bool,
    /// Why the network result was not used, when it was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl SyncOutcome {
    fn from_cache(cache: CachedAllowlist) -> Self {
        let is_emergency = cache.is_emergency();
        Self {
            allowlist: cache.into_data(),
            source: SyncSource::Cache,
            is_emergency,
            was_resync: false,
            fallback_reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncMode {
    /// Honors the TTL and sends the stored ETag.
    Conditional,
    /// Skips both and always fetches a fresh body.
    Forced,
}

/// Keeps the local allowlist cache fresh.
///
/// The service holds no background tasks: the host application decides when
/// to call [`sync`](Self::sync) or [`force_sync`](Self::force_sync). Capture
/// decisions use [`current_allowlist`](Self::current_allowlist), which never
/// touches the network and reads storage only until a record is in memory.
pub struct AllowlistSyncService {
    config: AllowlistSyncConfig,
    storage: Arc<dyn AllowlistStorage>,
    fetcher: Arc<dyn AllowlistFetcher>,
    /// Build-time copy; the last link of the fallback chain.
    bundled: Arc<CrisisAllowlist>,
    /// Last allowlist read from or written to storage by this service.
    snapshot: RwLock<Option<Arc<CrisisAllowlist>>>,
}

impl AllowlistSyncService {
    /// Creates a service that fetches over HTTP from `config.endpoint`.
    pub fn new(config: AllowlistSyncConfig, storage: Arc<dyn AllowlistStorage>) -> SyncResult<Self> {
        config.validate()?;
        let fetcher = Arc::new(HttpAllowlistFetcher::new(&config)?);
        Ok(Self::with_fetcher(config, storage, fetcher))
    }

    /// Creates a service with a custom transport.
    pub fn with_fetcher(
        config: AllowlistSyncConfig,
        storage: Arc<dyn AllowlistStorage>,
        fetcher: Arc<dyn AllowlistFetcher>,
    ) -> Self {
        Self {
            config,
            storage,
            fetcher,
            bundled: Arc::new(bundled_allowlist()),
            snapshot: RwLock::new(None),
        }
    }

    /// Replaces the bundled allowlist, for platforms that package their own.
    #[must_use]
    pub fn with_bundled(mut self, bundled: CrisisAllowlist) -> Self {
        self.bundled = Arc::new(bundled);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AllowlistSyncConfig {
        &self.config
    }

    /// Returns the bundled allowlist.
    pub fn bundled(&self) -> &CrisisAllowlist {
        &self.bundled
    }

    /// Returns a fresh-enough allowlist, fetching only when the cache has
    /// outlived its TTL.
    pub async fn sync(&self) -> SyncOutcome {
        self.run(SyncMode::Conditional).await
    }

    /// Fetches unconditionally, ignoring the TTL and the stored ETag.
    pub async fn force_sync(&self) -> SyncOutcome {
        self.run(SyncMode::Forced).await
    }

    /// Returns the cached allowlist, even if stale, else the bundled one.
    ///
    /// Never touches the network, never fails, never returns an empty list.
    pub async fn get_allowlist(&self) -> CrisisAllowlist {
        CrisisAllowlist::clone(&*self.current_allowlist().await)
    }

    /// Shared-handle form of [`get_allowlist`](Self::get_allowlist).
    ///
    /// Storage is read until a cached record has been seen; after that the
    /// in-memory copy is returned, and every cache write made through this
    /// service replaces it.
    pub async fn current_allowlist(&self) -> Arc<CrisisAllowlist> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Arc::clone(snapshot);
        }
        match self.load_cache().await {
            Some(cache) => self.remember(cache.into_data()).await,
            None => Arc::clone(&self.bundled),
        }
    }

    /// Reports whether the cache is missing or older than the staleness
    /// threshold. Advisory: decisions never wait on this.
    pub async fn needs_refresh(&self) -> bool {
        match self.load_cache().await {
            Some(cache) => cache.age(Utc::now()) >= self.config.stale_threshold,
            None => true,
        }
    }

    /// Returns operator-facing status, or `None` when nothing is cached.
    pub async fn get_sync_status(&self) -> Option<AllowlistSyncStatus> {
        self.load_cache()
            .await
            .map(|cache| self.status_for(&cache))
    }

    async fn run(&self, mode: SyncMode) -> SyncOutcome {
        let cached = self.load_cache().await;

        if mode == SyncMode::Conditional
            && let Some(cache) = &cached
            && cache.is_fresh(Utc::now(), self.config.normal_ttl, self.config.emergency_ttl)
        {
            debug!("Allowlist cache {} still fresh", cache.version());
            return SyncOutcome::from_cache(cache.clone());
        }

        let etag = match mode {
            SyncMode::Conditional => self.load_etag().await,
            SyncMode::Forced => None,
        };

        let mut response = self.fetch_with_retry(etag.as_deref()).await;
        if etag.is_some() && cached.is_none() && matches!(response, Ok(FetchResponse::NotModified)) {
            // The ETag outlived its cache record; only a full body helps.
            debug!("Allowlist ETag matched but nothing is cached; refetching unconditionally");
            response = self.fetch_with_retry(None).await;
        }

        match response {
            Ok(FetchResponse::NotModified) => match cached {
                Some(cache) => self.revalidate(cache).await,
                None => self.fallback(
                    None,
                    "server returned 304 Not Modified but no allowlist is cached".to_string(),
                ),
            },
            Ok(FetchResponse::Modified { body, etag }) => {
                match CrisisAllowlist::from_slice(&body) {
                    Ok(allowlist) => self.accept(allowlist, etag, cached.as_ref()).await,
                    Err(e) => {
                        let error = SyncError::from(e);
                        self.fallback(cached, error.to_string())
                    }
                }
            }
            Err(e) => self.fallback(cached, format!("allowlist fetch failed: {e}")),
        }
    }

    /// Issues up to `max_retry_attempts` requests, waiting
    /// `retry_delay * attempt` between retryable failures.
    async fn fetch_with_retry(&self, etag: Option<&str>) -> SyncResult<FetchResponse> {
        let attempts = self.config.max_retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result =
                match tokio::time::timeout(self.config.request_timeout, self.fetcher.fetch(etag))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(SyncError::Timeout),
                };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = self.config.retry_delay * attempt;
                    warn!(
                        "Allowlist fetch attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Stores a validated network allowlist and returns it.
    async fn accept(
        &self,
        allowlist: CrisisAllowlist,
        etag: Option<String>,
        previous: Option<&CachedAllowlist>,
    ) -> SyncOutcome {
        let is_emergency = is_emergency_version(allowlist.version());
        let previous_version = previous.map_or(self.bundled.version(), |c| c.version());
        let was_resync = should_resync(previous_version, allowlist.version());

        // The ETag is only kept alongside the body it describes. Otherwise a
        // later 304 would re-stamp the older cached version.
        match self.storage.save_to_cache(&allowlist, is_emergency).await {
            Ok(()) => {
                self.remember(allowlist.clone()).await;
                if let Some(etag) = etag
                    && let Err(e) = self.storage.save_etag(&etag).await
                {
                    warn!("Failed to persist allowlist ETag: {}", e);
                }
            }
            Err(e) => {
                warn!("Failed to persist allowlist {}: {}", allowlist.version(), e);
                if let Err(e) = self.storage.clear_etag().await {
                    warn!("Failed to clear allowlist ETag: {}", e);
                }
            }
        }

        info!(
            "Allowlist {} fetched from network (previous {}, emergency: {}, resync: {})",
            allowlist.version(),
            previous_version,
            is_emergency,
            was_resync
        );

        let record = CachedAllowlist::new(allowlist.clone(), is_emergency, Utc::now());
        self.report(&record);

        SyncOutcome {
            allowlist,
            source: SyncSource::Network,
            is_emergency,
            was_resync,
            fallback_reason: None,
        }
    }

    /// Handles `304 Not Modified` by re-stamping the cache, which extends its
    /// TTL window.
    async fn revalidate(&self, cache: CachedAllowlist) -> SyncOutcome {
        match self
            .storage
            .save_to_cache(cache.data(), cache.is_emergency())
            .await
        {
            Ok(()) => {
                self.remember(cache.data().clone()).await;
            }
            Err(e) => warn!("Failed to refresh allowlist cache timestamp: {}", e),
        }
        debug!("Allowlist {} revalidated", cache.version());

        let refreshed = cache.refreshed(Utc::now());
        self.report(&refreshed);
        SyncOutcome::from_cache(refreshed)
    }

    /// Returns the best local allowlist: the cache regardless of age, else
    /// the bundled copy.
    fn fallback(&self, cached: Option<CachedAllowlist>, reason: String) -> SyncOutcome {
        match cached {
            Some(cache) => {
                warn!(
                    "Allowlist sync fell back to cached {}: {}",
                    cache.version(),
                    reason
                );
                SyncOutcome {
                    fallback_reason: Some(reason),
                    ..SyncOutcome::from_cache(cache)
                }
            }
            None => {
                warn!(
                    "Allowlist sync fell back to bundled {}: {}",
                    self.bundled.version(),
                    reason
                );
                SyncOutcome {
                    allowlist: CrisisAllowlist::clone(&self.bundled),
                    source: SyncSource::Bundled,
                    is_emergency: self.bundled.is_emergency(),
                    was_resync: false,
                    fallback_reason: Some(reason),
                }
            }
        }
    }

    async fn load_cache(&self) -> Option<CachedAllowlist> {
        match self.storage.get_from_cache().await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Failed to read allowlist cache: {}", e);
                None
            }
        }
    }

    async fn remember(&self, allowlist: CrisisAllowlist) -> Arc<CrisisAllowlist> {
        let allowlist = Arc::new(allowlist);
        *self.snapshot.write().await = Some(Arc::clone(&allowlist));
        allowlist
    }

    async fn load_etag(&self) -> Option<String> {
        match self.storage.get_stored_etag().await {
            Ok(etag) => etag.filter(|etag| !etag.is_empty()),
            Err(e) => {
                warn!("Failed to read allowlist ETag: {}", e);
                None
            }
        }
    }

    fn status_for(&self, cache: &CachedAllowlist) -> AllowlistSyncStatus {
        AllowlistSyncStatus::from_cache(
            &self.config.platform,
            cache,
            Utc::now(),
            self.config.stale_threshold,
        )
    }

    /// Hands the status to storage on a detached task so a slow reporter
    /// never delays the sync result.
    fn report(&self, record: &CachedAllowlist) {
        let status = self.status_for(record);
        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            if let Err(e) = storage.report_sync_status(&status).await {
                debug!("Sync status report dropped: {}", e);
            }
        });
    }
}
