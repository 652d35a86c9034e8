//! Shared helpers for sync tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safeharbor_sync::{
    AllowlistFetcher, AllowlistStorage, AllowlistSyncConfig, AllowlistSyncStatus, FetchResponse,
    MemoryAllowlistStore, SyncError, SyncResult,
};
use safeharbor_types::{AllowlistEntry, CachedAllowlist, ContactMethod, CrisisAllowlist, CrisisCategory};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn entry(id: &str, domain: &str) -> AllowlistEntry {
    AllowlistEntry {
        id: id.to_string(),
        domain: domain.to_string(),
        category: CrisisCategory::Suicide,
        region: "US".to_string(),
        name: format!("{id} line"),
        description: "Test crisis resource".to_string(),
        aliases: Vec::new(),
        wildcard_patterns: Vec::new(),
        contact_methods: vec![ContactMethod::Phone, ContactMethod::Chat],
        phone_number: Some("988".to_string()),
        text_number: None,
    }
}

pub fn allowlist(version: &str) -> CrisisAllowlist {
    CrisisAllowlist::new(
        version,
        Utc::now(),
        vec![entry("lifeline", "988lifeline.org"), entry("trevor", "thetrevorproject.org")],
    )
    .unwrap()
}

pub fn allowlist_json(version: &str) -> serde_json::Value {
    serde_json::to_value(allowlist(version)).unwrap()
}

/// A cache record written `age` ago.
pub fn cached(version: &str, age: Duration) -> CachedAllowlist {
    let list = allowlist(version);
    let is_emergency = list.is_emergency();
    let written: DateTime<Utc> = Utc::now() - chrono::Duration::from_std(age).unwrap();
    CachedAllowlist::new(list, is_emergency, written)
}

pub fn hours(n: u64) -> Duration {
    Duration::from_secs(n * 60 * 60)
}

/// Config pointing at `endpoint` with delays short enough for tests.
pub fn fast_config(endpoint: &str) -> AllowlistSyncConfig {
    AllowlistSyncConfig {
        endpoint: endpoint.to_string(),
        platform: "test".to_string(),
        request_timeout: Duration::from_secs(2),
        max_retry_attempts: 3,
        retry_delay: Duration::from_millis(10),
        ..Default::default()
    }
}

/// Fetcher that replays a fixed script of outcomes.
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<SyncResult<FetchResponse>>>,
    calls: AtomicUsize,
    etags: Mutex<Vec<Option<String>>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<SyncResult<FetchResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            etags: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `If-None-Match` value of every request, in order.
    pub fn etags_sent(&self) -> Vec<Option<String>> {
        self.etags.lock().unwrap().clone()
    }
}

#[async_trait]
impl AllowlistFetcher for ScriptedFetcher {
    async fn fetch(&self, etag: Option<&str>) -> SyncResult<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.etags.lock().unwrap().push(etag.map(str::to_string));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SyncError::Network("script exhausted".to_string())))
    }
}

pub fn body(value: &serde_json::Value) -> FetchResponse {
    FetchResponse::Modified {
        body: serde_json::to_vec(value).unwrap(),
        etag: None,
    }
}

pub fn body_with_etag(value: &serde_json::Value, etag: &str) -> FetchResponse {
    FetchResponse::Modified {
        body: serde_json::to_vec(value).unwrap(),
        etag: Some(etag.to_string()),
    }
}

/// Memory storage whose first `failing_writes` cache writes fail. Counts
/// cache reads.
pub struct FlakyStore {
    pub inner: MemoryAllowlistStore,
    failing_writes: AtomicUsize,
    reads: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryAllowlistStore, failing_writes: usize) -> Self {
        Self {
            inner,
            failing_writes: AtomicUsize::new(failing_writes),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AllowlistStorage for FlakyStore {
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_from_cache().await
    }

    async fn save_to_cache(&self, allowlist: &CrisisAllowlist, is_emergency: bool) -> SyncResult<()> {
        let remaining = self.failing_writes.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_writes.store(remaining - 1, Ordering::SeqCst);
            return Err(SyncError::Storage("write interrupted".to_string()));
        }
        self.inner.save_to_cache(allowlist, is_emergency).await
    }

    async fn get_stored_etag(&self) -> SyncResult<Option<String>> {
        self.inner.get_stored_etag().await
    }

    async fn save_etag(&self, etag: &str) -> SyncResult<()> {
        self.inner.save_etag(etag).await
    }

    async fn clear_etag(&self) -> SyncResult<()> {
        self.inner.clear_etag().await
    }
}

/// Memory storage whose status hook never finishes in test time.
pub struct SlowReporterStore {
    pub inner: MemoryAllowlistStore,
}

#[async_trait]
impl AllowlistStorage for SlowReporterStore {
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>> {
        self.inner.get_from_cache().await
    }

    async fn save_to_cache(&self, allowlist: &CrisisAllowlist, is_emergency: bool) -> SyncResult<()> {
        self.inner.save_to_cache(allowlist, is_emergency).await
    }

    async fn report_sync_status(&self, _status: &AllowlistSyncStatus) -> SyncResult<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Storage whose reads are empty and whose writes always fail.
pub struct BrokenStore;

#[async_trait]
impl AllowlistStorage for BrokenStore {
    async fn get_from_cache(&self) -> SyncResult<Option<CachedAllowlist>> {
        Err(SyncError::Storage("disk unavailable".to_string()))
    }

    async fn save_to_cache(&self, _allowlist: &CrisisAllowlist, _is_emergency: bool) -> SyncResult<()> {
        Err(SyncError::Storage("disk full".to_string()))
    }

    async fn save_etag(&self, _etag: &str) -> SyncResult<()> {
        Err(SyncError::Storage("disk full".to_string()))
    }
}

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
