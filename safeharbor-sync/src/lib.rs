//! Crisis allowlist distribution for SafeHarbor.
//!
//! Keeps a local copy of the crisis allowlist fresh without ever leaving the
//! device without one. Every read resolves through the fail-safe chain
//! network → cache → bundled, so the allowlist is never empty, even offline.
//!
//! # Components
//!
//! - **Service**: [`AllowlistSyncService`] runs TTL checks, conditional
//!   fetches, retries and the fallback chain
//! - **Fetcher**: [`AllowlistFetcher`] abstracts the HTTP transport;
//!   [`HttpAllowlistFetcher`] is the `reqwest` implementation
//! - **Storage**: [`AllowlistStorage`] is the per-platform persistence seam,
//!   with in-memory and file-backed implementations
//!
//! # Example
//!
//! ```no_run
//! use safeharbor_sync::{AllowlistSyncConfig, AllowlistSyncService, MemoryAllowlistStore};
//! use std::sync::Arc;
//!
//! # async fn run() -> safeharbor_sync::SyncResult<()> {
//! let config = AllowlistSyncConfig {
//!     platform: "android".to_string(),
//!     ..Default::default()
//! };
//! let service = AllowlistSyncService::new(config, Arc::new(MemoryAllowlistStore::new()))?;
//!
//! let outcome = service.sync().await;
//! assert!(!outcome.allowlist.entries().is_empty());
//! # Ok(())
//! # }
//! ```

mod config;
mod duration_ms;
mod error;
mod fetcher;
mod file_store;
mod service;
mod status;
mod storage;

pub use config::AllowlistSyncConfig;
pub use error::{SyncError, SyncResult};
pub use fetcher::{AllowlistFetcher, FetchResponse, HttpAllowlistFetcher};
pub use file_store::FileAllowlistStore;
pub use service::{AllowlistSyncService, SyncOutcome, SyncSource};
pub use status::AllowlistSyncStatus;
pub use storage::{AllowlistStorage, MemoryAllowlistStore};
