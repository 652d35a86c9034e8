//! Allowlist transport.

use crate::config::AllowlistSyncConfig;
use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Outcome of a single successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResponse {
    /// The server sent a body. It has not been validated yet.
    Modified { body: Vec<u8>, etag: Option<String> },
    /// `304 Not Modified`: the cached copy is still current.
    NotModified,
}

/// Fetches the raw allowlist document.
///
/// Implementations perform one attempt per call; retries, timeouts and
/// validation belong to the service.
#[async_trait]
pub trait AllowlistFetcher: Send + Sync {
    /// Issues one request, conditional on `etag` when given.
    async fn fetch(&self, etag: Option<&str>) -> SyncResult<FetchResponse>;
}

/// HTTP implementation backed by `reqwest`.
pub struct HttpAllowlistFetcher {
    client: Client,
    endpoint: String,
}

impl HttpAllowlistFetcher {
    /// Creates a fetcher for the configured endpoint and timeout.
    pub fn new(config: &AllowlistSyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Returns the endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AllowlistFetcher for HttpAllowlistFetcher {
    async fn fetch(&self, etag: Option<&str>) -> SyncResult<FetchResponse> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json");
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::Timeout
            } else {
                SyncError::Network(format!("allowlist request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            debug!("Allowlist not modified");
            return Ok(FetchResponse::NotModified);
        }
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::Timeout
            } else {
                SyncError::Network(format!("failed to read allowlist body: {e}"))
            }
        })?;

        debug!("Fetched allowlist ({} bytes)", body.len());
        Ok(FetchResponse::Modified {
            body: body.to_vec(),
            etag,
        })
    }
}
