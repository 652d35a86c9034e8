//! Platform-facing capture adapter.

use crate::decision::CaptureDecision;
use crate::detector::PrivacyGapDetector;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};

/// Answers "may this page be captured now" for the active child.
///
/// The active child can be switched at any time, e.g. on a profile change,
/// without rebuilding the adapter. Like the detector, the adapter logs
/// nothing about URLs or decisions.
pub struct CaptureAdapter {
    detector: Arc<PrivacyGapDetector>,
    child_id: RwLock<String>,
    platform: String,
}

impl CaptureAdapter {
    pub fn new(
        detector: Arc<PrivacyGapDetector>,
        child_id: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            child_id: RwLock::new(child_id.into()),
            platform: platform.into(),
        }
    }

    /// Decides for `url` at the current time.
    pub async fn should_capture(&self, url: &str) -> CaptureDecision {
        self.should_capture_at(url, Utc::now()).await
    }

    /// Decides for `url` at `timestamp`.
    pub async fn should_capture_at(&self, url: &str, timestamp: DateTime<Utc>) -> CaptureDecision {
        let child_id = self.child_id();
        self.detector
            .should_suppress_capture(&child_id, timestamp, url)
            .await
            .into()
    }

    /// Switches the active child for subsequent decisions.
    pub fn set_child_id(&self, child_id: impl Into<String>) {
        *self.child_id.write().unwrap_or_else(PoisonError::into_inner) = child_id.into();
    }

    pub fn child_id(&self) -> String {
        self.child_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Platform label, e.g. `android` or `chrome-extension`.
    pub fn platform(&self) -> &str {
        &self.platform
    }
}
