//! The privacy gap detector.
//!
//! Folds "is this a crisis resource" and "is this inside a scheduled gap"
//! into one [`CaptureSuppressResult`]. The two suppressing paths return the
//! same constant, and this module emits no logs, so the reason for a
//! suppression is not observable from outside.

use crate::decision::CaptureSuppressResult;
use crate::schedule::ScheduleSource;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use safeharbor_matcher::is_crisis_url;
use safeharbor_sync::AllowlistSyncService;
use safeharbor_types::CrisisAllowlist;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supplies the allowlist used for decisions.
///
/// Implementations must answer from local state: capture decisions never
/// wait on the network.
#[async_trait]
pub trait AllowlistProvider: Send + Sync {
    async fn current_allowlist(&self) -> Arc<CrisisAllowlist>;
}

#[async_trait]
impl AllowlistProvider for AllowlistSyncService {
    async fn current_allowlist(&self) -> Arc<CrisisAllowlist> {
        AllowlistSyncService::current_allowlist(self).await
    }
}

#[async_trait]
impl AllowlistProvider for Arc<CrisisAllowlist> {
    async fn current_allowlist(&self) -> Arc<CrisisAllowlist> {
        Arc::clone(self)
    }
}

#[async_trait]
impl AllowlistProvider for CrisisAllowlist {
    async fn current_allowlist(&self) -> Arc<CrisisAllowlist> {
        Arc::new(self.clone())
    }
}

/// Detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// When false, only crisis resources are suppressed.
    pub privacy_gaps_enabled: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            privacy_gaps_enabled: true,
        }
    }
}

/// Decides whether a capture must be suppressed.
pub struct PrivacyGapDetector {
    allowlist: Arc<dyn AllowlistProvider>,
    schedules: Arc<dyn ScheduleSource>,
    config: DetectorConfig,
}

impl PrivacyGapDetector {
    pub fn new(
        allowlist: Arc<dyn AllowlistProvider>,
        schedules: Arc<dyn ScheduleSource>,
        config: DetectorConfig,
    ) -> Self {
        Self {
            allowlist,
            schedules,
            config,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Returns whether capturing `url` for `child_id` at `timestamp` must be
    /// suppressed.
    ///
    /// Crisis resources are suppressed first and unconditionally, before the
    /// schedule is consulted and regardless of configuration.
    pub async fn should_suppress_capture(
        &self,
        child_id: &str,
        timestamp: DateTime<Utc>,
        url: &str,
    ) -> CaptureSuppressResult {
        let allowlist = self.allowlist.current_allowlist().await;
        if is_crisis_url(url, &allowlist).matched {
            return CaptureSuppressResult::SUPPRESS;
        }

        if !self.config.privacy_gaps_enabled {
            return CaptureSuppressResult::ALLOW;
        }

        if self.is_within_scheduled_gap(child_id, timestamp).await {
            CaptureSuppressResult::SUPPRESS
        } else {
            CaptureSuppressResult::ALLOW
        }
    }

    /// Schedule-only check, skipping the crisis lookup.
    ///
    /// Capture paths must go through
    /// [`should_suppress_capture`](Self::should_suppress_capture) instead.
    ///
    /// Windows may run past midnight, so the previous day's schedule is
    /// consulted as well.
    pub async fn is_within_scheduled_gap(&self, child_id: &str, timestamp: DateTime<Utc>) -> bool {
        let today = timestamp.date_naive();
        if self.schedule_contains(child_id, today, timestamp).await {
            return true;
        }
        match today.pred_opt() {
            Some(yesterday) => self.schedule_contains(child_id, yesterday, timestamp).await,
            None => false,
        }
    }

    async fn schedule_contains(
        &self,
        child_id: &str,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> bool {
        self.schedules
            .get_schedule(child_id, date)
            .await
            .is_some_and(|schedule| schedule.contains(timestamp))
    }
}
