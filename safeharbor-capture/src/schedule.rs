//! Privacy gap schedules.
//!
//! Schedules are generated elsewhere; this module only models them and looks
//! them up.

use crate::error::{CaptureError, CaptureResult};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A half-open interval `[start, end)` during which capture is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct PrivacyGapWindow {
    #[serde(rename = "startTime")]
    start: DateTime<Utc>,
    #[serde(rename = "endTime")]
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWindow {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<RawWindow> for PrivacyGapWindow {
    type Error = CaptureError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}

impl PrivacyGapWindow {
    /// Builds a window. `end` must be strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CaptureResult<Self> {
        if end <= start {
            return Err(CaptureError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start inclusive, end exclusive.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// One child's privacy gaps for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSchedule")]
pub struct PrivacyGapSchedule {
    child_id: String,
    date: NaiveDate,
    windows: Vec<PrivacyGapWindow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchedule {
    child_id: String,
    date: NaiveDate,
    #[serde(default)]
    windows: Vec<PrivacyGapWindow>,
}

impl TryFrom<RawSchedule> for PrivacyGapSchedule {
    type Error = CaptureError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.child_id, raw.date, raw.windows)
    }
}

impl PrivacyGapSchedule {
    /// Builds a schedule. Every window must start on `date` (UTC). A window
    /// may run past midnight, but not beyond the end of the following day.
    pub fn new(
        child_id: impl Into<String>,
        date: NaiveDate,
        windows: Vec<PrivacyGapWindow>,
    ) -> CaptureResult<Self> {
        if let Some(w) = windows.iter().find(|w| w.start.date_naive() != date) {
            return Err(CaptureError::WindowOutsideDate {
                date,
                start: w.start,
            });
        }
        let limit = date
            .checked_add_days(Days::new(2))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc());
        if let Some(w) = windows.iter().find(|w| limit.is_none_or(|limit| w.end > limit)) {
            return Err(CaptureError::WindowTooLong { date, end: w.end });
        }
        Ok(Self {
            child_id: child_id.into(),
            date,
            windows,
        })
    }

    #[must_use]
    pub fn child_id(&self) -> &str {
        &self.child_id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn windows(&self) -> &[PrivacyGapWindow] {
        &self.windows
    }

    /// Returns true if `timestamp` falls inside any window.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.windows.iter().any(|w| w.contains(timestamp))
    }
}

/// Source of privacy gap schedules.
///
/// Lookups must be side-effect free. A source that cannot answer returns
/// `None`, which the detector treats as "no gaps today".
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn get_schedule(&self, child_id: &str, date: NaiveDate) -> Option<PrivacyGapSchedule>;
}

/// In-memory schedule source keyed by child and date.
#[derive(Debug, Default)]
pub struct MemoryScheduleSource {
    schedules: RwLock<HashMap<(String, NaiveDate), PrivacyGapSchedule>>,
}

impl MemoryScheduleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `schedule`, replacing any schedule for the same child and day.
    pub async fn insert(&self, schedule: PrivacyGapSchedule) {
        let key = (schedule.child_id.clone(), schedule.date);
        self.schedules.write().await.insert(key, schedule);
    }

    /// Removes and returns the schedule for `child_id` on `date`.
    pub async fn remove(&self, child_id: &str, date: NaiveDate) -> Option<PrivacyGapSchedule> {
        self.schedules
            .write()
            .await
            .remove(&(child_id.to_string(), date))
    }
}

#[async_trait]
impl ScheduleSource for MemoryScheduleSource {
    async fn get_schedule(&self, child_id: &str, date: NaiveDate) -> Option<PrivacyGapSchedule> {
        self.schedules
            .read()
            .await
            .get(&(child_id.to_string(), date))
            .cloned()
    }
}
