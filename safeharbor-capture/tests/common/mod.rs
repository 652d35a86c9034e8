//! Shared helpers for capture tests.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use safeharbor_capture::{
    DetectorConfig, MemoryScheduleSource, PrivacyGapDetector, PrivacyGapSchedule, PrivacyGapWindow,
};
use safeharbor_types::{AllowlistEntry, ContactMethod, CrisisAllowlist, CrisisCategory};
use std::sync::Arc;

pub const CHILD: &str = "child-a";

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

pub fn allowlist() -> CrisisAllowlist {
    let entry = AllowlistEntry {
        id: "lifeline".to_string(),
        domain: "988lifeline.org".to_string(),
        category: CrisisCategory::Suicide,
        region: "US".to_string(),
        name: "988 Suicide & Crisis Lifeline".to_string(),
        description: "Call or text 988".to_string(),
        aliases: vec!["suicidepreventionlifeline.org".to_string()],
        wildcard_patterns: vec!["*.988lifeline.org".to_string()],
        contact_methods: vec![ContactMethod::Phone, ContactMethod::Text, ContactMethod::Chat],
        phone_number: Some("988".to_string()),
        text_number: Some("988".to_string()),
    };
    CrisisAllowlist::new("1.0.0", at(0, 0), vec![entry]).unwrap()
}

/// Schedule for [`CHILD`] with one gap from 10:00 to 10:30.
pub fn morning_gap() -> PrivacyGapSchedule {
    PrivacyGapSchedule::new(
        CHILD,
        day(),
        vec![PrivacyGapWindow::new(at(10, 0), at(10, 30)).unwrap()],
    )
    .unwrap()
}

pub async fn schedules_with(schedules: Vec<PrivacyGapSchedule>) -> Arc<MemoryScheduleSource> {
    let source = Arc::new(MemoryScheduleSource::new());
    for schedule in schedules {
        source.insert(schedule).await;
    }
    source
}

pub async fn detector(
    schedules: Vec<PrivacyGapSchedule>,
    privacy_gaps_enabled: bool,
) -> PrivacyGapDetector {
    PrivacyGapDetector::new(
        Arc::new(allowlist()),
        schedules_with(schedules).await,
        DetectorConfig {
            privacy_gaps_enabled,
        },
    )
}
