//! Shared fixtures for allowlist model tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use safeharbor_types::{AllowlistEntry, ContactMethod, CrisisAllowlist, CrisisCategory};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

/// A valid entry for `domain` with a phone contact method.
pub fn entry(id: &str, domain: &str) -> AllowlistEntry {
    AllowlistEntry {
        id: id.to_string(),
        domain: domain.to_string(),
        category: CrisisCategory::Crisis,
        region: "US".to_string(),
        name: format!("{id} hotline"),
        description: "Test crisis resource".to_string(),
        aliases: Vec::new(),
        wildcard_patterns: Vec::new(),
        contact_methods: vec![ContactMethod::Phone],
        phone_number: Some("555-0100".to_string()),
        text_number: None,
    }
}

pub fn allowlist(version: &str) -> CrisisAllowlist {
    CrisisAllowlist::new(
        version,
        fixed_time(),
        vec![entry("lifeline", "988lifeline.org"), entry("rainn", "rainn.org")],
    )
    .unwrap()
}
