//! The allowlist compiled into the application.
//!
//! This is the last link of the fallback chain and must always produce a
//! usable allowlist without touching the network or the filesystem.

use crate::allowlist::CrisisAllowlist;
use crate::entry::{AllowlistEntry, ContactMethod, CrisisCategory};
use chrono::{DateTime, Utc};

/// Raw JSON of the bundled allowlist.
pub const BUNDLED_ALLOWLIST_JSON: &str = include_str!("../data/bundled_allowlist.json");

/// Parses the bundled allowlist.
///
/// The embedded document is checked by the test suite. Should it ever fail to
/// parse anyway, a single-entry allowlist for the 988 Suicide & Crisis
/// Lifeline is returned instead so callers still get a non-empty list.
#[must_use]
pub fn bundled_allowlist() -> CrisisAllowlist {
    CrisisAllowlist::from_json(BUNDLED_ALLOWLIST_JSON).unwrap_or_else(|_| minimal_allowlist())
}

fn minimal_allowlist() -> CrisisAllowlist {
    let entry = AllowlistEntry {
        id: "us-988-lifeline".to_string(),
        domain: "988lifeline.org".to_string(),
        category: CrisisCategory::Suicide,
        region: "US".to_string(),
        name: "988 Suicide & Crisis Lifeline".to_string(),
        description: "Free, confidential support for people in distress, 24/7.".to_string(),
        aliases: vec!["suicidepreventionlifeline.org".to_string()],
        wildcard_patterns: vec!["*.988lifeline.org".to_string()],
        contact_methods: vec![ContactMethod::Phone, ContactMethod::Text, ContactMethod::Chat],
        phone_number: Some("988".to_string()),
        text_number: Some("988".to_string()),
    };

    CrisisAllowlist::from_parts_unchecked("0.0.0", DateTime::<Utc>::UNIX_EPOCH, vec![entry])
}
