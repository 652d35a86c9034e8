//! The distributable crisis allowlist.

use crate::entry::AllowlistEntry;
use crate::error::{AllowlistError, AllowlistResult};
use crate::version::{is_emergency_version, AllowlistVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A versioned, non-empty list of crisis resources.
///
/// Fields are private so the only ways to obtain a value are the validating
/// constructor and the validating deserializer: an allowlist with zero
/// entries or a malformed version can never be observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAllowlist")]
pub struct CrisisAllowlist {
    version: String,
    last_updated: DateTime<Utc>,
    entries: Vec<AllowlistEntry>,
}

/// Unvalidated wire shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAllowlist {
    version: String,
    last_updated: DateTime<Utc>,
    entries: Vec<AllowlistEntry>,
}

impl TryFrom<RawAllowlist> for CrisisAllowlist {
    type Error = AllowlistError;

    fn try_from(raw: RawAllowlist) -> Result<Self, Self::Error> {
        Self::new(raw.version, raw.last_updated, raw.entries)
    }
}

impl CrisisAllowlist {
    /// Builds an allowlist, validating the version and every entry.
    pub fn new(
        version: impl Into<String>,
        last_updated: DateTime<Utc>,
        entries: Vec<AllowlistEntry>,
    ) -> AllowlistResult<Self> {
        let version = version.into();
        AllowlistVersion::parse(&version)?;

        if entries.is_empty() {
            return Err(AllowlistError::EmptyAllowlist);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id.as_str()) {
                return Err(AllowlistError::DuplicateEntry(entry.id.clone()));
            }
        }

        Ok(Self {
            version,
            last_updated,
            entries,
        })
    }

    /// Builds an allowlist whose invariants are known to hold at compile time.
    pub(crate) fn from_parts_unchecked(
        version: &str,
        last_updated: DateTime<Utc>,
        entries: Vec<AllowlistEntry>,
    ) -> Self {
        debug_assert!(!entries.is_empty());
        Self {
            version: version.to_string(),
            last_updated,
            entries,
        }
    }

    /// Parses and validates an allowlist from JSON text.
    pub fn from_json(json: &str) -> AllowlistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and validates an allowlist from raw response bytes.
    pub fn from_slice(bytes: &[u8]) -> AllowlistResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serializes the allowlist to JSON.
    pub fn to_json(&self) -> AllowlistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns when the allowlist was last updated upstream.
    #[must_use]
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Returns the entries in publication order. Never empty.
    #[must_use]
    pub fn entries(&self) -> &[AllowlistEntry] {
        &self.entries
    }

    /// Returns true if this is an emergency push.
    #[must_use]
    pub fn is_emergency(&self) -> bool {
        is_emergency_version(&self.version)
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn find_entry(&self, id: &str) -> Option<&AllowlistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
