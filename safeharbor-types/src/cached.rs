//! The locally persisted allowlist snapshot.

use crate::allowlist::CrisisAllowlist;
use crate::error::AllowlistError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached copy of the allowlist plus the metadata needed for TTL checks.
///
/// Records are always replaced wholesale; there are no setters. `version`
/// and `is_emergency` are denormalized from `data` so freshness can be
/// decided without walking the entries.
///
/// An emergency version is always flagged as emergency, so it can never be
/// kept for the normal TTL. Deserialization rejects records that break this
/// or whose `version` differs from `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCachedAllowlist")]
pub struct CachedAllowlist {
    data: CrisisAllowlist,
    /// Milliseconds since the Unix epoch of the last successful write.
    cached_at: i64,
    version: String,
    is_emergency: bool,
}

/// Unvalidated persisted shape.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCachedAllowlist {
    data: CrisisAllowlist,
    cached_at: i64,
    version: String,
    is_emergency: bool,
}

impl TryFrom<RawCachedAllowlist> for CachedAllowlist {
    type Error = AllowlistError;

    fn try_from(raw: RawCachedAllowlist) -> Result<Self, Self::Error> {
        if raw.version != raw.data.version() {
            return Err(AllowlistError::InconsistentCache(format!(
                "version {:?} does not match data version {:?}",
                raw.version,
                raw.data.version()
            )));
        }
        if raw.data.is_emergency() && !raw.is_emergency {
            return Err(AllowlistError::InconsistentCache(format!(
                "emergency version {} is not flagged as emergency",
                raw.version
            )));
        }
        Ok(Self {
            data: raw.data,
            cached_at: raw.cached_at,
            version: raw.version,
            is_emergency: raw.is_emergency,
        })
    }
}

impl CachedAllowlist {
    /// Creates a record for `data` written at `cached_at`.
    ///
    /// `is_emergency` may shorten the TTL of a regular version; an emergency
    /// version is flagged regardless.
    #[must_use]
    pub fn new(data: CrisisAllowlist, is_emergency: bool, cached_at: DateTime<Utc>) -> Self {
        Self {
            version: data.version().to_string(),
            is_emergency: is_emergency || data.is_emergency(),
            data,
            cached_at: cached_at.timestamp_millis(),
        }
    }

    /// Returns a copy of this record re-stamped at `cached_at`.
    #[must_use]
    pub fn refreshed(&self, cached_at: DateTime<Utc>) -> Self {
        Self {
            cached_at: cached_at.timestamp_millis(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn data(&self) -> &CrisisAllowlist {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> CrisisAllowlist {
        self.data
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    /// Returns the write time as epoch milliseconds.
    #[must_use]
    pub fn cached_at_millis(&self) -> i64 {
        self.cached_at
    }

    /// Returns the write time.
    #[must_use]
    pub fn cached_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.cached_at)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns how long ago the record was written. Clock skew that puts the
    /// write in the future yields zero.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        let elapsed = now.timestamp_millis().saturating_sub(self.cached_at);
        Duration::from_millis(u64::try_from(elapsed).unwrap_or(0))
    }

    /// Picks the TTL that applies to this record.
    #[must_use]
    pub fn ttl(&self, normal_ttl: Duration, emergency_ttl: Duration) -> Duration {
        if self.is_emergency {
            emergency_ttl
        } else {
            normal_ttl
        }
    }

    /// Returns true while the record is younger than its TTL.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, normal_ttl: Duration, emergency_ttl: Duration) -> bool {
        self.age(now) < self.ttl(normal_ttl, emergency_ttl)
    }
}
