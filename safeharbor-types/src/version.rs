//! Allowlist versions and the re-sync rule.
//!
//! Versions are `major.minor.patch` with an optional `-suffix`. A suffix of
//! the form `-emergency-<token>` marks an out-of-band emergency push, which
//! shortens the cache lifetime on every device that receives it.

use crate::error::{AllowlistError, AllowlistResult};
use std::cmp::Ordering;
use std::fmt;

/// Marker embedded in emergency version strings.
pub const EMERGENCY_MARKER: &str = "-emergency-";

/// A strictly parsed allowlist version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowlistVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Everything after the first `-`, without the dash.
    pub suffix: Option<String>,
}

impl AllowlistVersion {
    /// Parses `^\d+\.\d+\.\d+(-[A-Za-z0-9.-]+)?$`.
    pub fn parse(version: &str) -> AllowlistResult<Self> {
        let invalid = || AllowlistError::InvalidVersion(version.to_string());

        let (core, suffix) = match version.split_once('-') {
            Some((core, suffix)) => (core, Some(suffix)),
            None => (version, None),
        };

        let mut parts = core.split('.');
        let mut next = || -> AllowlistResult<u64> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let (major, minor, patch) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }

        let suffix = match suffix {
            Some(s)
                if !s.is_empty()
                    && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') =>
            {
                Some(s.to_string())
            }
            Some(_) => return Err(invalid()),
            None => None,
        };

        Ok(Self {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// Returns the `(major, minor, patch)` triple.
    #[must_use]
    pub const fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Returns true if this is an emergency push, by the same rule as
    /// [`is_emergency_version`].
    #[must_use]
    pub fn is_emergency(&self) -> bool {
        self.suffix.as_deref().is_some_and(|s| {
            s.starts_with(&EMERGENCY_MARKER[1..]) || s.contains(EMERGENCY_MARKER)
        })
    }
}

impl fmt::Display for AllowlistVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

/// Returns true if the version string carries the emergency marker.
#[must_use]
pub fn is_emergency_version(version: &str) -> bool {
    version.contains(EMERGENCY_MARKER)
}

/// Parses only the numeric prefix of a version.
///
/// Anything that is not exactly three dot-separated integers before the first
/// `-` is treated as `0.0.0`.
#[must_use]
pub fn numeric_triple(version: &str) -> (u64, u64, u64) {
    let core = version.split('-').next().unwrap_or_default();
    let parts: Vec<Option<u64>> = core.split('.').map(|p| p.parse().ok()).collect();
    match parts.as_slice() {
        [Some(major), Some(minor), Some(patch)] => (*major, *minor, *patch),
        _ => (0, 0, 0),
    }
}

/// Decides whether moving from `old` to `new` warrants a re-sync.
///
/// Equal versions never do. Otherwise an emergency `new` always does, and a
/// regular `new` does only when its numeric triple is strictly greater.
#[must_use]
pub fn should_resync(old: &str, new: &str) -> bool {
    if old == new {
        return false;
    }
    if is_emergency_version(new) {
        return true;
    }
    numeric_triple(new).cmp(&numeric_triple(old)) == Ordering::Greater
}
