//! Exact and fuzzy allowlist matching.

use crate::blocklist::is_blocklisted;
use crate::distance::bounded_distance;
use crate::normalize::normalize_url;
use safeharbor_types::{AllowlistEntry, CrisisAllowlist};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound on the fuzzy distance, whatever the caller asks for.
pub const MAX_FUZZY_DISTANCE: usize = 2;

/// Hosts shorter than this are never fuzzy-matched.
pub const MIN_FUZZY_LEN: usize = 6;

/// Options controlling a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    /// Enables the fuzzy tier.
    pub use_fuzzy_match: bool,
    /// Largest edit distance reported as a match. Clamped to
    /// [`MAX_FUZZY_DISTANCE`].
    pub max_distance: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            use_fuzzy_match: false,
            max_distance: 1,
        }
    }
}

impl MatchOptions {
    /// Fuzzy matching with the default distance.
    #[must_use]
    pub fn fuzzy() -> Self {
        Self {
            use_fuzzy_match: true,
            ..Self::default()
        }
    }

    fn effective_max_distance(&self) -> usize {
        self.max_distance.min(MAX_FUZZY_DISTANCE)
    }
}

/// Detailed match outcome.
///
/// Only the sync and test layers see this. The capture decision path reduces
/// it to a single boolean before anything leaves the subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    #[serde(rename = "match")]
    pub matched: bool,
    pub fuzzy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<AllowlistEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

impl MatchResult {
    #[must_use]
    pub fn no_match() -> Self {
        Self::default()
    }

    fn exact(entry: &AllowlistEntry) -> Self {
        Self {
            matched: true,
            fuzzy: false,
            entry: Some(entry.clone()),
            distance: None,
        }
    }

    fn fuzzy(entry: &AllowlistEntry, distance: usize) -> Self {
        Self {
            matched: true,
            fuzzy: true,
            entry: Some(entry.clone()),
            distance: Some(distance),
        }
    }
}

/// An allowlist indexed for repeated lookups.
///
/// Domains are indexed before aliases, so when a host appears as one entry's
/// domain and another entry's alias, the domain wins, mirroring the linear
/// order domains → aliases → wildcards.
pub struct CrisisMatcher<'a> {
    allowlist: &'a CrisisAllowlist,
    hosts: HashMap<&'a str, usize>,
    wildcards: Vec<(&'a str, usize)>,
}

impl<'a> CrisisMatcher<'a> {
    /// Builds the index.
    #[must_use]
    pub fn new(allowlist: &'a CrisisAllowlist) -> Self {
        let entries = allowlist.entries();
        let mut hosts = HashMap::with_capacity(entries.len() * 2);

        for (idx, entry) in entries.iter().enumerate() {
            hosts.entry(entry.domain.as_str()).or_insert(idx);
        }
        for (idx, entry) in entries.iter().enumerate() {
            for alias in &entry.aliases {
                hosts.entry(alias.as_str()).or_insert(idx);
            }
        }

        let wildcards = entries
            .iter()
            .enumerate()
            .flat_map(|(idx, entry)| entry.wildcard_suffixes().map(move |s| (s, idx)))
            .collect();

        Self {
            allowlist,
            hosts,
            wildcards,
        }
    }

    /// Matches a URL or bare host.
    #[must_use]
    pub fn match_url(&self, url: &str, options: MatchOptions) -> MatchResult {
        match normalize_url(url) {
            Some(host) => self.match_host(&host, options),
            None => MatchResult::no_match(),
        }
    }

    /// Matches an already normalized host.
    #[must_use]
    pub fn match_host(&self, host: &str, options: MatchOptions) -> MatchResult {
        if let Some(entry) = self.exact_entry(host) {
            return MatchResult::exact(entry);
        }
        if !options.use_fuzzy_match {
            return MatchResult::no_match();
        }
        self.fuzzy_match(host, options.effective_max_distance())
    }

    fn exact_entry(&self, host: &str) -> Option<&'a AllowlistEntry> {
        let entries = self.allowlist.entries();
        if let Some(&idx) = self.hosts.get(host) {
            return entries.get(idx);
        }
        self.wildcards
            .iter()
            .find(|(suffix, _)| host.len() > suffix.len() && host.ends_with(*suffix))
            .and_then(|&(_, idx)| entries.get(idx))
    }

    fn fuzzy_match(&self, host: &str, max_distance: usize) -> MatchResult {
        if max_distance == 0 || host.chars().count() < MIN_FUZZY_LEN || is_blocklisted(host) {
            return MatchResult::no_match();
        }

        let mut best: Option<(&AllowlistEntry, usize)> = None;
        for entry in self.allowlist.entries() {
            for candidate in entry.hosts() {
                let Some(distance) = bounded_distance(host, candidate, max_distance) else {
                    continue;
                };
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((entry, distance));
                }
            }
        }

        match best {
            Some((entry, distance)) => MatchResult::fuzzy(entry, distance),
            None => MatchResult::no_match(),
        }
    }
}

/// Exact-mode match of `url` against `allowlist`.
#[must_use]
pub fn is_crisis_url(url: &str, allowlist: &CrisisAllowlist) -> MatchResult {
    CrisisMatcher::new(allowlist).match_url(url, MatchOptions::default())
}

/// Match of `url` against `allowlist` with the fuzzy tier controlled by
/// `options`.
#[must_use]
pub fn is_crisis_url_fuzzy(
    url: &str,
    allowlist: &CrisisAllowlist,
    options: MatchOptions,
) -> MatchResult {
    CrisisMatcher::new(allowlist).match_url(url, options)
}
