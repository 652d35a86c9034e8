//! URL matching against the crisis allowlist.
//!
//! Matching happens in two tiers:
//!
//! 1. **Exact**: the normalized host is compared with every canonical domain,
//!    then every alias, then every wildcard suffix. First match wins.
//! 2. **Fuzzy** (opt-in): if nothing matched exactly, a bounded
//!    Damerau-Levenshtein distance is computed against domains and aliases so
//!    that one-character typos of a crisis site still match. A blocklist of
//!    high-traffic non-crisis domains short-circuits this tier, so ordinary
//!    browsing can never be mistaken for a crisis resource.
//!
//! The matcher is pure: it performs no I/O and emits no logs.
//!
//! # Example
//!
//! ```
//! use safeharbor_matcher::{is_crisis_url, is_crisis_url_fuzzy, MatchOptions};
//! use safeharbor_types::bundled_allowlist;
//!
//! let allowlist = bundled_allowlist();
//! assert!(is_crisis_url("https://www.988lifeline.org/chat", &allowlist).matched);
//!
//! let typo = is_crisis_url_fuzzy("988lifecline.org", &allowlist, MatchOptions::fuzzy());
//! assert!(typo.matched && typo.fuzzy);
//! ```

mod blocklist;
mod distance;
mod matcher;
mod normalize;

pub use blocklist::{is_blocklisted, FUZZY_BLOCKLIST};
pub use distance::{bounded_distance, osa_distance};
pub use matcher::{
    is_crisis_url, is_crisis_url_fuzzy, CrisisMatcher, MatchOptions, MatchResult,
    MAX_FUZZY_DISTANCE, MIN_FUZZY_LEN,
};
pub use normalize::normalize_url;
