//! Core type definitions for SafeHarbor.
//!
//! This crate defines the crisis allowlist data model shared by the matcher,
//! the sync service and the capture layer:
//! - Allowlist entries (domains, aliases, wildcard patterns, contact methods)
//! - The versioned, distributable `CrisisAllowlist`
//! - The locally persisted `CachedAllowlist` snapshot
//! - Version parsing and the emergency re-sync rule
//! - The allowlist bundled into the application at build time
//!
//! Every constructor and parser validates its input, so an allowlist that
//! reaches a consumer always has a well-formed version and at least one entry.

mod allowlist;
pub mod bundled;
mod cached;
mod entry;
mod error;
mod version;

pub use allowlist::CrisisAllowlist;
pub use bundled::bundled_allowlist;
pub use cached::CachedAllowlist;
pub use entry::{AllowlistEntry, ContactMethod, CrisisCategory};
pub use error::{AllowlistError, AllowlistResult};
pub use version::{
    is_emergency_version, numeric_triple, should_resync, AllowlistVersion, EMERGENCY_MARKER,
};
