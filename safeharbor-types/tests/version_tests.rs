use proptest::prelude::*;
use safeharbor_types::{
    is_emergency_version, numeric_triple, should_resync, AllowlistVersion, EMERGENCY_MARKER,
};

// ── Strict parsing ───────────────────────────────────────────────

#[test]
fn parses_plain_version() {
    let v = AllowlistVersion::parse("1.2.3").unwrap();
    assert_eq!(v.triple(), (1, 2, 3));
    assert!(v.suffix.is_none());
    assert!(!v.is_emergency());
    assert_eq!(v.to_string(), "1.2.3");
}

#[test]
fn parses_emergency_version() {
    let v = AllowlistVersion::parse("1.0.0-emergency-x7").unwrap();
    assert_eq!(v.suffix.as_deref(), Some("emergency-x7"));
    assert!(v.is_emergency());
    assert_eq!(v.to_string(), "1.0.0-emergency-x7");
}

#[test]
fn rejects_malformed_versions() {
    for bad in ["", "1", "1.2", "1.2.3.4", "v1.2.3", "1.2.x", "1.2.3-", "1.2.3-bad suffix", "1..3"] {
        assert!(AllowlistVersion::parse(bad).is_err(), "{bad:?} should be rejected");
    }
}

// ── Emergency marker ─────────────────────────────────────────────

#[test]
fn emergency_detection() {
    assert!(is_emergency_version("2.1.0-emergency-abc"));
    assert!(!is_emergency_version("2.1.0"));
    assert!(!is_emergency_version("2.1.0-beta"));
    assert_eq!(EMERGENCY_MARKER, "-emergency-");
}

#[test]
fn marker_after_another_suffix_is_emergency() {
    for version in ["1.0.0-rc-emergency-x", "1.0.0-emergency-x", "2.0.0-hotfix.2-emergency-9"] {
        let parsed = AllowlistVersion::parse(version).unwrap();
        assert!(is_emergency_version(version), "{version}");
        assert_eq!(parsed.is_emergency(), is_emergency_version(version), "{version}");
    }
    for version in ["1.0.0-emergency", "1.0.0-rc-emergencyx", "1.0.0-notemergency-x"] {
        let parsed = AllowlistVersion::parse(version).unwrap();
        assert_eq!(parsed.is_emergency(), is_emergency_version(version), "{version}");
    }
}

// ── Numeric prefix ───────────────────────────────────────────────

#[test]
fn numeric_triple_ignores_suffix() {
    assert_eq!(numeric_triple("3.4.5-emergency-z"), (3, 4, 5));
}

#[test]
fn malformed_prefix_is_zero() {
    assert_eq!(numeric_triple("garbage"), (0, 0, 0));
    assert_eq!(numeric_triple("1.2"), (0, 0, 0));
    assert_eq!(numeric_triple("1.x.3"), (0, 0, 0));
}

// ── Resync rule ──────────────────────────────────────────────────

#[test]
fn equal_versions_never_resync() {
    assert!(!should_resync("1.0.0", "1.0.0"));
    assert!(!should_resync("1.0.0-emergency-x", "1.0.0-emergency-x"));
}

#[test]
fn emergency_version_forces_resync() {
    assert!(should_resync("1.0.0", "1.0.0-emergency-x"));
    assert!(should_resync("2.0.0", "1.0.0-emergency-x"));
}

#[test]
fn newer_triple_resyncs_older_does_not() {
    assert!(should_resync("1.0.0", "1.0.1"));
    assert!(should_resync("1.9.9", "2.0.0"));
    assert!(!should_resync("1.0.1", "1.0.0"));
    assert!(!should_resync("1.0.0", "1.0.0-beta"));
}

#[test]
fn malformed_old_version_treated_as_zero() {
    assert!(should_resync("corrupt", "0.0.1"));
    assert!(!should_resync("corrupt", "also-corrupt"));
}

proptest! {
    /// A regular version resyncs iff its triple is strictly greater.
    #[test]
    fn resync_matches_triple_order(
        a in (0u64..50, 0u64..50, 0u64..50),
        b in (0u64..50, 0u64..50, 0u64..50),
    ) {
        let old = format!("{}.{}.{}", a.0, a.1, a.2);
        let new = format!("{}.{}.{}", b.0, b.1, b.2);
        prop_assert_eq!(should_resync(&old, &new), b > a);
    }

    /// Any emergency version differing from the cached one resyncs.
    #[test]
    fn emergency_always_resyncs(
        a in (0u64..50, 0u64..50, 0u64..50),
        token in "[a-z0-9]{1,8}",
    ) {
        let old = format!("{}.{}.{}", a.0, a.1, a.2);
        let new = format!("0.0.0-emergency-{token}");
        prop_assert!(should_resync(&old, &new));
    }

    /// Strictly parsed versions display back to the same string.
    #[test]
    fn parse_display_is_identity(
        t in (0u64..1000, 0u64..1000, 0u64..1000),
        suffix in proptest::option::of("[a-z0-9]{1,6}(-[a-z0-9]{1,6})?"),
    ) {
        let text = match &suffix {
            Some(s) => format!("{}.{}.{}-{s}", t.0, t.1, t.2),
            None => format!("{}.{}.{}", t.0, t.1, t.2),
        };
        let parsed = AllowlistVersion::parse(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }
}

proptest! {
    /// The parsed and the string-level emergency checks never disagree.
    #[test]
    fn emergency_rules_agree(suffix in "[a-z]{0,4}(-?emergency)?-[a-z0-9]{0,4}") {
        let version = format!("1.0.0-{suffix}");
        if let Ok(parsed) = AllowlistVersion::parse(&version) {
            prop_assert_eq!(parsed.is_emergency(), is_emergency_version(&version));
        }
    }
}
