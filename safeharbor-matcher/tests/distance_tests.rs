use proptest::prelude::*;
use safeharbor_matcher::{bounded_distance, osa_distance};

#[test]
fn identical_strings() {
    assert_eq!(osa_distance("rainn.org", "rainn.org"), 0);
}

#[test]
fn empty_inputs() {
    assert_eq!(osa_distance("", "abc"), 3);
    assert_eq!(osa_distance("abc", ""), 3);
    assert_eq!(osa_distance("", ""), 0);
}

#[test]
fn single_edits_cost_one() {
    assert_eq!(osa_distance("988lifeline.org", "988lifecline.org"), 1); // insertion
    assert_eq!(osa_distance("988lifeline.org", "988lifline.org"), 1); // deletion
    assert_eq!(osa_distance("988lifeline.org", "988lifelime.org"), 1); // substitution
    assert_eq!(osa_distance("988lifeline.org", "988lifelien.org"), 1); // transposition
}

#[test]
fn plain_levenshtein_would_charge_two_for_a_swap() {
    assert_eq!(osa_distance("thehotline.org", "tehhotline.org"), 1);
}

#[test]
fn bounded_skips_large_length_gaps() {
    assert_eq!(bounded_distance("a.org", "much-longer-domain.org", 2), None);
    assert_eq!(bounded_distance("rainn.org", "rain.org", 1), Some(1));
    assert_eq!(bounded_distance("rainn.org", "brain.com", 1), None);
}

proptest! {
    /// Distance is symmetric.
    #[test]
    fn symmetric(a in "[a-z0-9.]{0,16}", b in "[a-z0-9.]{0,16}") {
        prop_assert_eq!(osa_distance(&a, &b), osa_distance(&b, &a));
    }

    /// Distance is zero exactly for equal strings.
    #[test]
    fn zero_iff_equal(a in "[a-z0-9.]{0,16}", b in "[a-z0-9.]{0,16}") {
        prop_assert_eq!(osa_distance(&a, &b) == 0, a == b);
    }

    /// Distance never exceeds the longer length and is at least the length gap.
    #[test]
    fn within_length_bounds(a in "[a-z0-9.]{0,16}", b in "[a-z0-9.]{0,16}") {
        let d = osa_distance(&a, &b);
        prop_assert!(d <= a.len().max(b.len()));
        prop_assert!(d >= a.len().abs_diff(b.len()));
    }

    /// The bounded variant agrees with the full computation.
    #[test]
    fn bounded_agrees(a in "[a-z]{0,12}", b in "[a-z]{0,12}", max in 0usize..4) {
        let full = osa_distance(&a, &b);
        let expected = (full <= max).then_some(full);
        prop_assert_eq!(bounded_distance(&a, &b, max), expected);
    }
}
