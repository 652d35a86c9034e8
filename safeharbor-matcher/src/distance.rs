//! Edit distance for typo detection.
//!
//! Uses the optimal string alignment variant of Damerau-Levenshtein:
//! insertions, deletions, substitutions and adjacent transpositions each cost
//! one. Hosts are short, so a three-row dynamic program over chars is enough.

/// Returns the optimal string alignment distance between `a` and `b`.
#[must_use]
pub fn osa_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let width = b.len() + 1;
    let mut two_back: Vec<usize> = vec![0; width];
    let mut prev: Vec<usize> = (0..width).collect();
    let mut curr: Vec<usize> = vec![0; width];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(two_back[j - 2] + 1);
            }
            curr[j] = best;
        }
        std::mem::swap(&mut two_back, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Returns the distance if it is at most `max`, skipping the full
/// computation when the length difference alone already exceeds `max`.
#[must_use]
pub fn bounded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a.abs_diff(len_b) > max {
        return None;
    }
    let distance = osa_distance(a, b);
    (distance <= max).then_some(distance)
}
