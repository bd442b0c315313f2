//! Round-robin pairing, including every player against itself
//!
//! Matches are enumerated in lexicographic order over pairs `(a, b)` with
//! `a <= b`: `(0,0), (0,1), .., (0,n-1), (1,1), ..`. Any match can be looked
//! up by index without materializing the schedule.

/// Number of matches for `n` players: `n(n+1)/2`
pub fn match_count(participant_count: usize) -> usize {
    participant_count * (participant_count + 1) / 2
}

/// All pairings in schedule order
pub fn generate_all_pairings(participant_count: usize) -> Vec<(usize, usize)> {
    let n = participant_count;
    (0..n).flat_map(|a| (a..n).map(move |b| (a, b))).collect()
}

/// Pairing at `match_index` in schedule order — O(1), no allocation
pub fn pairing_for_match(participant_count: usize, match_index: usize) -> Option<(usize, usize)> {
    let n = participant_count;
    let total = match_count(n);
    if match_index >= total {
        return None;
    }

    // Counting from the back turns the schedule into colex order over
    // mirrored indices, which unranks in closed form.
    let (a_rev, b_rev) = unrank_pair(total - 1 - match_index);
    Some((n - 1 - b_rev, n - 1 - a_rev))
}

/// Position of `(a, b)` in the schedule, with the pair in either order
pub fn match_index(participant_count: usize, a: usize, b: usize) -> Option<usize> {
    let n = participant_count;
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    if b >= n {
        return None;
    }
    // Rows before `a` hold n, n-1, .., n-a+1 matches
    Some(a * n - a * a.saturating_sub(1) / 2 + (b - a))
}

/// Integer floor square root (Newton's method)
fn isqrt_floor(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Colex unranking with repetition: rank → (a, b) with a <= b.
///
/// rank = b*(b+1)/2 + a
fn unrank_pair(rank: usize) -> (usize, usize) {
    let r = rank as u64;
    let mut b = (isqrt_floor(8 * r + 1) - 1) / 2;

    // Correct estimate
    while b > 0 && b * (b + 1) / 2 > r {
        b -= 1;
    }
    while (b + 1) * (b + 2) / 2 <= r {
        b += 1;
    }

    let a = r - b * (b + 1) / 2;
    (a as usize, b as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_tournament() {
        assert_eq!(match_count(0), 0);
        assert!(generate_all_pairings(0).is_empty());
        assert_eq!(pairing_for_match(0, 0), None);
    }

    #[test]
    fn test_single_player_plays_itself() {
        assert_eq!(generate_all_pairings(1), vec![(0, 0)]);
        assert_eq!(pairing_for_match(1, 0), Some((0, 0)));
        assert_eq!(pairing_for_match(1, 1), None);
    }

    #[test]
    fn test_three_player_order() {
        assert_eq!(
            generate_all_pairings(3),
            vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn test_self_pairs_appear_once() {
        let pairings = generate_all_pairings(7);
        for p in 0..7 {
            assert_eq!(pairings.iter().filter(|&&(a, b)| a == p && b == p).count(), 1);
        }
    }

    #[test]
    fn test_no_duplicate_pairings() {
        let pairings = generate_all_pairings(12);
        let unique: HashSet<_> = pairings.iter().collect();
        assert_eq!(unique.len(), pairings.len());
        assert_eq!(pairings.len(), match_count(12));
    }

    #[test]
    fn test_isqrt_floor() {
        assert_eq!(isqrt_floor(0), 0);
        assert_eq!(isqrt_floor(1), 1);
        assert_eq!(isqrt_floor(8), 2);
        assert_eq!(isqrt_floor(9), 3);
        assert_eq!(isqrt_floor(10), 3);
        assert_eq!(isqrt_floor(1 << 40), 1 << 20);
    }

    #[test]
    fn test_unrank_pair_covers_all() {
        let mut rank = 0;
        for b in 0..30 {
            for a in 0..=b {
                assert_eq!(unrank_pair(rank), (a, b));
                rank += 1;
            }
        }
    }

    proptest! {
        #[test]
        fn prop_lookup_matches_enumeration(n in 0usize..60) {
            let pairings = generate_all_pairings(n);
            for (i, pair) in pairings.iter().enumerate() {
                prop_assert_eq!(pairing_for_match(n, i), Some(*pair));
                prop_assert_eq!(match_index(n, pair.0, pair.1), Some(i));
                prop_assert_eq!(match_index(n, pair.1, pair.0), Some(i));
            }
            prop_assert_eq!(pairing_for_match(n, pairings.len()), None);
        }
    }
}
