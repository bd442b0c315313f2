//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible tournaments and baseline players.
//! Uses a simple but effective xorshift algorithm.

/// Seeded random number generator
///
/// Deterministic: same seed + stream = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and stream index
    pub fn new(seed: &[u8; 32], stream: u32) -> Self {
        // Combine seed bytes into initial state
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        // Mix in stream index
        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Create a new RNG from a plain integer seed (stream 0)
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.chunks_mut(8).enumerate() {
            let word =
                seed.rotate_left(16 * i as u32) ^ (i as u64).wrapping_mul(0x2545f4914f6cdd1d);
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self::new(&bytes, 0)
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate a float in [0, 1) with 53 bits of precision
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }

    /// Fair coin flip
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Number of Bernoulli trials up to and including the first success,
    /// where each trial succeeds with probability `p`.
    ///
    /// Always at least 1. Uses inversion: `floor(ln U / ln(1 - p)) + 1`
    /// with `U` drawn from (0, 1]. `ln(1 - p)` is taken as `ln_1p(-p)` so
    /// tiny probabilities do not round to `ln(1) = 0`. Callers must pass
    /// `p` in (0, 1].
    pub fn next_geometric(&mut self, p: f64) -> usize {
        debug_assert!(p > 0.0 && p <= 1.0, "geometric probability {} outside (0, 1]", p);
        if p >= 1.0 {
            // Still consume a draw so the stream position does not depend on p
            self.next_u64();
            return 1;
        }
        let u = 1.0 - self.next_f64();
        let failures = (u.ln() / (-p).ln_1p()).floor();
        if failures.is_finite() && failures >= 0.0 {
            (failures as usize).saturating_add(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_determinism() {
        let seed = [42u8; 32];
        let rng1 = SeededRng::new(&seed, 0);
        let rng2 = SeededRng::new(&seed, 0);

        let mut r1 = rng1.clone();
        let mut r2 = rng2.clone();

        for _ in 0..100 {
            assert_eq!(r1.next_u64(), r2.next_u64());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SeededRng::from_u64(1);
        let mut rng2 = SeededRng::from_u64(2);

        let vals1: Vec<_> = (0..10).map(|_| rng1.next_u64()).collect();
        let vals2: Vec<_> = (0..10).map(|_| rng2.next_u64()).collect();

        assert_ne!(vals1, vals2);
    }

    #[test]
    fn test_zero_seed_is_not_stuck() {
        let mut rng = SeededRng::new(&[0u8; 32], 0);
        let vals: Vec<_> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(vals.iter().any(|v| *v != 0));
        assert_ne!(vals[0], vals[1]);
    }

    #[test]
    fn test_different_stream_index() {
        let seed = [42u8; 32];

        let mut rng1 = SeededRng::new(&seed, 0);
        let mut rng2 = SeededRng::new(&seed, 1);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::from_u64(7);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_next_range() {
        let mut rng = SeededRng::from_u64(42);

        for max in [1usize, 2, 10, 1000].iter() {
            for _ in 0..100 {
                let val = rng.next_range(*max);
                assert!(val < *max, "next_range({}) returned {}", max, val);
            }
        }

        // Edge case: max = 0
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_next_bool_hits_both() {
        let mut rng = SeededRng::from_u64(3);
        let heads = (0..200).filter(|_| rng.next_bool()).count();
        assert!(heads > 50 && heads < 150, "heads = {}", heads);
    }

    #[test]
    fn test_geometric_certain_end_is_one() {
        let mut rng = SeededRng::from_u64(11);
        for _ in 0..50 {
            assert_eq!(rng.next_geometric(1.0), 1);
        }
    }

    #[test]
    fn test_geometric_mean() {
        let mut rng = SeededRng::from_u64(99);
        let samples = 5000;
        let total: usize = (0..samples).map(|_| rng.next_geometric(0.2)).sum();
        let avg = total as f64 / samples as f64;
        // Expected is 1 / p = 5
        assert!(avg > 4.5 && avg < 5.5, "average {} not ~5", avg);
    }

    #[test]
    fn test_geometric_tiny_probability_is_not_one() {
        let mut rng = SeededRng::from_u64(5);
        for _ in 0..10 {
            let draw = rng.next_geometric(1e-17);
            assert!(draw > 1, "draw {} at p = 1e-17", draw);
        }
    }

    #[test]
    fn test_geometric_small_probability_mean() {
        let mut rng = SeededRng::from_u64(21);
        let samples = 2000;
        let p = 1e-12;
        let total: f64 = (0..samples).map(|_| rng.next_geometric(p) as f64).sum();
        let avg = total / samples as f64;
        // Expected is 1 / p = 1e12, standard error about 2%
        let relative = (avg * p - 1.0).abs();
        assert!(relative < 0.1, "average {} not ~1e12", avg);
    }

    #[test]
    fn test_geometric_matches_inversion_formula() {
        let p = 1e-12;
        let mut rng = SeededRng::from_u64(8);
        let mut shadow = rng.clone();
        for _ in 0..100 {
            let u = 1.0 - shadow.next_f64();
            let expected = (u.ln() / -p).floor() as usize + 1;
            let draw = rng.next_geometric(p);
            let diff = (draw as f64 - expected as f64).abs();
            assert!(diff <= 1e-9 * expected as f64 + 1.0, "draw {} vs {}", draw, expected);
        }
    }

    proptest! {
        #[test]
        fn prop_geometric_at_least_one(seed in any::<u64>(), p in 0.001f64..=1.0) {
            let mut rng = SeededRng::from_u64(seed);
            for _ in 0..20 {
                prop_assert!(rng.next_geometric(p) >= 1);
            }
        }
    }
}
