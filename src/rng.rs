//! Random sources for reel draws.
//!
//! Reels only need a uniform integer over a tiny range, so the trait is
//! deliberately small. [`SeededRandom`] is the production generator and
//! [`ScriptedRandom`] replays a fixed sequence for tests and demos.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A reseedable uniform integer generator.
pub trait RandomSource {
    /// Draw a uniform integer in `min..=max`.
    ///
    /// If `min > max` the bounds are swapped.
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;

    /// Reseed the generator. `None` seeds from the current time.
    fn reseed(&mut self, seed: Option<u64>);
}

/// Seed derived from the system time, used when no explicit seed is given.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Production random source backed by a small, fast PRNG.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    /// Underlying generator.
    rng: SmallRng,
    /// Seed the generator was last seeded with.
    seed: u64,
}

impl SeededRandom {
    /// Create a generator. `None` seeds from the current time.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(time_seed);
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed in use, for reproducing a session.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RandomSource for SeededRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.gen_range(lo..=hi)
    }

    fn reseed(&mut self, seed: Option<u64>) {
        *self = Self::new(seed);
    }
}

/// Replays a fixed sequence of draws, cycling when it runs out.
///
/// Each value is clamped into the requested range, so a script written for
/// symbol indices can never produce an out-of-range draw.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    /// Values to replay.
    values: Vec<i32>,
    /// Index of the next value.
    cursor: usize,
}

impl ScriptedRandom {
    /// Create a script from a sequence of values.
    #[must_use]
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws made so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if self.values.is_empty() {
            return lo;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(lo, hi)
    }

    fn reseed(&mut self, _seed: Option<u64>) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = SeededRandom::new(Some(7));
        let mut b = SeededRandom::new(Some(7));
        let xs: Vec<i32> = (0..32).map(|_| a.uniform_int(0, 5)).collect();
        let ys: Vec<i32> = (0..32).map(|_| b.uniform_int(0, 5)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_seeded_stays_in_range() {
        let mut rng = SeededRandom::new(Some(1));
        for _ in 0..1000 {
            let v = rng.uniform_int(0, 5);
            assert!((0..=5).contains(&v));
        }
    }

    #[test]
    fn test_seeded_reaches_both_bounds() {
        let mut rng = SeededRandom::new(Some(3));
        let draws: Vec<i32> = (0..1000).map(|_| rng.uniform_int(0, 5)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&5));
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = SeededRandom::new(Some(9));
        let first: Vec<i32> = (0..8).map(|_| rng.uniform_int(0, 5)).collect();
        rng.reseed(Some(9));
        let second: Vec<i32> = (0..8).map(|_| rng.uniform_int(0, 5)).collect();
        assert_eq!(first, second);
        assert_eq!(rng.seed(), 9);
    }

    #[test]
    fn test_swapped_bounds() {
        let mut rng = SeededRandom::new(Some(5));
        let v = rng.uniform_int(5, 0);
        assert!((0..=5).contains(&v));
    }

    #[test]
    fn test_scripted_cycles_and_clamps() {
        let mut rng = ScriptedRandom::new([1, 9, -3]);
        assert_eq!(rng.uniform_int(0, 5), 1);
        assert_eq!(rng.uniform_int(0, 5), 5);
        assert_eq!(rng.uniform_int(0, 5), 0);
        assert_eq!(rng.uniform_int(0, 5), 1);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_scripted_empty_returns_min() {
        let mut rng = ScriptedRandom::default();
        assert_eq!(rng.uniform_int(2, 4), 2);
    }
}
