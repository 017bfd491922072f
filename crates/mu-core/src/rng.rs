//! Random number generation for the monster simulation
//!
//! Uses a seeded ChaCha RNG for reproducibility. Each simulation worker owns
//! its own generator; nothing in this crate shares one across threads.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Simulation random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Derive an independently seeded generator, e.g. one per worker thread.
    pub fn fork(&mut self) -> Self {
        let seed = self.rng.next_u64();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1
    ///
    /// Returns 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform roll in `min..=max`. Returns `min` when the range is empty.
    pub fn between(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Signed offset in `-range..range`. Returns 0 if range is 0.
    pub fn offset(&mut self, range: u8) -> i32 {
        if range == 0 {
            return 0;
        }
        let range = range as i32;
        self.rng.gen_range(-range..range)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true with probability percent/100
    pub fn percent(&mut self, percent: u32) -> bool {
        self.rn2(100) < percent
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.rn2(10);
            assert!(n < 10);
        }
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut rng = GameRng::new(42);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let n = rng.between(3, 6);
            assert!((3..=6).contains(&n));
            seen_min |= n == 3;
            seen_max |= n == 6;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_offset_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.offset(4);
            assert!((-4..4).contains(&n));
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
        }
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.seed(), fb.seed());
        assert_eq!(fa.rn2(1000), fb.rn2(1000));
    }

    #[test]
    fn test_zero_inputs() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.rn2(0), 0);
        assert_eq!(rng.offset(0), 0);
        assert_eq!(rng.between(5, 5), 5);
        assert_eq!(rng.between(9, 2), 9);
        assert!(rng.choose::<u8>(&[]).is_none());
    }
}
