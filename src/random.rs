use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// An explicit source of randomness handed to the evaluator, the search and the board generator.
///
/// Every rollout worker owns its own generator, derived from the caller's one with [`fork`](Self::fork)
/// before the work is dispatched, so a seeded run does not depend on thread scheduling.
pub trait RandomGenerator: Default + Send {
    /// Returns a non-negative pseudo-random number.
    fn next(&mut self) -> i32;

    /// Returns a number in `from..to`.
    fn next_range(&mut self, from: i32, to: i32) -> i32;

    /// Derives an independent generator from this one.
    fn fork(&mut self) -> Self;

    /// Shuffles `items` in place, picking each position uniformly from the not yet fixed tail.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        let n = items.len();
        for i in 0..n {
            let r = self.next_range(i as i32, n as i32) as usize;
            items.swap(i, r);
        }
    }
}

/// Generator backed by [`StdRng`]. Seeded from the OS unless [`seeded`](Self::seeded) is used.
pub struct StandardRandomGenerator {
    rng: StdRng,
}

impl Default for StandardRandomGenerator {
    fn default() -> Self {
        StandardRandomGenerator {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl StandardRandomGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomGenerator for StandardRandomGenerator {
    fn next(&mut self) -> i32 {
        self.rng.random_range(0..i32::MAX)
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        self.rng.random_range(from..to)
    }

    fn fork(&mut self) -> Self {
        Self::seeded(self.rng.random::<u64>())
    }
}

/// A small linear congruential generator. Fully deterministic, used for reproducible tests.
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next(&mut self) -> i32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as i32
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        (self.next() % (to - from)).abs() + from
    }

    fn fork(&mut self) -> Self {
        CustomNumberGenerator::new(self.next() as i64)
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self {
            seed: seed.rem_euclid(i32::MAX as i64),
        }
    }
}
