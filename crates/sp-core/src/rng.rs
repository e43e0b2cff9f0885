//! Deterministic per-attempt RNG for circuit generation.
//!
//! # Determinism strategy
//!
//! Every generation attempt gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (attempt * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive attempt numbers across the seed space.  Because
//! attempt `k` never depends on the RNG state left behind by attempt `k - 1`,
//! attempts can be evaluated in any order (or in parallel) and a given run
//! seed always accepts the same circuit.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Draw a run seed from OS entropy.
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// RNG owned by a single generation attempt.
pub struct AttemptRng(SmallRng);

impl AttemptRng {
    /// Seed deterministically from the run seed and an attempt number.
    pub fn new(run_seed: u64, attempt: u32) -> Self {
        let seed = run_seed ^ (attempt as u64).wrapping_mul(MIXING_CONSTANT);
        AttemptRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` if the slice is empty, any weight is negative or
    /// non-finite, or every weight is zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.0))
    }
}
