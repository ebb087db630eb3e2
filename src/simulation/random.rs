//! Pseudo-random draws for truck traffic
//!
//! Order arrivals and order service are deterministic; only truck inter-arrival jitter
//! and dock service durations are random. All of those draws go through one
//! `RandomSource` per simulator so a caller can pin the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::types::UniformRange;

/// Seedable source of uniform draws
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Create a source from an optional seed; `None` seeds from OS entropy
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            info!("Using deterministic seed: {}", seed);
            StdRng::seed_from_u64(seed)
        } else {
            debug!("Using entropy-based random seed");
            StdRng::from_entropy()
        };
        Self { rng, seed }
    }

    /// Create a reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self::from_seed(Some(seed))
    }

    /// Create a non-reproducible source
    pub fn from_entropy() -> Self {
        Self::from_seed(None)
    }

    /// Seed this source was built from, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw uniformly from `[range.low, range.high]`
    pub fn sample(&mut self, range: UniformRange) -> f64 {
        if range.low >= range.high {
            return range.low;
        }
        self.rng.gen_range(range.low..=range.high)
    }

    /// Nominal interval stretched or shrunk by a jitter factor drawn from `jitter`
    pub fn jittered(&mut self, nominal_min: f64, jitter: UniformRange) -> f64 {
        nominal_min * self.sample(jitter)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
