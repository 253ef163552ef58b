use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::classification::domain::score_jitter::ScoreJitter;

/// Uniform jitter from a seedable PRNG.
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ScoreJitter for RandomJitter {
    fn next(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
