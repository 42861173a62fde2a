use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Uniform sampler backed by a seeded generator, so a seed fully determines the layout.
#[derive(Clone, Debug)]
pub struct RandomSampler {
    rng: SmallRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn sample(&mut self, candidates: &[CellCount], amount: usize) -> Vec<CellCount> {
        let amount = amount.min(candidates.len());
        rand::seq::index::sample(&mut self.rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i])
            .collect()
    }
}
