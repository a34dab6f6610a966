//! Per-row random streams.
//!
//! Every image row gets its own generator derived from the render seed and
//! the row index, so the output does not depend on how rows are spread over
//! worker threads.

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Generator used for all sampling decisions.
pub type SampleRng = Xoshiro256StarStar;

/// Identifies one independent stream.
#[derive(Debug, Copy, Clone, Hash)]
pub struct StreamSeed {
    pub seed: u64,
    pub row: u32,
}

impl StreamSeed {
    pub fn new(seed: u64, row: u32) -> Self {
        Self { seed, row }
    }

    /// Build the generator for this stream.
    pub fn into_rng(self) -> SampleRng {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        SampleRng::seed_from_u64(hasher.finish())
    }
}

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen()
}
