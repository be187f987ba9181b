//! Piece source
//!
//! Every kind is equally likely on every draw. A seeded ChaCha stream makes
//! a session's piece sequence reproducible.

use crate::tetromino::{TetrominoType, random_kind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Uniform random piece generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Randomizer {
    /// Create a randomizer with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next piece kind
    pub fn next(&mut self) -> TetrominoType {
        random_kind(&mut self.rng)
    }
}
