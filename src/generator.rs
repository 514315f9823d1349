//! Random piece generator
//!
//! Every piece is an independent uniform pick among the 7 shapes. There is
//! no bag, so repeats and droughts are possible.

use crate::piece::Piece;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seedable source of new pieces
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: ChaCha8Rng,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Create a generator seeded from the thread RNG
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a generator with a fixed seed (for reproducible games)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Produce the next piece, anchored at (0, 0)
    pub fn generate(&mut self) -> Piece {
        Piece::random(&mut self.rng)
    }
}
