//! Seeded level assignment.
//!
//! Levels follow `floor(-ln(U) * mL)` with `U` uniform on `(0, 1]` and
//! `mL = 1 / ln(M)`, so each level is roughly `M` times rarer than the one
//! below.
//!
//! The n-th level is a pure function of `(seed, n)`: draw `n` reseeds a
//! `StdRng` from the seed mixed with `n`. The generator state is therefore
//! just the seed and a draw counter, both persisted by the binary format,
//! and a deserialized index resumes the exact stream in O(1).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest level a node can be assigned.
pub const MAX_LEVEL: usize = 16;

/// Odd 64-bit constant (golden ratio) spreading draw indices across seeds.
const DRAW_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator {
    seed: u64,
    draws: u64,
    level_mult: f64,
}

impl LevelGenerator {
    /// Builds a generator positioned after `draws` levels (0 for a fresh one).
    pub(crate) fn resume(seed: u64, draws: u64, level_mult: f64) -> Self {
        Self {
            seed,
            draws,
            level_mult,
        }
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn draws(&self) -> u64 {
        self.draws
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn next_level(&mut self) -> usize {
        let mut rng =
            StdRng::seed_from_u64(self.seed ^ self.draws.wrapping_add(1).wrapping_mul(DRAW_STRIDE));
        self.draws += 1;

        // gen::<f64>() is [0, 1); flip it so ln() never sees 0
        let uniform = 1.0 - rng.gen::<f64>();
        let level = (-uniform.ln() * self.level_mult).floor() as usize;
        level.min(MAX_LEVEL)
    }
}
