use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform real stream feeding every Monte Carlo decision in the renderer.
///
/// Backed by `SmallRng` (xoshiro256++ on 64-bit targets, period 2²⁵⁶−1).
/// Two draws are consumed per sub-pixel jitter and per direction sample, so a
/// fixed seed reproduces the exact pixmap bytes of a previous run.
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform real in [0, 1).
    pub fn real01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
