//! Randomness seam for the steal protocol.
//!
//! Injected at construction so tests can force draws; the probability
//! arithmetic itself lives in `grange_core::steal_math` and stays pure.

use rand::Rng;

/// Source of the protocol's two uniform draws.
pub trait Dice: Send + Sync {
    /// Uniform draw in `[0, 100)`; success iff it lands below the rate.
    fn success_roll(&self) -> f64;

    /// Uniform draw in the configured `[lo, hi]` yield band.
    fn yield_factor(&self, lo: f64, hi: f64) -> f64;
}

/// Thread-RNG based dice used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn success_roll(&self) -> f64 {
        rand::rng().random_range(0.0..100.0)
    }

    fn yield_factor(&self, lo: f64, hi: f64) -> f64 {
        rand::rng().random_range(lo..=hi)
    }
}

/// Deterministic dice for tests: a fixed roll and a fixed yield factor.
#[derive(Debug, Clone, Copy)]
pub struct FixedDice {
    pub roll: f64,
    pub factor: f64,
}

impl Dice for FixedDice {
    fn success_roll(&self) -> f64 {
        self.roll
    }

    fn yield_factor(&self, _lo: f64, _hi: f64) -> f64 {
        self.factor
    }
}
