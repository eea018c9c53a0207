//! Randomness behind the exploratory skill score, injectable so tests stay deterministic.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest boost the exploratory skill score may receive.
pub const DEFAULT_JITTER_MAX: f64 = 20.0;

/// Source of the exploratory score boost.
///
/// Carried as `Arc<dyn JitterSource>` so the service can run on a thread RNG
/// while tests and reproducible demos use a fixed or seeded source.
pub trait JitterSource: Send + Sync {
    /// Returns a value in `[0, max)`, or `0.0` when `max` is not a positive finite number.
    fn sample(&self, max: f64) -> f64;
}

/// Fresh randomness on every call.
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn sample(&self, max: f64) -> f64 {
        if !usable(max) {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..max)
    }
}

/// Reproducible sequence from a fixed seed.
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&self, max: f64) -> f64 {
        if !usable(max) {
            return 0.0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0.0..max)
    }
}

/// `gen_range` panics on an empty or non-finite range.
fn usable(max: f64) -> bool {
    max.is_finite() && max > 0.0
}

/// Always the same boost (capped at `max`). `FixedJitter(0.0)` disables jitter.
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self, max: f64) -> f64 {
        if !usable(max) || !self.0.is_finite() {
            return 0.0;
        }
        self.0.clamp(0.0, max)
    }
}
