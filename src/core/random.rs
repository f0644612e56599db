/*!
 * Random Sources
 * Injectable randomness for block layout, collection and presentation values
 *
 * Everything random in the GC manager (block sizes and statuses, per-block
 * reclaim draws, simulated CPU impact) is drawn through [`RandomSource`] so
 * tests can pin the values. Production uses [`StdRandom`] seeded from OS
 * entropy.
 */

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random values
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[low, high]` (inclusive)
    fn next_in_range(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as f64 + 1.0;
        let offset = (self.next_unit() * span) as usize;
        low + offset.min(high - low)
    }

    /// Uniform float in `[low, high]`
    fn next_f32_in(&mut self, low: f32, high: f32) -> f32 {
        let value = low + (self.next_unit() as f32) * (high - low);
        value.clamp(low.min(high), high.max(low))
    }
}

/// Random source shared behind a lock by the engine
pub type SharedRandom = Mutex<Box<dyn RandomSource>>;

/// Standard PRNG backed random source
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_in_range(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed list of unit values in a loop
///
/// Useful in tests: `SequenceRandom::new(vec![0.0])` makes every probability
/// check succeed and every range draw return its lower bound.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self { values, cursor: 0 }
    }

    /// Always yields the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
