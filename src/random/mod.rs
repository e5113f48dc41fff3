//! Pseudo-random sources for terrain synthesis and droplet spawning.
//!
//! Every consumer of randomness in this crate takes a `&mut impl RandomSource`
//! (or `&mut dyn RandomSource`) rather than reaching for a thread-local RNG,
//! so a run is fully reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform random numbers.
pub trait RandomSource {
    /// Returns a float uniformly distributed in `[0, max)`.
    ///
    /// Returns `0.0` when `max <= 0`.
    fn next(&mut self, max: f32) -> f32;

    /// Returns a float uniformly distributed in `[min, max]`.
    ///
    /// # Panics
    /// May panic if either bound is non-finite or `max - min` overflows
    /// `f32`. Configs that pass `validate` never produce such bounds.
    fn range(&mut self, min: f32, max: f32) -> f32;

    /// Returns an integer uniformly distributed in `[0, max)`, or `0` when `max == 0`.
    fn next_int(&mut self, max: u32) -> u32;
}

/// ChaCha8-backed random source, reproducible from a 64-bit seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source from a freshly drawn seed.
    ///
    /// The drawn seed is kept so the run can be reported and replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random::<u64>())
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(0.0..max)
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        debug_assert!(
            (hi - lo).is_finite(),
            "range bounds [{}, {}] must be finite with a finite span",
            lo,
            hi
        );
        self.rng.random_range(lo..=hi)
    }

    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.rng.random_range(0..max)
    }
}

/// Replays a fixed, cycling sequence of unit fractions in `[0, 1)`.
///
/// Each call consumes one fraction `t` and maps it onto the requested
/// interval (`next(max) = t * max`, `range(min, max) = min + t * (max - min)`).
/// Used to script spawn positions and octave offsets.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    /// Creates a sequence source.
    ///
    /// # Panics
    /// Panics if `values` is empty or contains a value outside `[0, 1)`.
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "sequence must not be empty");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "sequence values must lie in [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same fraction.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    fn advance(&mut self) -> f32 {
        let t = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        t
    }
}

impl RandomSource for SequenceRandom {
    fn next(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.advance() * max
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.advance() * (max - min)
    }

    fn next_int(&mut self, max: u32) -> u32 {
        ((self.advance() * max as f32) as u32).min(max.saturating_sub(1))
    }
}
