//! Multi-octave fractal sum of simplex noise.

use serde::{Deserialize, Serialize};

use super::simplex::SimplexNoise;
use crate::config::ConfigError;
use crate::random::RandomSource;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (at least 1).
    pub octaves: u32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude of the first octave. Also bounds the random octave offsets.
    pub weight: f32,
    /// Frequency of the first octave across the whole grid.
    pub scale: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 8,
            persistence: 0.5,
            lacunarity: 2.0,
            weight: 1.0,
            scale: 3.0,
        }
    }
}

impl FractalNoiseConfig {
    /// Few octaves, low frequency: broad, gentle relief.
    pub fn rolling_hills() -> Self {
        Self {
            octaves: 4,
            persistence: 0.4,
            lacunarity: 2.0,
            weight: 1.0,
            scale: 2.0,
        }
    }

    /// Many slowly decaying octaves: rugged ridges for the eroder to carve.
    pub fn mountainous() -> Self {
        Self {
            octaves: 10,
            persistence: 0.55,
            lacunarity: 2.1,
            weight: 1.5,
            scale: 4.0,
        }
    }

    /// Sum of all octave amplitudes, an upper bound on `|height| / max|noise|`.
    pub fn amplitude_sum(&self) -> f32 {
        let mut total = 0.0f32;
        let mut weight = self.weight;
        for _ in 0..self.octaves {
            total += weight.abs();
            weight *= self.persistence;
        }
        total
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::OutOfRange {
                field: "octaves",
                value: 0.0,
                expected: ">= 1",
            });
        }
        for (field, value) in [
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
            ("weight", self.weight),
            ("scale", self.scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        // Offsets are drawn from [-weight, weight]; that span must fit in f32.
        if !(2.0 * self.weight).is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "weight",
                value: self.weight as f64,
                expected: "|weight| <= f32::MAX / 2",
            });
        }
        Ok(())
    }
}

/// Draws `2 * octaves` offsets in `[-weight, weight]`, laid out as
/// `[x0, y0, x1, y1, ...]`.
///
/// Shifting each octave independently keeps their lattices from lining up.
pub fn octave_offsets(
    config: &FractalNoiseConfig,
    rng: &mut (impl RandomSource + ?Sized),
) -> Vec<f32> {
    (0..config.octaves * 2)
        .map(|_| rng.range(-config.weight, config.weight))
        .collect()
}

/// Samples the fractal sum at normalized grid coordinates `(u, v)`.
///
/// `u = x / width` and `v = y / height`. `offsets` must hold at least
/// `2 * octaves` values, as produced by [`octave_offsets`].
///
/// No normalization is applied: the output range scales with `weight`,
/// `persistence` and `octaves`.
pub fn sample_fractal_noise(
    noise: &SimplexNoise,
    offsets: &[f32],
    u: f64,
    v: f64,
    config: &FractalNoiseConfig,
) -> f64 {
    debug_assert!(offsets.len() >= config.octaves as usize * 2);

    let mut total = 0.0f64;
    let mut weight = config.weight as f64;
    let mut scale = config.scale as f64;

    for octave in 0..config.octaves as usize {
        let ox = offsets[octave * 2] as f64;
        let oy = offsets[octave * 2 + 1] as f64;
        total += weight * noise.noise(ox + u * scale, oy + v * scale);
        weight *= config.persistence as f64;
        scale *= config.lacunarity as f64;
    }

    total
}
