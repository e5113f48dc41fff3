//! Noise generation module for terrain synthesis.
//!
//! A seeded 2D simplex field plus the octave summation built on top of it.

mod fractal;
mod simplex;

pub use fractal::{octave_offsets, sample_fractal_noise, FractalNoiseConfig};
pub use simplex::{PermutationTable, SimplexNoise, PERMUTATION_SIZE};
