//! Procedural terrain heightmaps with particle-based hydraulic erosion.
//!
//! This crate synthesizes an elevation grid from fractal simplex noise and
//! then carves it with simulated water droplets. The output is a plain
//! row-major `f32` height field that any mesh builder or renderer can consume.

pub mod config;
pub mod erosion;
pub mod noise;
pub mod pipeline;
pub mod random;
pub mod terrain;

pub use config::{ConfigError, Preset, TerrainConfig};
pub use erosion::{simulate_erosion, simulate_erosion_with_stats, ErosionConfig, ErosionStats};
pub use noise::{FractalNoiseConfig, PermutationTable, SimplexNoise};
pub use pipeline::{ErosionStage, GenerationStage, HeightmapStage, Pipeline, PipelineError, StageId};
pub use random::{RandomSource, SeededRandom, SequenceRandom};
pub use terrain::{generate_heightmap, GridSummary, HeightGrid, Terrain};
