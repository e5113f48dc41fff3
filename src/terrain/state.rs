//! Terrain state threaded through the generation pipeline.

use super::grid::{GridSummary, HeightGrid};
use crate::config::TerrainConfig;
use crate::erosion::ErosionStats;
use crate::noise::SimplexNoise;
use crate::pipeline::{Pipeline, PipelineError};
use crate::random::SeededRandom;

/// A terrain under construction: the elevation grid plus the noise field it
/// was sampled from.
#[derive(Debug, Clone)]
pub struct Terrain {
    /// Seed the run was started from, if it was seeded.
    pub seed: Option<u64>,
    /// Noise field used by the heightmap stage.
    pub noise: SimplexNoise,
    /// Elevations. All zero until the heightmap stage runs.
    pub grid: HeightGrid,
    /// Grid statistics as the heightmap stage left them, before erosion.
    pub heightmap_summary: Option<GridSummary>,
    /// Counters from the erosion stage (populated after erosion).
    pub erosion_stats: Option<ErosionStats>,
}

impl Terrain {
    /// Creates a flat terrain over the given noise field.
    ///
    /// # Panics
    /// Panics if either dimension is below 2.
    pub fn new(width: u32, height: u32, noise: SimplexNoise) -> Self {
        Self {
            seed: None,
            noise,
            grid: HeightGrid::new(width, height),
            heightmap_summary: None,
            erosion_stats: None,
        }
    }

    /// Validates `config` and sets up a flat terrain plus the random stream
    /// that every stage draws from.
    ///
    /// A single ChaCha stream seeded from `config.seed` (or from entropy)
    /// feeds, in order, the permutation table, the octave offsets and every
    /// droplet spawn. The returned terrain records the seed actually used.
    pub fn seeded(config: &TerrainConfig) -> Result<(Self, SeededRandom), PipelineError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let noise = SimplexNoise::new(&mut rng);

        let mut terrain = Self::new(config.width, config.height, noise);
        terrain.seed = Some(rng.seed());
        Ok((terrain, rng))
    }

    /// Generates and erodes a terrain from a full configuration.
    pub fn generate(config: &TerrainConfig) -> Result<Self, PipelineError> {
        let (mut terrain, mut rng) = Self::seeded(config)?;
        Pipeline::from_config(config, true).run(&mut terrain, &mut rng)?;
        Ok(terrain)
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Returns true if the erosion stage has run.
    pub fn is_eroded(&self) -> bool {
        self.erosion_stats.is_some()
    }
}
