//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, TerrainConfig};
use crate::erosion::{simulate_erosion_with_stats, ErosionConfig};
use crate::noise::FractalNoiseConfig;
use crate::random::RandomSource;
use crate::terrain::{generate_heightmap, Terrain};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Initial heightmap generation from noise.
    Heightmap,
    /// Droplet-based hydraulic erosion.
    Erosion,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Erosion => "erosion",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the terrain in place, building on the stages before
/// it. All randomness is drawn from the shared stream passed to `execute`,
/// so the stage order fixes the draw order.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the terrain in place.
    fn execute(&self, terrain: &mut Terrain, rng: &mut dyn RandomSource) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard heightmap pipeline for `config`, with the erosion
    /// stage appended when `erode` is set.
    pub fn from_config(config: &TerrainConfig, erode: bool) -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(HeightmapStage::new(config.noise.clone()));
        if erode {
            pipeline.add_stage(ErosionStage::new(config.erosion.clone()));
        }
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given terrain.
    pub fn run(&self, terrain: &mut Terrain, rng: &mut dyn RandomSource) -> Result<(), PipelineError> {
        self.run_with_callbacks(terrain, rng, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to generate
    /// * `rng` - Random stream shared by every stage
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        terrain: &mut Terrain,
        rng: &mut dyn RandomSource,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            stage.execute(terrain, rng)?;
            completed.push(stage.id());
            info!(
                stage = stage.id().name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "stage complete"
            );

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Heightmap generation stage using fractal noise.
pub struct HeightmapStage {
    pub config: FractalNoiseConfig,
}

impl HeightmapStage {
    pub fn new(config: FractalNoiseConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, terrain: &mut Terrain, rng: &mut dyn RandomSource) -> Result<(), PipelineError> {
        self.config.validate()?;
        terrain.grid = generate_heightmap(
            terrain.width(),
            terrain.height(),
            &self.config,
            &terrain.noise,
            rng,
        );
        terrain.heightmap_summary = Some(terrain.grid.summary());
        Ok(())
    }
}

/// Hydraulic erosion stage: runs `config.iterations` droplets over the grid.
pub struct ErosionStage {
    pub config: ErosionConfig,
}

impl ErosionStage {
    pub fn new(config: ErosionConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, terrain: &mut Terrain, rng: &mut dyn RandomSource) -> Result<(), PipelineError> {
        self.config.validate()?;
        let stats =
            simulate_erosion_with_stats(self.config.iterations, &mut terrain.grid, &self.config, rng);
        if !terrain.grid.heights().iter().all(|h| h.is_finite()) {
            return Err(PipelineError::StageFailed(
                self.name().to_string(),
                "erosion produced non-finite heights".to_string(),
            ));
        }
        terrain.erosion_stats = Some(stats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{PermutationTable, SimplexNoise};
    use crate::random::SeededRandom;

    fn terrain(size: u32) -> Terrain {
        Terrain::new(size, size, SimplexNoise::with_table(PermutationTable::identity()))
    }

    fn quick_erosion() -> ErosionConfig {
        ErosionConfig {
            iterations: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(StageId::Heightmap.name(), "heightmap");
        assert_eq!(StageId::Erosion.name(), "erosion");
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(ErosionStage::new(quick_erosion()));

        let mut t = terrain(16);
        let err = pipeline.run(&mut t, &mut SeededRandom::new(1)).unwrap_err();
        assert!(matches!(err, PipelineError::MissingDependency(_, _)));
        assert!(!t.is_eroded());
    }

    #[test]
    fn test_full_pipeline() {
        let mut pipeline = Pipeline::new();
        pipeline
            .add_stage(HeightmapStage::new(FractalNoiseConfig::default()))
            .add_stage(ErosionStage::new(quick_erosion()));
        assert_eq!(pipeline.stage_count(), 2);

        let mut t = terrain(32);
        pipeline.run(&mut t, &mut SeededRandom::new(2)).unwrap();
        assert!(t.is_eroded());
        assert_eq!(t.erosion_stats.as_ref().unwrap().droplets, 100);
    }

    #[test]
    fn test_from_config_skips_erosion() {
        let config = TerrainConfig {
            width: 16,
            height: 16,
            erosion: quick_erosion(),
            ..Default::default()
        };
        assert_eq!(Pipeline::from_config(&config, true).stage_count(), 2);

        let pipeline = Pipeline::from_config(&config, false);
        assert_eq!(pipeline.stage_count(), 1);

        let mut t = terrain(16);
        pipeline.run(&mut t, &mut SeededRandom::new(5)).unwrap();
        assert!(!t.is_eroded());
        assert_eq!(t.heightmap_summary, Some(t.grid.summary()));
    }

    #[test]
    fn test_callbacks_fire_in_order() {
        let mut pipeline = Pipeline::new();
        pipeline
            .add_stage(HeightmapStage::new(FractalNoiseConfig::default()))
            .add_stage(ErosionStage::new(quick_erosion()));

        let mut events = Vec::new();
        let mut finished = Vec::new();
        let mut t = terrain(16);
        pipeline
            .run_with_callbacks(
                &mut t,
                &mut SeededRandom::new(3),
                |name, i, total| events.push((name.to_string(), i, total)),
                |name, _, _| finished.push(name.to_string()),
            )
            .unwrap();

        assert_eq!(
            events,
            vec![
                ("Heightmap Generation".to_string(), 0, 2),
                ("Hydraulic Erosion".to_string(), 1, 2),
            ]
        );
        assert_eq!(finished.len(), 2);
    }

    #[test]
    fn test_invalid_stage_config() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(HeightmapStage::new(FractalNoiseConfig {
            octaves: 0,
            ..Default::default()
        }));

        let mut t = terrain(8);
        let err = pipeline.run(&mut t, &mut SeededRandom::new(4)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
        assert!(err.to_string().starts_with("Invalid configuration:"));
    }
}
