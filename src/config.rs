//! Run-level configuration and validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::ErosionConfig;
use crate::noise::FractalNoiseConfig;

/// Errors raised when a configuration cannot produce a well-defined run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("'{field}' = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("'{field}' must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("grid must be at least 2x2, got {width}x{height}")]
    GridTooSmall { width: u32, height: u32 },
}

/// Named parameter sets for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    #[default]
    Default,
    RollingHills,
    Mountainous,
}

/// Everything needed to produce one eroded terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Master seed. `None` draws one from entropy.
    pub seed: Option<u64>,
    pub noise: FractalNoiseConfig,
    pub erosion: ErosionConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: None,
            noise: FractalNoiseConfig::default(),
            erosion: ErosionConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Builds the configuration for a preset at the default resolution.
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self::default(),
            Preset::RollingHills => Self {
                noise: FractalNoiseConfig::rolling_hills(),
                erosion: ErosionConfig::gentle(),
                ..Default::default()
            },
            Preset::Mountainous => Self {
                noise: FractalNoiseConfig::mountainous(),
                erosion: ErosionConfig::aggressive(),
                ..Default::default()
            },
        }
    }

    /// Returns the same configuration with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks grid size plus both stage configurations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        self.noise.validate()?;
        self.erosion.validate()
    }
}
