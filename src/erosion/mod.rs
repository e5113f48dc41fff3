//! Hydraulic erosion.
//!
//! A droplet-based model: each droplet samples the interpolated surface,
//! moves one cell-length downhill, and trades height with the grid through
//! the brushes in [`brush`].

pub mod brush;
mod config;
mod hydraulic;

pub use config::ErosionConfig;
pub use hydraulic::{
    simulate_erosion, simulate_erosion_with_stats, update_velocity, Droplet, ErosionStats,
    StepOutcome,
};
