//! Terrain data and heightmap synthesis.
//!
//! Provides the `HeightGrid` elevation buffer shared by every stage, the
//! fractal-noise generator that fills it, and the `Terrain` state the
//! pipeline operates on.

mod grid;
mod heightmap;
mod state;

pub use grid::{GridSummary, HeightGrid};
pub use heightmap::{generate_heightmap, generate_heightmap_with_offsets};
pub use state::Terrain;
