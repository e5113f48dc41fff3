//! Grid sampling and mutation for the droplet model.
//!
//! Every read that touches a neighbouring cell and every write a droplet
//! makes goes through this module. Writes are first computed as a
//! [`GridDelta`] against an immutable grid and only then committed, so the
//! bounds policy lives in one place and can be tested on its own.

use glam::Vec2;

use crate::terrain::HeightGrid;

/// Interpolated surface state at a continuous position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub height: f32,
    pub gradient: Vec2,
}

/// Integer cell plus fractional offsets of a continuous position.
///
/// The cell is clamped to `[0, width-2] x [0, height-2]` so its
/// `(x+1, y+1)` corner always exists.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    x: u32,
    y: u32,
    u: f32,
    v: f32,
}

impl Cell {
    fn locate(grid: &HeightGrid, pos: Vec2) -> Self {
        let max_x = grid.width() - 2;
        let max_y = grid.height() - 2;
        let x = (pos.x.max(0.0) as u32).min(max_x);
        let y = (pos.y.max(0.0) as u32).min(max_y);
        Self {
            x,
            y,
            u: (pos.x - x as f32).clamp(0.0, 1.0),
            v: (pos.y - y as f32).clamp(0.0, 1.0),
        }
    }

    /// Bilinear weights for (center, right, below, diagonal).
    fn weights(&self) -> [f32; 4] {
        let (u, v) = (self.u, self.v);
        [
            (1.0 - u) * (1.0 - v),
            u * (1.0 - v),
            (1.0 - u) * v,
            u * v,
        ]
    }

    fn corners(&self) -> [(u32, u32); 4] {
        [
            (self.x, self.y),
            (self.x + 1, self.y),
            (self.x, self.y + 1),
            (self.x + 1, self.y + 1),
        ]
    }
}

/// Forward-difference gradient at a grid node.
///
/// At the last column/row the "next" sample is clamped to the node itself,
/// giving a zero component on that axis.
fn node_gradient(grid: &HeightGrid, x: u32, y: u32) -> Vec2 {
    let h = grid.get_height(x, y);
    let right = if x + 1 < grid.width() { x + 1 } else { x };
    let below = if y + 1 < grid.height() { y + 1 } else { y };
    Vec2::new(grid.get_height(right, y) - h, grid.get_height(x, below) - h)
}

/// Bilinearly interpolated height and gradient at `pos`.
pub fn sample_surface(grid: &HeightGrid, pos: Vec2) -> SurfaceSample {
    let cell = Cell::locate(grid, pos);
    let mut height = 0.0;
    let mut gradient = Vec2::ZERO;
    for (w, (x, y)) in cell.weights().into_iter().zip(cell.corners()) {
        height += w * grid.get_height(x, y);
        gradient += w * node_gradient(grid, x, y);
    }
    SurfaceSample { height, gradient }
}

/// Bilinearly interpolated height at `pos`.
pub fn sample_height(grid: &HeightGrid, pos: Vec2) -> f32 {
    let cell = Cell::locate(grid, pos);
    cell.weights()
        .into_iter()
        .zip(cell.corners())
        .map(|(w, (x, y))| w * grid.get_height(x, y))
        .sum()
}

/// A set of per-cell height changes, not yet applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridDelta {
    changes: Vec<(usize, f32)>,
}

impl GridDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, delta: f32) {
        self.changes.push((index, delta));
    }

    pub fn changes(&self) -> &[(usize, f32)] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Net height change, accumulated in f64.
    pub fn total(&self) -> f64 {
        self.changes.iter().map(|&(_, d)| d as f64).sum()
    }

    /// Adds every change to `grid`.
    ///
    /// # Panics
    /// Panics if an index lies outside the grid.
    pub fn apply(&self, grid: &mut HeightGrid) {
        let heights = grid.heights_mut();
        for &(i, d) in &self.changes {
            heights[i] += d;
        }
    }
}

/// Spreads `amount` onto the four corners of the cell containing `pos`,
/// weighted bilinearly. The increments sum to `amount`.
pub fn bilinear_deposit(grid: &HeightGrid, pos: Vec2, amount: f32) -> GridDelta {
    let cell = Cell::locate(grid, pos);
    let mut delta = GridDelta::new();
    for (w, (x, y)) in cell.weights().into_iter().zip(cell.corners()) {
        delta.push(grid.index(x, y), amount * w);
    }
    delta
}

/// Removes `amount` from the cells within `radius` of `pos`.
///
/// Each cell is weighted by `max(0, radius - distance)`; weights are
/// normalized to sum to one over the part of the brush that lies inside the
/// grid, so the decrements sum to `amount`. When no cell gets a positive
/// weight (`radius == 0`) the whole amount comes from the nearest cell.
pub fn erosion_kernel(grid: &HeightGrid, pos: Vec2, amount: f32, radius: u32) -> GridDelta {
    let r = radius as i64;
    let cx = pos.x.max(0.0) as i64;
    let cy = pos.y.max(0.0) as i64;

    let x_start = (cx - r).max(0);
    let y_start = (cy - r).max(0);
    let x_end = (cx + r + 1).min(grid.width() as i64);
    let y_end = (cy + r + 1).min(grid.height() as i64);

    let mut weighted: Vec<(usize, f32)> = Vec::new();
    let mut weight_sum = 0.0f32;
    for y in y_start..y_end {
        for x in x_start..x_end {
            let distance = Vec2::new(x as f32, y as f32).distance(pos);
            let weight = (radius as f32 - distance).max(0.0);
            if weight > 0.0 {
                weighted.push((grid.index(x as u32, y as u32), weight));
                weight_sum += weight;
            }
        }
    }

    let mut delta = GridDelta::new();
    if weight_sum > 0.0 {
        for (i, w) in weighted {
            delta.push(i, -amount * (w / weight_sum));
        }
    } else {
        let x = (pos.x.round().max(0.0) as u32).min(grid.width() - 1);
        let y = (pos.y.round().max(0.0) as u32).min(grid.height() - 1);
        delta.push(grid.index(x, y), -amount);
    }
    delta
}
