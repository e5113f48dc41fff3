//! Dense row-major elevation grid.

use serde::{Deserialize, Serialize};

/// A `width x height` field of elevations stored in row-major order
/// (`index = y * width + x`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightGrid {
    width: u32,
    height: u32,
    heights: Vec<f32>,
}

/// Elevation statistics of a grid at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Sum of all elevations.
    pub mass: f64,
}

impl HeightGrid {
    /// Creates a grid with every elevation set to `0.0`.
    ///
    /// # Panics
    /// Panics if either dimension is below 2; erosion sampling always reads
    /// one cell past the current index.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a grid with every elevation set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        assert!(width >= 2 && height >= 2, "grid must be at least 2x2");
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            heights: vec![value; size],
        }
    }

    /// Wraps existing row-major elevations.
    ///
    /// # Panics
    /// Panics if a dimension is below 2 or `heights.len() != width * height`.
    pub fn from_heights(width: u32, height: u32, heights: Vec<f32>) -> Self {
        assert!(width >= 2 && height >= 2, "grid must be at least 2x2");
        assert_eq!(heights.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            heights,
        }
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let i = grid.index(x, y);
                grid.heights[i] = f(x, y);
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Returns the height at the given cell.
    ///
    /// # Panics
    /// Panics if x or y is out of bounds.
    #[inline]
    pub fn get_height(&self, x: u32, y: u32) -> f32 {
        self.heights[self.index(x, y)]
    }

    /// Sets the height at the given cell.
    ///
    /// # Panics
    /// Panics if x or y is out of bounds.
    #[inline]
    pub fn set_height(&mut self, x: u32, y: u32, height: f32) {
        let i = self.index(x, y);
        self.heights[i] = height;
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    /// Consumes the grid, returning the flat elevation buffer.
    pub fn into_heights(self) -> Vec<f32> {
        self.heights
    }

    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().cloned().fold(f32::MAX, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights.iter().cloned().fold(f32::MIN, f32::max)
    }

    /// Returns (min, max) elevation.
    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height(), self.max_height())
    }

    /// Sum of all elevations, accumulated in f64.
    pub fn total_mass(&self) -> f64 {
        self.heights.iter().map(|&h| h as f64).sum()
    }

    pub fn mean_height(&self) -> f32 {
        (self.total_mass() / self.heights.len() as f64) as f32
    }

    pub fn summary(&self) -> GridSummary {
        let (min, max) = self.height_range();
        GridSummary {
            min,
            max,
            mean: self.mean_height(),
            mass: self.total_mass(),
        }
    }

    /// Returns an iterator over all (x, y) cell coordinates in storage order.
    pub fn cell_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = HeightGrid::new(8, 4);
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.cell_count(), 32);
        assert!(grid.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_summary_matches_accessors() {
        let grid = HeightGrid::from_heights(2, 2, vec![1.0, -1.0, 3.0, 1.0]);
        let summary = grid.summary();
        assert_eq!((summary.min, summary.max), (-1.0, 3.0));
        assert_eq!(summary.mean, 1.0);
        assert_eq!(summary.mass, 4.0);
    }

    #[test]
    #[should_panic]
    fn test_grid_too_small_panics() {
        HeightGrid::new(1, 8);
    }

    #[test]
    #[should_panic]
    fn test_from_heights_length_mismatch_panics() {
        HeightGrid::from_heights(3, 3, vec![0.0; 8]);
    }

    #[test]
    fn test_row_major_indexing() {
        let mut grid = HeightGrid::new(5, 3);
        grid.set_height(4, 2, 1.25);
        assert_eq!(grid.index(4, 2), 14);
        assert_eq!(grid.heights()[14], 1.25);
        assert_eq!(grid.get_height(4, 2), 1.25);
    }

    #[test]
    fn test_from_fn() {
        let grid = HeightGrid::from_fn(3, 2, |x, y| (x + 10 * y) as f32);
        assert_eq!(grid.heights(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_height_statistics() {
        let mut grid = HeightGrid::new(4, 4);
        grid.set_height(0, 0, -0.5);
        grid.set_height(3, 3, 1.5);

        assert_eq!(grid.height_range(), (-0.5, 1.5));
        assert!((grid.total_mass() - 1.0).abs() < 1e-9);
        assert!((grid.mean_height() - 1.0 / 16.0).abs() < 1e-7);
    }

    #[test]
    fn test_cell_coords_iterator() {
        let grid = HeightGrid::new(4, 2);
        let coords: Vec<_> = grid.cell_coords().collect();

        assert_eq!(coords.len(), 8);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (1, 0));
        assert_eq!(coords[4], (0, 1));
        assert_eq!(coords[7], (3, 1));
    }
}
