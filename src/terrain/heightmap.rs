//! Heightmap generation using fractal noise.

use rayon::prelude::*;
use tracing::debug;

use super::grid::HeightGrid;
use crate::noise::{octave_offsets, sample_fractal_noise, FractalNoiseConfig, SimplexNoise};
use crate::random::RandomSource;

/// Generates a `width x height` heightmap from fractal simplex noise.
///
/// Draws one random offset pair per octave from `rng`, then evaluates every
/// cell. Output is unnormalized; its range follows from `weight`,
/// `persistence` and `octaves`.
///
/// # Panics
/// Panics if either dimension is below 2.
pub fn generate_heightmap(
    width: u32,
    height: u32,
    config: &FractalNoiseConfig,
    noise: &SimplexNoise,
    rng: &mut (impl RandomSource + ?Sized),
) -> HeightGrid {
    let offsets = octave_offsets(config, rng);
    generate_heightmap_with_offsets(width, height, config, noise, &offsets)
}

/// Generates a heightmap with caller-supplied octave offsets.
///
/// Cells are independent once the offsets are fixed, so they are evaluated
/// in parallel; the result is identical to a sequential pass.
///
/// # Panics
/// Panics if either dimension is below 2 or `offsets` holds fewer than
/// `2 * octaves` values.
pub fn generate_heightmap_with_offsets(
    width: u32,
    height: u32,
    config: &FractalNoiseConfig,
    noise: &SimplexNoise,
    offsets: &[f32],
) -> HeightGrid {
    assert!(
        offsets.len() >= config.octaves as usize * 2,
        "need 2 offsets per octave, got {} for {} octaves",
        offsets.len(),
        config.octaves
    );

    let mut grid = HeightGrid::new(width, height);
    let w = width as usize;

    grid.heights_mut()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, cell)| {
            let x = i % w;
            let y = i / w;
            let u = x as f64 / width as f64;
            let v = y as f64 / height as f64;
            *cell = sample_fractal_noise(noise, offsets, u, v, config) as f32;
        });

    let (min, max) = grid.height_range();
    debug!(width, height, octaves = config.octaves, min, max, "heightmap generated");

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::PermutationTable;
    use crate::random::SeededRandom;

    #[test]
    fn test_generate_heightmap() {
        let mut rng = SeededRandom::new(42);
        let noise = SimplexNoise::new(&mut rng);
        let config = FractalNoiseConfig::default();

        let grid = generate_heightmap(64, 48, &config, &noise, &mut rng);

        assert_eq!(grid.cell_count(), 64 * 48);
        assert!(
            grid.heights().iter().any(|&h| h != 0.0),
            "Heightmap should have non-zero values"
        );
        assert!(grid.heights().iter().all(|h| h.is_finite()));

        let bound = config.amplitude_sum() * 0.2;
        let (min, max) = grid.height_range();
        assert!(min >= -bound && max <= bound, "range ({}, {}) exceeds {}", min, max, bound);
    }

    #[test]
    fn test_heightmap_reproducibility() {
        let config = FractalNoiseConfig::default();

        let mut rng1 = SeededRandom::new(999);
        let noise1 = SimplexNoise::new(&mut rng1);
        let grid1 = generate_heightmap(32, 32, &config, &noise1, &mut rng1);

        let mut rng2 = SeededRandom::new(999);
        let noise2 = SimplexNoise::new(&mut rng2);
        let grid2 = generate_heightmap(32, 32, &config, &noise2, &mut rng2);

        assert_eq!(grid1, grid2, "Same seed should produce identical heights");
    }

    #[test]
    fn test_different_offsets_differ() {
        let noise = SimplexNoise::with_table(PermutationTable::identity());
        let config = FractalNoiseConfig {
            octaves: 1,
            ..Default::default()
        };
        let a = generate_heightmap_with_offsets(16, 16, &config, &noise, &[0.0, 0.0]);
        let b = generate_heightmap_with_offsets(16, 16, &config, &noise, &[0.37, -0.21]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_sequential_evaluation() {
        let noise = SimplexNoise::new(&mut SeededRandom::new(13));
        let config = FractalNoiseConfig {
            octaves: 3,
            ..Default::default()
        };
        let offsets = vec![0.2, -0.4, 0.6, 0.1, -0.9, 0.5];
        let grid = generate_heightmap_with_offsets(7, 5, &config, &noise, &offsets);

        for (x, y) in grid.cell_coords() {
            let expected =
                sample_fractal_noise(&noise, &offsets, x as f64 / 7.0, y as f64 / 5.0, &config) as f32;
            assert_eq!(grid.get_height(x, y), expected);
        }
    }

    #[test]
    #[should_panic]
    fn test_missing_offsets_panics() {
        let noise = SimplexNoise::with_table(PermutationTable::identity());
        let config = FractalNoiseConfig {
            octaves: 2,
            ..Default::default()
        };
        generate_heightmap_with_offsets(4, 4, &config, &noise, &[0.0, 0.0]);
    }
}
