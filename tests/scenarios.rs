//! End-to-end scenarios over the public API.

use glam::Vec2;
use hydroterrain::erosion::brush::{bilinear_deposit, erosion_kernel};
use hydroterrain::erosion::{Droplet, StepOutcome};
use hydroterrain::noise::octave_offsets;
use hydroterrain::{
    generate_heightmap, simulate_erosion, simulate_erosion_with_stats, ErosionConfig, ErosionStats,
    FractalNoiseConfig, HeightGrid, PermutationTable, SeededRandom, SequenceRandom, SimplexNoise,
};

fn fixed_table() -> PermutationTable {
    let mut values = [0u8; 256];
    for (i, v) in values.iter_mut().enumerate() {
        *v = ((i * 151 + 7) % 256) as u8;
    }
    PermutationTable::from_values(values)
}

#[test]
fn single_octave_grid_matches_direct_noise() {
    let noise = SimplexNoise::with_table(fixed_table());
    let config = FractalNoiseConfig {
        octaves: 1,
        persistence: 0.5,
        lacunarity: 2.0,
        weight: 1.0,
        scale: 1.0,
    };
    // 0.5 is the midpoint of [-weight, weight]: every offset is zero.
    let mut rng = SequenceRandom::constant(0.5);
    let grid = generate_heightmap(4, 4, &config, &noise, &mut rng);

    for y in 0..4u32 {
        for x in 0..4u32 {
            let expected = noise.noise(x as f64 / 4.0, y as f64 / 4.0) as f32;
            assert_eq!(grid.get_height(x, y), expected, "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn noise_is_deterministic_for_fixed_table() {
    let a = SimplexNoise::with_table(fixed_table());
    let b = SimplexNoise::with_table(fixed_table());
    for k in 0..100 {
        let (x, y) = (k as f64 * 0.731 - 20.0, k as f64 * -0.419 + 3.0);
        assert_eq!(a.noise(x, y), b.noise(x, y));
        assert!(a.noise(x, y).is_finite());
    }
}

#[test]
fn zero_iterations_leave_grid_untouched() {
    let mut rng = SeededRandom::new(2024);
    let noise = SimplexNoise::new(&mut rng);
    let mut grid = generate_heightmap(24, 24, &FractalNoiseConfig::default(), &noise, &mut rng);
    let before: Vec<u32> = grid.heights().iter().map(|h| h.to_bits()).collect();

    simulate_erosion(0, &mut grid, &ErosionConfig::default(), &mut rng);

    let after: Vec<u32> = grid.heights().iter().map(|h| h.to_bits()).collect();
    assert_eq!(before, after);
}

#[test]
fn droplet_on_flat_minimum_does_not_flow() {
    // A single droplet spawned at the centre of a flat 5x5 grid.
    let mut grid = HeightGrid::filled(5, 5, 0.0);
    let config = ErosionConfig {
        inertia: 0.0,
        ..Default::default()
    };
    let stats = simulate_erosion_with_stats(1, &mut grid, &config, &mut SequenceRandom::constant(0.5));

    assert_eq!(stats.droplets, 1);
    assert_eq!(stats.steps, 0);
    assert_eq!(stats.stopped_early, 1);
    assert_eq!(grid, HeightGrid::filled(5, 5, 0.0));
}

#[test]
fn edge_spawned_droplets_stop_instead_of_leaving_grid() {
    let mut rng = SeededRandom::new(31);
    let noise = SimplexNoise::new(&mut rng);
    let mut grid = generate_heightmap(12, 9, &FractalNoiseConfig::mountainous(), &noise, &mut rng);

    // Alternate spawns between the four corners of the spawn area.
    let mut spawns = SequenceRandom::new(vec![0.0, 0.0, 0.9999, 0.0, 0.0, 0.9999, 0.9999, 0.9999]);
    let config = ErosionConfig {
        inertia: 0.9,
        max_lifetime: 200,
        ..Default::default()
    };
    let stats = simulate_erosion_with_stats(400, &mut grid, &config, &mut spawns);

    assert_eq!(stats.droplets, 400);
    assert!(stats.stopped_early > 0, "some droplets should reach the edge");
    assert!(grid.heights().iter().all(|h| h.is_finite()));
}

#[test]
fn droplet_positions_stay_inside_flow_area() {
    let mut rng = SeededRandom::new(17);
    let noise = SimplexNoise::new(&mut rng);
    let mut grid = generate_heightmap(20, 20, &FractalNoiseConfig::default(), &noise, &mut rng);
    let config = ErosionConfig::default();
    let mut stats = ErosionStats::default();

    for _ in 0..100 {
        let mut droplet = Droplet::spawn(&grid, &config, &mut rng);
        for _ in 0..config.max_lifetime {
            if droplet.step(&mut grid, &config, &mut stats) == StepOutcome::Stopped {
                break;
            }
            let p = droplet.position;
            assert!(p.x >= 0.0 && p.x < 19.0 && p.y >= 0.0 && p.y < 19.0, "{:?}", p);
        }
    }
}

#[test]
fn brushes_conserve_the_moved_amount() {
    let grid = HeightGrid::new(32, 32);
    for (i, pos) in [Vec2::new(0.0, 0.0), Vec2::new(15.5, 7.25), Vec2::new(30.9, 30.9)]
        .into_iter()
        .enumerate()
    {
        let amount = 0.1 * (i + 1) as f32;
        let erode = erosion_kernel(&grid, pos, amount, 3);
        assert!((erode.total() + amount as f64).abs() < 1e-5);

        let deposit = bilinear_deposit(&grid, pos, amount);
        assert!((deposit.total() - amount as f64).abs() < 1e-6);
    }
}

#[test]
fn erosion_changes_terrain_and_tracks_mass() {
    let mut rng = SeededRandom::new(5150);
    let noise = SimplexNoise::new(&mut rng);
    let config = FractalNoiseConfig::default();
    let offsets = octave_offsets(&config, &mut rng);
    assert_eq!(offsets.len(), 16);

    let mut grid = generate_heightmap(64, 64, &config, &noise, &mut rng);
    let before = grid.clone();
    let mass0 = grid.total_mass();

    let stats = simulate_erosion_with_stats(2_000, &mut grid, &ErosionConfig::default(), &mut rng);

    assert_ne!(grid, before);
    assert!(stats.eroded > 0.0);
    let drift = (grid.total_mass() - mass0) - stats.net_mass_change();
    assert!(drift.abs() < 1e-3, "untracked mass change {}", drift);
}
