//! Particle-based hydraulic erosion.
//!
//! Droplets are spawned one at a time at random positions and flow downhill,
//! picking up sediment where they accelerate and dropping it where they slow
//! down or climb. Droplets run strictly in spawn order: each one sees every
//! change made by the ones before it, so the result cannot be reproduced by
//! simulating droplets in parallel.

use glam::Vec2;
use tracing::{debug, warn};

use super::brush::{bilinear_deposit, erosion_kernel, sample_height, sample_surface};
use super::ErosionConfig;
use crate::random::RandomSource;
use crate::terrain::HeightGrid;

/// Aggregate counters for one erosion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErosionStats {
    /// Droplets simulated.
    pub droplets: u32,
    /// Flowing steps taken across all droplets.
    pub steps: u64,
    /// Droplets that stopped before reaching `max_lifetime`.
    pub stopped_early: u32,
    /// Total height removed from the grid.
    pub eroded: f64,
    /// Total height added to the grid.
    pub deposited: f64,
    /// Steps whose velocity radicand went negative and was clamped to zero.
    pub clamped_velocity_steps: u64,
}

impl ErosionStats {
    /// Net change in total grid elevation.
    pub fn net_mass_change(&self) -> f64 {
        self.deposited - self.eroded
    }

    /// Mean number of flowing steps per droplet.
    pub fn mean_lifetime(&self) -> f64 {
        if self.droplets == 0 {
            0.0
        } else {
            self.steps as f64 / self.droplets as f64
        }
    }
}

/// Result of advancing a droplet by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The droplet moved and may continue.
    Flowing,
    /// The droplet hit a flat spot or the grid edge; nothing was changed.
    Stopped,
}

/// A single water particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Droplet {
    /// Continuous position in grid space.
    pub position: Vec2,
    /// Unit direction of the last move, or zero before the first.
    pub direction: Vec2,
    pub velocity: f32,
    pub water: f32,
    pub sediment: f32,
}

impl Droplet {
    /// Creates a droplet at `position` with the configured initial state.
    pub fn new(position: Vec2, config: &ErosionConfig) -> Self {
        Self {
            position,
            direction: Vec2::ZERO,
            velocity: config.initial_velocity,
            water: config.initial_volume,
            sediment: 0.0,
        }
    }

    /// Spawns a droplet uniformly in `[0, width-1) x [0, height-1)`.
    pub fn spawn(
        grid: &HeightGrid,
        config: &ErosionConfig,
        rng: &mut (impl RandomSource + ?Sized),
    ) -> Self {
        let x = rng.next((grid.width() - 1) as f32);
        let y = rng.next((grid.height() - 1) as f32);
        Self::new(Vec2::new(x, y), config)
    }

    /// Advances the droplet by one cell-length, eroding or depositing.
    pub fn step(
        &mut self,
        grid: &mut HeightGrid,
        config: &ErosionConfig,
        stats: &mut ErosionStats,
    ) -> StepOutcome {
        let old_pos = self.position;
        let surface = sample_surface(grid, old_pos);

        let direction = (self.direction * config.inertia
            - surface.gradient * (1.0 - config.inertia))
            .normalize_or_zero();
        let new_pos = old_pos + direction;

        if direction == Vec2::ZERO || !in_flow_bounds(grid, new_pos) {
            return StepOutcome::Stopped;
        }

        self.direction = direction;
        self.position = new_pos;

        let height_diff = sample_height(grid, new_pos) - surface.height;
        let capacity = (-height_diff).max(config.min_slope)
            * self.velocity
            * self.water
            * config.capacity;

        if self.sediment > capacity || height_diff > 0.0 {
            let amount = if height_diff > 0.0 {
                height_diff.min(self.sediment)
            } else {
                (self.sediment - capacity) * config.deposit_speed
            };
            if amount != 0.0 {
                bilinear_deposit(grid, old_pos, amount).apply(grid);
                self.sediment -= amount;
                stats.deposited += amount as f64;
            }
        } else {
            let amount = ((capacity - self.sediment) * config.erode_speed).min(-height_diff);
            if amount != 0.0 {
                erosion_kernel(grid, new_pos, amount, config.radius).apply(grid);
                self.sediment += amount;
                stats.eroded += amount as f64;
            }
        }

        let (velocity, clamped) = update_velocity(self.velocity, height_diff, config.gravity);
        if clamped {
            stats.clamped_velocity_steps += 1;
        }
        self.velocity = velocity;
        self.water *= 1.0 - config.evaporate_speed;

        StepOutcome::Flowing
    }

    /// Runs the droplet until it stops or exhausts `max_lifetime`.
    ///
    /// Returns the number of flowing steps taken.
    pub fn run(
        &mut self,
        grid: &mut HeightGrid,
        config: &ErosionConfig,
        stats: &mut ErosionStats,
    ) -> u32 {
        let mut steps = 0;
        while steps < config.max_lifetime {
            if self.step(grid, config, stats) == StepOutcome::Stopped {
                stats.stopped_early += 1;
                break;
            }
            steps += 1;
        }
        stats.droplets += 1;
        stats.steps += steps as u64;
        steps
    }
}

/// Positions a droplet may occupy: `[0, width-1) x [0, height-1)`.
fn in_flow_bounds(grid: &HeightGrid, pos: Vec2) -> bool {
    pos.x >= 0.0
        && pos.y >= 0.0
        && pos.x < (grid.width() - 1) as f32
        && pos.y < (grid.height() - 1) as f32
}

/// Returns `sqrt(velocity^2 + height_diff * gravity)` and whether the
/// radicand had to be clamped at zero.
///
/// A negative radicand means the configuration lets a droplet climb further
/// than its kinetic energy allows; the droplet is brought to rest rather than
/// producing NaN.
pub fn update_velocity(velocity: f32, height_diff: f32, gravity: f32) -> (f32, bool) {
    let radicand = velocity * velocity + height_diff * gravity;
    if radicand < 0.0 {
        (0.0, true)
    } else {
        (radicand.sqrt(), false)
    }
}

/// Erodes `grid` in place with `iterations` sequential droplets.
///
/// # Panics
/// Panics if `grid` is smaller than 2x2 (which `HeightGrid` already forbids).
pub fn simulate_erosion(
    iterations: u32,
    grid: &mut HeightGrid,
    config: &ErosionConfig,
    rng: &mut (impl RandomSource + ?Sized),
) {
    simulate_erosion_with_stats(iterations, grid, config, rng);
}

/// Same as [`simulate_erosion`], returning run counters.
pub fn simulate_erosion_with_stats(
    iterations: u32,
    grid: &mut HeightGrid,
    config: &ErosionConfig,
    rng: &mut (impl RandomSource + ?Sized),
) -> ErosionStats {
    assert!(grid.width() >= 2 && grid.height() >= 2);

    let mut stats = ErosionStats::default();
    for _ in 0..iterations {
        let mut droplet = Droplet::spawn(grid, config, rng);
        droplet.run(grid, config, &mut stats);
    }

    if stats.clamped_velocity_steps > 0 {
        warn!(
            clamped = stats.clamped_velocity_steps,
            gravity = config.gravity,
            "droplet velocity radicand went negative; consider lowering gravity"
        );
    }
    debug!(
        droplets = stats.droplets,
        steps = stats.steps,
        stopped_early = stats.stopped_early,
        eroded = stats.eroded,
        deposited = stats.deposited,
        "erosion finished"
    );

    stats
}
