//! hydroterrain CLI - generate and erode a heightmap, then report on it.
//!
//! The terrain is kept in memory; the command prints a summary of the
//! generated field and the erosion run.

use clap::{Parser, Subcommand, ValueEnum};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use hydroterrain::pipeline::Pipeline;
use hydroterrain::terrain::{GridSummary, Terrain};
use hydroterrain::{Preset, TerrainConfig};

/// Procedural heightmap generator with hydraulic erosion.
#[derive(Parser)]
#[command(name = "hydroterrain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a heightmap, erode it, and print a summary.
    Generate {
        /// Grid width in cells.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Grid height in cells.
        #[arg(long, default_value = "512")]
        height: u32,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parameter preset the remaining flags override.
        #[arg(short, long, default_value = "default")]
        preset: PresetArg,

        #[command(flatten)]
        noise: NoiseArgs,

        #[command(flatten)]
        erosion: ErosionArgs,

        /// Skip the erosion stage.
        #[arg(long)]
        skip_erosion: bool,
    },

    /// Print the resolved configuration for a preset.
    Info {
        #[arg(short, long, default_value = "default")]
        preset: PresetArg,
    },
}

#[derive(clap::Args)]
struct NoiseArgs {
    /// Number of noise octaves.
    #[arg(long)]
    octaves: Option<u32>,

    /// Amplitude decay per octave.
    #[arg(long)]
    persistence: Option<f32>,

    /// Frequency multiplier per octave.
    #[arg(long)]
    lacunarity: Option<f32>,

    /// Amplitude of the first octave.
    #[arg(long)]
    weight: Option<f32>,

    /// Frequency of the first octave across the grid.
    #[arg(long)]
    scale: Option<f32>,
}

#[derive(clap::Args)]
struct ErosionArgs {
    /// Number of droplets.
    #[arg(long)]
    iterations: Option<u32>,

    /// Sediment capacity factor.
    #[arg(long)]
    capacity: Option<f32>,

    /// Erosion brush radius in cells.
    #[arg(long)]
    radius: Option<u32>,

    /// Minimum slope used for capacity on flats.
    #[arg(long)]
    min_slope: Option<f32>,

    /// Direction inertia (0-1).
    #[arg(long)]
    inertia: Option<f32>,

    /// Erosion speed (0-1).
    #[arg(long)]
    erode_speed: Option<f32>,

    /// Deposition speed (0-1).
    #[arg(long)]
    deposit_speed: Option<f32>,

    /// Gravity.
    #[arg(long)]
    gravity: Option<f32>,

    /// Maximum droplet lifetime in steps.
    #[arg(long)]
    max_lifetime: Option<u32>,

    /// Initial droplet water volume.
    #[arg(long)]
    initial_volume: Option<f32>,

    /// Initial droplet speed.
    #[arg(long)]
    initial_velocity: Option<f32>,

    /// Evaporation per step (0-1).
    #[arg(long)]
    evaporate_speed: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Default,
    RollingHills,
    Mountainous,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Preset::Default,
            PresetArg::RollingHills => Preset::RollingHills,
            PresetArg::Mountainous => Preset::Mountainous,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            height,
            seed,
            preset,
            noise,
            erosion,
            skip_erosion,
        } => {
            let mut config = TerrainConfig::from_preset(preset.into());
            config.width = width;
            config.height = height;
            config.seed = seed;
            apply_overrides(&mut config, &noise, &erosion);
            run_generate(config, skip_erosion);
        }
        Commands::Info { preset } => {
            run_info(preset.into());
        }
    }
}

fn apply_overrides(config: &mut TerrainConfig, noise: &NoiseArgs, erosion: &ErosionArgs) {
    let n = &mut config.noise;
    if let Some(v) = noise.octaves {
        n.octaves = v;
    }
    if let Some(v) = noise.persistence {
        n.persistence = v;
    }
    if let Some(v) = noise.lacunarity {
        n.lacunarity = v;
    }
    if let Some(v) = noise.weight {
        n.weight = v;
    }
    if let Some(v) = noise.scale {
        n.scale = v;
    }

    let e = &mut config.erosion;
    if let Some(v) = erosion.iterations {
        e.iterations = v;
    }
    if let Some(v) = erosion.capacity {
        e.capacity = v;
    }
    if let Some(v) = erosion.radius {
        e.radius = v;
    }
    if let Some(v) = erosion.min_slope {
        e.min_slope = v;
    }
    if let Some(v) = erosion.inertia {
        e.inertia = v;
    }
    if let Some(v) = erosion.erode_speed {
        e.erode_speed = v;
    }
    if let Some(v) = erosion.deposit_speed {
        e.deposit_speed = v;
    }
    if let Some(v) = erosion.gravity {
        e.gravity = v;
    }
    if let Some(v) = erosion.max_lifetime {
        e.max_lifetime = v;
    }
    if let Some(v) = erosion.initial_volume {
        e.initial_volume = v;
    }
    if let Some(v) = erosion.initial_velocity {
        e.initial_velocity = v;
    }
    if let Some(v) = erosion.evaporate_speed {
        e.evaporate_speed = v;
    }
}

fn run_generate(config: TerrainConfig, skip_erosion: bool) {
    let (mut terrain, mut rng) = Terrain::seeded(&config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("hydroterrain - Heightmap Generator");
    println!("==================================");
    println!("Size: {}x{}", config.width, config.height);
    if let Some(seed) = terrain.seed {
        println!("Seed: {}", seed);
    }

    let start = Instant::now();

    println!("\nRunning generation pipeline...");
    if skip_erosion {
        println!("Erosion: SKIPPED");
    } else {
        println!("Erosion enabled: {} droplets", config.erosion.iterations);
    }

    Pipeline::from_config(&config, !skip_erosion)
        .run_with_callbacks(
            &mut terrain,
            &mut rng,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });

    if let Some(summary) = &terrain.heightmap_summary {
        println!("\nHeightmap ({} octaves):", config.noise.octaves);
        print_summary(summary);
    }

    if let Some(stats) = &terrain.erosion_stats {
        let after = terrain.grid.summary();
        println!("\nAfter erosion ({} droplets):", stats.droplets);
        print_summary(&after);
        println!("  Mean lifetime: {:.2} steps", stats.mean_lifetime());
        println!(
            "  Stopped early: {} ({:.1}%)",
            stats.stopped_early,
            100.0 * stats.stopped_early as f64 / stats.droplets.max(1) as f64
        );
        println!("  Eroded: {:.6}", stats.eroded);
        println!("  Deposited: {:.6}", stats.deposited);
        if let Some(before) = &terrain.heightmap_summary {
            println!("  Mass change: {:.6}", after.mass - before.mass);
        }
        if stats.clamped_velocity_steps > 0 {
            println!(
                "  Velocity clamped on {} steps (gravity {} may be too high)",
                stats.clamped_velocity_steps, config.erosion.gravity
            );
        }
    }

    println!("\nDone in {:.2?}", start.elapsed());
}

fn print_summary(summary: &GridSummary) {
    println!("  Height range: [{:.4}, {:.4}]", summary.min, summary.max);
    println!("  Mean height: {:.4}", summary.mean);
}

fn run_info(preset: Preset) {
    let config = TerrainConfig::from_preset(preset);

    println!("Preset: {:?}", preset);
    let cells = config.width as u64 * config.height as u64;
    println!("Grid: {}x{} ({} cells)", config.width, config.height, cells);
    println!("\nNoise:");
    println!("  Octaves: {}", config.noise.octaves);
    println!("  Persistence: {}", config.noise.persistence);
    println!("  Lacunarity: {}", config.noise.lacunarity);
    println!("  Weight: {}", config.noise.weight);
    println!("  Scale: {}", config.noise.scale);
    println!("  Amplitude sum: {:.4}", config.noise.amplitude_sum());
    println!("\nErosion:");
    println!("  {:#?}", config.erosion);
}
