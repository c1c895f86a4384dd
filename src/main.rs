//! Stable Fluids CLI - Run a fluid scenario from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use stable_fluids::{
    compute::{FluidSolver, FluidStats},
    schema::{FluidConfig, Scenario},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a stable-fluids simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to solver configuration file");
        eprintln!("  steps        Number of simulation steps (default: 100)");
        eprintln!();
        eprintln!("Input is read from <config>.scenario.json when present.");
        eprintln!("Example files are printed with the --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = FluidConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // Load or create scenario
    let scenario_path = config_path.with_extension("scenario.json");
    let scenario: Scenario = if scenario_path.exists() {
        let scenario_str = fs::read_to_string(&scenario_path).unwrap_or_else(|e| {
            eprintln!("Error reading scenario file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&scenario_str).unwrap_or_else(|e| {
            eprintln!("Error parsing scenario: {}", e);
            std::process::exit(1);
        })
    } else {
        log::info!("No scenario at {}, using default", scenario_path.display());
        Scenario::default()
    };

    println!("Stable Fluids Simulation");
    println!("========================");
    println!("Grid: {}x{}", config.size, config.size);
    println!("dt: {}", config.dt);
    println!("Diffusion: {}, viscosity: {}", config.diffusion, config.viscosity);
    println!("Relaxation: {:?}", config.relaxation);
    println!("Steps: {}", steps);
    println!();

    let mut solver = FluidSolver::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = scenario.apply_setup(&mut solver) {
        eprintln!("Error applying scenario setup: {}", e);
        std::process::exit(1);
    }

    let initial_stats = FluidStats::from_solver(&solver);
    println!("Initial state:");
    print_stats(&initial_stats);
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        if let Err(e) = scenario.apply_step(&mut solver, i) {
            eprintln!("Error applying scenario at step {}: {}", i, e);
            std::process::exit(1);
        }
        solver.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = FluidStats::from_solver(&solver);
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: density={:.4}, max speed={:.4}, max div={:.2e}, {:.1} steps/s",
                i + 1,
                steps,
                stats.total_density,
                stats.max_speed,
                stats.max_divergence,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = FluidStats::from_solver(&solver);

    println!();
    println!("Final state:");
    print_stats(&final_stats);
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_stats(stats: &FluidStats) {
    println!("  Total density: {:.6}", stats.total_density);
    println!(
        "  Density range: [{:.6}, {:.6}]",
        stats.min_density, stats.max_density
    );
    println!("  Visible cells: {}", stats.visible_cells);
    println!("  Obstacle cells: {}", stats.obstacle_cells);
    println!("  Max speed: {:.6}", stats.max_speed);
    println!("  Max divergence: {:.3e}", stats.max_divergence);
}

fn print_example_config() {
    let config = FluidConfig::default();
    let scenario = Scenario::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example scenario (config.scenario.json):");
    println!("{}", serde_json::to_string_pretty(&scenario).unwrap());
}
