// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/baseline.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/baseline.yaml --seed 42

use std::env;
use std::fs;
use std::path::Path;

use log::LevelFilter;
use selfsim::ss_config::ScenarioFile;
use selfsim::ss_export::{event_sink_for, write_run_outputs};
use selfsim::{SimError, SimulationManager, SimulatorConfig};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed N]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/baseline.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/baseline.yaml --seed 42", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<u64> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        if let Err(e) = run_scenario_file(path, seed) {
            eprintln!("Scenario {} failed: {}", path.display(), e);
            std::process::exit(1);
        }
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<u64>) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str());
            if ext == Some("yaml") || ext == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                  ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    let mut failed = 0;
    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        if let Err(e) = run_scenario_file(scenario_path, seed) {
            eprintln!("Scenario {} failed: {}", scenario_path.display(), e);
            failed += 1;
        }
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete! ({} failed)", failed);
    println!("╚════════════════════════════════════════════════════════╝\n");

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_scenario_file(path: &Path, seed: Option<u64>) -> Result<(), SimError> {
    println!("Loading scenario from: {}", path.display());

    let scenario = ScenarioFile::load(path)?;

    // Print scenario header
    println!("\n╔════════════════════════════════════════════════════════╗");
    match scenario.meta.name {
        Some(ref name) => println!("║  {}", name),
        None => println!(
            "║  Scenario: {}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or("?")
        ),
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    let mut config = scenario.into_config()?;
    if let Some(seed) = seed {
        config.seed = seed;
    }

    print_configuration(&config);
    println!("\nStarting simulation...\n");

    let sink = event_sink_for(&config.output)?;
    let mut manager = SimulationManager::from_config(&config)?.with_sink(sink);
    let summary = manager.run(config.total_time)?;

    summary.print_summary();
    write_run_outputs(&config.output, manager.recorder().points(), &summary)?;

    println!("\n✓ Scenario complete!\n");
    Ok(())
}

fn print_configuration(config: &SimulatorConfig) {
    println!("Configuration:");
    println!("  Model: {}", config.model);
    println!("  Total Time: {}", config.total_time);
    println!("  Sources: {} (rate {} while ON)", config.num_sources, config.on_rate);
    println!("  ON:  alpha={} xm={}", config.alpha_on, config.xm_on);
    println!("  OFF: alpha={} xm={}", config.alpha_off, config.xm_off);
    println!("  Hurst (target): {}", config.hurst);
    println!(
        "  Queue: capacity={} service_rate={}",
        config.queue.capacity, config.queue.service_rate
    );
    println!("  Sampling: {:?}", config.sampling);
    println!("  Seed: {}", config.seed);
}

fn parse_seed(text: &str) -> u64 {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };

    parsed.unwrap_or_else(|e| {
        eprintln!("Invalid seed {}: {}", text, e);
        std::process::exit(1);
    })
}
