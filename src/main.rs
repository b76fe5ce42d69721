use std::env;
use std::process;

use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use selfsim::ss_export::{event_sink_for, write_run_outputs};
use selfsim::{SimError, SimulationManager, SimulatorConfig};

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .unwrap();

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let config = match env::args().nth(1) {
        Some(path) => SimulatorConfig::load_from_file(&path)?,
        None => {
            info!("No configuration file given, using defaults");
            let config = SimulatorConfig::default();
            config.log_parameters();
            config
        }
    };

    info!("starting");

    let sink = event_sink_for(&config.output)?;
    let mut manager = SimulationManager::from_config(&config)?.with_sink(sink);
    let summary = manager.run(config.total_time)?;

    summary.print_summary();
    write_run_outputs(&config.output, manager.recorder().points(), &summary)?;

    info!("done.");
    Ok(())
}
