//! Basic self-similar traffic simulation
//!
//! Run with: cargo run --example basic_simulation

use log::info;
use simple_logger::SimpleLogger;

use selfsim::ss_export::CollectorEventSink;
use selfsim::{EventKind, SimulationManager, SimulatorConfig, TrafficModelType};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("Setting up simulation...");

    let config = SimulatorConfig {
        total_time: 10_000.0,
        num_sources: 50,
        on_rate: 1.0,
        alpha_on: 1.4,
        xm_on: 1.0,
        alpha_off: 1.2,
        xm_off: 1.0,
        model: TrafficModelType::Pareto,
        seed: 1234,
        ..Default::default()
    };

    info!("Starting simulation...");

    let mut manager = SimulationManager::from_config(&config)
        .unwrap()
        .with_sink(CollectorEventSink::new());
    let summary = manager.run(config.total_time).unwrap();

    info!("Simulation complete!");
    summary.print_summary();

    let counts = manager.sink().count_by_kind();
    info!(
        "Event distribution: SOURCE_ON: {}, SOURCE_OFF: {}",
        counts.source_on, counts.source_off
    );

    // ON fraction per source over the first tenth of the run
    let window_end = config.total_time / 10.0;
    let early = manager.sink().in_time_range(0.0, window_end).count();
    info!("Events before t={}: {}", window_end, early);

    let busiest = (0..config.num_sources)
        .map(|id| (id, manager.sink().for_source(id).count()))
        .max_by_key(|&(_, n)| n);
    if let Some((id, n)) = busiest {
        info!("Busiest source: {} with {} transitions", id, n);
    }

    let on_now = manager.sources().iter().filter(|s| s.is_on()).count();
    info!(
        "Sources ON at the horizon: {} (aggregate rate {})",
        on_now,
        manager.aggregate_rate()
    );

    let last_on = manager.sink().of_kind(EventKind::SourceOn).last();
    if let Some(record) = last_on {
        info!("Last SOURCE_ON: source {} at t={:.3}", record.source_id, record.time);
    }
}
