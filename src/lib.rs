//! # selfsim - Self-Similar Network Traffic Simulation
//!
//! A discrete-event simulator that aggregates many ON/OFF traffic sources
//! with heavy-tailed sojourn times. The superposition of such sources is
//! self-similar; the simulator measures that through the Hurst exponent of
//! the aggregate rate and feeds the aggregate into a bounded fluid queue to
//! observe congestion.
//!
//! ## Core Components
//!
//! - **SimulationManager**: clock, event queue and main loop
//! - **TrafficSource**: ON/OFF state machine with Pareto or Gaussian sojourns
//! - **StatisticsAggregator**: time-weighted average, peak and Hurst estimate
//! - **BoundedQueue**: finite buffer drained at a fixed rate per event
//! - **FgnGenerator**: fractional Gaussian noise (Hosking or Davies-Harte)
//!
//! ```no_run
//! use selfsim::{SimulationManager, SimulatorConfig};
//!
//! let config = SimulatorConfig::default();
//! let mut manager = SimulationManager::from_config(&config).unwrap();
//! let summary = manager.run(config.total_time).unwrap();
//! summary.print_summary();
//! ```

// Core simulation modules
pub mod ss_interface;
pub mod ss_error;
pub mod ss_manager;
pub mod ss_source;
pub mod ss_stats;
pub mod ss_queue;
pub mod ss_recorder;

// Random processes and estimators
pub mod ss_pareto;
pub mod ss_fgn;
pub mod ss_hurst;

// Configuration and output
pub mod ss_config;
pub mod ss_export;

// Re-export commonly used types
pub use ss_config::{SamplingMode, SimulatorConfig, TrafficModelType};
pub use ss_error::SimError;
pub use ss_fgn::{FgnGenerator, FgnMethod};
pub use ss_interface::{Event, EventKind, EventRecord, EventSink, NoOpSink, SimTime, SourceId};
pub use ss_manager::SimulationManager;
pub use ss_queue::BoundedQueue;
pub use ss_recorder::TimeSeriesRecorder;
pub use ss_source::{DurationModel, TrafficSource};
pub use ss_stats::{SimulationSummary, StatisticsAggregator};
