// Simulation Statistics

use log::{info, warn};

use crate::ss_hurst;
use crate::ss_interface::{Event, SimTime};

// ============================================================================
// Statistics Aggregator
// ============================================================================

/// Running statistics over a simulation
///
/// The average is time-weighted: between two events the rate in force is
/// held constant, so each interval contributes `rate * duration` to the
/// traffic area, and `average = area / end_time` at finalization.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    total_events: usize,
    peak_rate: f64,
    traffic_area: f64,
    last_event_time: SimTime,
    last_rate: f64,
    rate_samples: Vec<f64>,
    max_queue_length: f64,
    total_dropped: f64,
    hurst_parameter: Option<f64>,
    average_traffic: Option<f64>,
    end_time: Option<SimTime>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one processed event
    ///
    /// `aggregate_rate` is the rate after the event was applied. The interval
    /// since the previous event is integrated with the rate that was in force
    /// before this event.
    pub fn update(&mut self, event: &Event, aggregate_rate: f64) {
        let duration = event.time - self.last_event_time;
        if duration > 0.0 {
            self.traffic_area += self.last_rate * duration;
        }

        self.last_event_time = event.time;
        self.last_rate = aggregate_rate;

        self.total_events += 1;
        if aggregate_rate > self.peak_rate {
            self.peak_rate = aggregate_rate;
        }
    }

    /// Close the last interval and compute the average; only the first call counts
    pub fn finalize(&mut self, end_time: SimTime) {
        if self.average_traffic.is_some() {
            warn!("statistics already finalized, ignoring finalize({})", end_time);
            return;
        }

        let duration = end_time - self.last_event_time;
        if duration > 0.0 {
            self.traffic_area += self.last_rate * duration;
        }

        self.end_time = Some(end_time);
        self.average_traffic = Some(if end_time > 0.0 {
            self.traffic_area / end_time
        } else {
            0.0
        });
    }

    pub fn record_rate_sample(&mut self, rate: f64) {
        self.rate_samples.push(rate);
    }

    /// Estimate the Hurst exponent of the recorded rate samples
    pub fn compute_hurst(&mut self) -> f64 {
        let h = ss_hurst::estimate(&self.rate_samples);
        info!(
            "Hurst parameter: {:.4} ({} rate samples)",
            h,
            self.rate_samples.len()
        );
        self.hurst_parameter = Some(h);
        h
    }

    /// Track the longest queue seen and mirror the queue's drop counter
    pub fn update_queue_stats(&mut self, queue_length: f64, dropped: f64) {
        if queue_length > self.max_queue_length {
            self.max_queue_length = queue_length;
        }
        self.total_dropped = dropped;
    }

    pub fn total_events(&self) -> usize {
        self.total_events
    }

    pub fn peak_rate(&self) -> f64 {
        self.peak_rate
    }

    pub fn traffic_area(&self) -> f64 {
        self.traffic_area
    }

    /// `None` until `finalize` has run
    pub fn average_traffic(&self) -> Option<f64> {
        self.average_traffic
    }

    pub fn hurst_parameter(&self) -> Option<f64> {
        self.hurst_parameter
    }

    pub fn rate_samples(&self) -> &[f64] {
        &self.rate_samples
    }

    pub fn max_queue_length(&self) -> f64 {
        self.max_queue_length
    }

    pub fn total_dropped(&self) -> f64 {
        self.total_dropped
    }

    pub fn is_finalized(&self) -> bool {
        self.average_traffic.is_some()
    }

    /// Snapshot of the end-of-run fields
    pub fn summary(&self, final_aggregate_rate: f64) -> SimulationSummary {
        SimulationSummary {
            total_events: self.total_events,
            peak_traffic: self.peak_rate,
            average_traffic: self.average_traffic.unwrap_or(0.0),
            hurst_parameter: self.hurst_parameter.unwrap_or(ss_hurst::DEFAULT_HURST),
            max_queue_length: self.max_queue_length,
            total_dropped_packets: self.total_dropped,
            end_time: self.end_time.unwrap_or(self.last_event_time),
            final_aggregate_rate,
            rate_samples: self.rate_samples.len(),
        }
    }
}

// ============================================================================
// Simulation Summary
// ============================================================================

/// End-of-run result
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub total_events: usize,
    pub peak_traffic: f64,

    /// Time-weighted mean of the aggregate rate over `[0, end_time]`
    pub average_traffic: f64,

    pub hurst_parameter: f64,
    pub max_queue_length: f64,
    pub total_dropped_packets: f64,

    /// Horizon the run was finalized at
    pub end_time: SimTime,

    /// Aggregate rate in force at the horizon
    pub final_aggregate_rate: f64,

    /// Number of values fed to the Hurst estimator
    pub rate_samples: usize,
}

impl SimulationSummary {
    pub const CSV_HEADER: &'static str =
        "Total Events,Peak Traffic,Average Traffic,Hurst Parameter,Max Queue Length,Dropped Packets";

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.total_events,
            self.peak_traffic,
            self.average_traffic,
            self.hurst_parameter,
            self.max_queue_length,
            self.total_dropped_packets
        )
    }

    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║    SELF-SIMILAR TRAFFIC SIMULATION RESULTS             ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("═══ Run ═══");
        println!("  End Time: {:.3}", self.end_time);
        println!("  Events Processed: {}", self.total_events);
        println!();

        println!("═══ Aggregate Traffic ═══");
        println!("  Peak: {:.3}", self.peak_traffic);
        println!("  Average (time-weighted): {:.3}", self.average_traffic);
        println!("  Final Rate: {:.3}", self.final_aggregate_rate);
        println!();

        println!("═══ Long-Range Dependence ═══");
        println!("  Hurst Parameter: {:.4}", self.hurst_parameter);
        println!("  Rate Samples: {}", self.rate_samples);
        println!();

        println!("═══ Congestion ═══");
        println!("  Max Queue Length: {:.3}", self.max_queue_length);
        println!("  Dropped: {:.3}", self.total_dropped_packets);
        println!();
    }
}
