//! Time-series recorder for the piecewise-constant aggregate rate

use crate::ss_error::SimError;
use crate::ss_interface::SimTime;

/// Breakpoints `(time, rate)` of the aggregate rate step function
///
/// A point `(t, r)` says the rate was `r` on the segment ending at `t`.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesRecorder {
    points: Vec<(SimTime, f64)>,
    last_time: SimTime,
    current_rate: Option<f64>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time: SimTime, rate: f64) {
        self.points.push((time, rate));
        self.last_time = time;
        self.current_rate = Some(rate);
    }

    /// Record that the rate was `rate` over `[t0, t1]`
    pub fn add_segment(&mut self, t0: SimTime, t1: SimTime, rate: f64) -> Result<(), SimError> {
        if t1 < t0 {
            return Err(SimError::invalid(
                "segment",
                format!("end {} precedes start {}", t1, t0),
            ));
        }
        if self.points.is_empty() && t0 > 0.0 {
            self.points.push((0.0, rate));
        }
        self.record(t1, rate);
        Ok(())
    }

    /// Close the series at `until`, holding `rate` since the last breakpoint
    pub fn finish(&mut self, until: SimTime, rate: f64) {
        match self.points.last() {
            Some(&(t, _)) if t >= until => {}
            _ => self.record(until, rate),
        }
    }

    pub fn points(&self) -> &[(SimTime, f64)] {
        &self.points
    }

    pub fn last_time(&self) -> SimTime {
        self.last_time
    }

    pub fn current_rate(&self) -> Option<f64> {
        self.current_rate
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
