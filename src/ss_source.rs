//! Traffic Source
//!
//! ON/OFF state machine. A source starts OFF and only changes state through
//! `schedule_next_event`, which toggles the state, samples the sojourn of the
//! state just entered and returns the event that ends it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::ss_error::SimError;
use crate::ss_interface::{Event, EventKind, SimTime, SourceId};
use crate::ss_pareto::ParetoParams;

/// How sojourn durations are drawn
#[derive(Debug, Clone, PartialEq)]
pub enum DurationModel {
    /// Heavy-tailed Pareto sojourns with per-state shape and scale
    Pareto { on: ParetoParams, off: ParetoParams },

    /// Gaussian-magnitude sojourns: `scale · (1 + |z|)` with `z ~ N(0, 1)`
    ///
    /// The Hurst exponent is carried for reporting only; durations are not
    /// drawn from the `FgnGenerator` table.
    FractionalGaussianNoise {
        hurst: f64,
        on_scale: f64,
        off_scale: f64,
    },
}

impl DurationModel {
    pub fn pareto(
        alpha_on: f64,
        xm_on: f64,
        alpha_off: f64,
        xm_off: f64,
    ) -> Result<Self, SimError> {
        Ok(DurationModel::Pareto {
            on: ParetoParams::new(alpha_on, xm_on)?,
            off: ParetoParams::new(alpha_off, xm_off)?,
        })
    }

    pub fn fgn(hurst: f64, on_scale: f64, off_scale: f64) -> Result<Self, SimError> {
        if !(hurst > 0.0 && hurst < 1.0) {
            return Err(SimError::invalid(
                "hurst",
                format!("must lie in (0, 1), got {}", hurst),
            ));
        }
        if !(on_scale > 0.0) || !(off_scale > 0.0) {
            return Err(SimError::invalid(
                "xm",
                format!("duration scales must be > 0, got {} / {}", on_scale, off_scale),
            ));
        }
        Ok(DurationModel::FractionalGaussianNoise {
            hurst,
            on_scale,
            off_scale,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, on: bool, rng: &mut R) -> f64 {
        match self {
            DurationModel::Pareto { on: p_on, off: p_off } => {
                if on {
                    p_on.sample(rng)
                } else {
                    p_off.sample(rng)
                }
            }
            DurationModel::FractionalGaussianNoise {
                on_scale, off_scale, ..
            } => {
                let scale = if on { *on_scale } else { *off_scale };
                let z: f64 = rng.sample(StandardNormal);
                scale * (1.0 + z.abs())
            }
        }
    }
}

pub struct TrafficSource {
    id: SourceId,
    on_rate: f64,
    is_on: bool,
    model: DurationModel,
    rng: StdRng,
}

impl TrafficSource {
    pub fn new(
        id: SourceId,
        on_rate: f64,
        model: DurationModel,
        seed: u64,
    ) -> Result<Self, SimError> {
        if !(on_rate >= 0.0) || !on_rate.is_finite() {
            return Err(SimError::invalid(
                "on_rate",
                format!("must be finite and >= 0, got {}", on_rate),
            ));
        }

        Ok(Self {
            id,
            on_rate,
            is_on: false,
            model,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// First event of a fresh source: the end of its initial OFF sojourn
    ///
    /// Does not change state.
    pub fn schedule_initial_event(&mut self, now: SimTime) -> Event {
        let dt = self.sample_off_duration();
        Event::new(now + dt, self.id, EventKind::SourceOn)
    }

    /// Toggle state and schedule the event that ends the new sojourn
    pub fn schedule_next_event(&mut self, now: SimTime) -> Event {
        self.is_on = !self.is_on;
        if self.is_on {
            let dt = self.sample_on_duration();
            Event::new(now + dt, self.id, EventKind::SourceOff)
        } else {
            let dt = self.sample_off_duration();
            Event::new(now + dt, self.id, EventKind::SourceOn)
        }
    }

    pub fn sample_on_duration(&mut self) -> f64 {
        self.model.sample(true, &mut self.rng)
    }

    pub fn sample_off_duration(&mut self) -> f64 {
        self.model.sample(false, &mut self.rng)
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn on_rate(&self) -> f64 {
        self.on_rate
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn model(&self) -> &DurationModel {
        &self.model
    }
}
