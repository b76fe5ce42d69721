//! Simulation Manager
//!
//! Owns the clock, the pending-event queue and every source. Events are
//! processed in nondecreasing time order; events sharing a timestamp are
//! processed in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info, trace};

use crate::ss_config::{SamplingMode, SimulatorConfig};
use crate::ss_error::SimError;
use crate::ss_interface::{Event, EventKind, EventRecord, EventSink, NoOpSink, SimTime};
use crate::ss_queue::BoundedQueue;
use crate::ss_recorder::TimeSeriesRecorder;
use crate::ss_source::TrafficSource;
use crate::ss_stats::{SimulationSummary, StatisticsAggregator};

// ============================================================================
// Pending Events
// ============================================================================

struct QueuedEvent {
    event: Event,
    seq: u64,
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by time, then by scheduling order
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedEvent {}

/// Clock, running aggregate and pending events of one run
#[derive(Default)]
struct SimState {
    now: SimTime,
    aggregate_rate: f64,
    pending: BinaryHeap<QueuedEvent>,
    next_seq: u64,
}

impl SimState {
    fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(QueuedEvent { event, seq });
    }

    fn pop(&mut self) -> Option<Event> {
        self.pending.pop().map(|q| q.event)
    }
}

// ============================================================================
// Manager
// ============================================================================

pub struct SimulationManager<S: EventSink = NoOpSink> {
    state: SimState,
    sources: Vec<TrafficSource>,
    queue: BoundedQueue,
    stats: StatisticsAggregator,
    recorder: TimeSeriesRecorder,
    sink: S,
    sampling: SamplingMode,
    has_run: bool,
}

impl SimulationManager<NoOpSink> {
    pub fn new(queue: BoundedQueue) -> Self {
        Self {
            state: SimState::default(),
            sources: Vec::new(),
            queue,
            stats: StatisticsAggregator::new(),
            recorder: TimeSeriesRecorder::new(),
            sink: NoOpSink,
            sampling: SamplingMode::PerEvent,
            has_run: false,
        }
    }

    /// Validate `config` and build its source population
    ///
    /// Source `i` gets id `i` and seed `config.source_seed(i)`.
    pub fn from_config(config: &SimulatorConfig) -> Result<Self, SimError> {
        config.validate()?;
        let model = config.duration_model()?;
        let queue = BoundedQueue::new(config.queue.capacity, config.queue.service_rate)?;

        let mut manager = Self::new(queue).with_sampling(config.sampling);
        for i in 0..config.num_sources {
            let seed = config.source_seed(i);
            let source = TrafficSource::new(i, config.on_rate, model.clone(), seed)?;
            manager.add_source(source)?;
        }

        info!(
            "Created {} sources ({} model, seed basis {})",
            config.num_sources, config.model, config.seed
        );
        Ok(manager)
    }
}

impl<S: EventSink> SimulationManager<S> {
    /// Replace the event sink, keeping everything else
    pub fn with_sink<T: EventSink>(self, sink: T) -> SimulationManager<T> {
        SimulationManager {
            state: self.state,
            sources: self.sources,
            queue: self.queue,
            stats: self.stats,
            recorder: self.recorder,
            sink,
            sampling: self.sampling,
            has_run: self.has_run,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sources are looked up by id, so ids must be assigned densely from 0
    pub fn add_source(&mut self, source: TrafficSource) -> Result<(), SimError> {
        if source.id() != self.sources.len() {
            return Err(SimError::invalid(
                "source_id",
                format!("expected {}, got {}", self.sources.len(), source.id()),
            ));
        }
        self.sources.push(source);
        Ok(())
    }

    /// Enqueue an externally created event
    pub fn schedule(&mut self, event: Event) -> Result<(), SimError> {
        if !event.time.is_finite() || event.time < self.state.now {
            return Err(SimError::invalid(
                "event_time",
                format!("{} is not at or after now ({})", event.time, self.state.now),
            ));
        }
        self.state.push(event);
        Ok(())
    }

    /// Ask every source for its first event
    pub fn seed_initial_events(&mut self) {
        let now = self.state.now;
        for source in &mut self.sources {
            let event = source.schedule_initial_event(now);
            self.state.push(event);
        }
        debug!("Seeded {} initial events", self.sources.len());
    }

    /// Apply a source event to its source and the aggregate rate
    ///
    /// Returns `false` when the event was ignored: unknown source id, a
    /// tick, or an event that does not match the source's current state.
    pub fn handle(&mut self, event: &Event) -> bool {
        let now = self.state.now;
        let Some(source) = self.sources.get_mut(event.source_id) else {
            if event.kind != EventKind::Tick {
                debug!("Ignoring {} for unknown source {}", event.kind, event.source_id);
            }
            return false;
        };

        match (event.kind, source.is_on()) {
            (EventKind::SourceOn, false) => {
                let next = source.schedule_next_event(now);
                self.state.aggregate_rate += source.on_rate();
                self.state.push(next);
                true
            }
            (EventKind::SourceOff, true) => {
                let next = source.schedule_next_event(now);
                self.state.aggregate_rate -= source.on_rate();
                self.state.push(next);
                true
            }
            (kind, is_on) => {
                debug!(
                    "Ignoring stale {} for source {} (on={})",
                    kind, event.source_id, is_on
                );
                false
            }
        }
    }

    /// Process events up to and including `until`
    ///
    /// A manager runs once; later calls fail with `SimError::AlreadyRun`.
    pub fn run(&mut self, until: SimTime) -> Result<SimulationSummary, SimError> {
        if self.has_run {
            return Err(SimError::AlreadyRun);
        }
        if !(until >= 0.0) || !until.is_finite() {
            return Err(SimError::invalid(
                "until",
                format!("must be finite and >= 0, got {}", until),
            ));
        }
        if let SamplingMode::Interval(dt) = self.sampling {
            if !(dt > 0.0) || !dt.is_finite() {
                return Err(SimError::invalid(
                    "sample_interval",
                    format!("must be finite and > 0, got {}", dt),
                ));
            }
        }
        self.has_run = true;

        info!(
            "Starting simulation: {} sources, horizon {}",
            self.sources.len(),
            until
        );

        self.seed_initial_events();
        if let SamplingMode::Interval(dt) = self.sampling {
            self.state.push(Event::tick(self.state.now + dt));
        }
        self.recorder.record(self.state.now, self.state.aggregate_rate);

        while let Some(event) = self.state.pop() {
            if event.time > until {
                break;
            }

            self.recorder
                .add_segment(self.state.now, event.time, self.state.aggregate_rate)?;
            self.state.now = event.time;

            if event.kind == EventKind::Tick {
                self.stats.record_rate_sample(self.state.aggregate_rate);
                if let SamplingMode::Interval(dt) = self.sampling {
                    self.state.push(Event::tick(event.time + dt));
                }
                continue;
            }

            self.handle(&event);
            let rate = self.state.aggregate_rate;

            self.queue.add_traffic(rate);
            self.queue.service();
            self.stats
                .update_queue_stats(self.queue.occupancy(), self.queue.dropped());

            self.stats.update(&event, rate);
            if self.sampling == SamplingMode::PerEvent {
                self.stats.record_rate_sample(rate);
            }

            trace!(
                "t={:.4} src={} {} rate={}",
                event.time,
                event.source_id,
                event.kind,
                rate
            );
            self.sink.log(&EventRecord::new(&event, rate));
        }

        let discarded = self.state.pending.len();
        self.state.pending.clear();

        self.stats.finalize(until);
        self.stats.compute_hurst();
        self.recorder.finish(until, self.state.aggregate_rate);

        let summary = self.stats.summary(self.state.aggregate_rate);
        info!(
            "Simulation complete: {} events, average rate {:.4}, {} pending events discarded",
            summary.total_events, summary.average_traffic, discarded
        );
        Ok(summary)
    }

    pub fn now(&self) -> SimTime {
        self.state.now
    }

    pub fn aggregate_rate(&self) -> f64 {
        self.state.aggregate_rate
    }

    pub fn pending_events(&self) -> usize {
        self.state.pending.len()
    }

    pub fn sources(&self) -> &[TrafficSource] {
        &self.sources
    }

    pub fn queue(&self) -> &BoundedQueue {
        &self.queue
    }

    pub fn stats(&self) -> &StatisticsAggregator {
        &self.stats
    }

    pub fn recorder(&self) -> &TimeSeriesRecorder {
        &self.recorder
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }
}
