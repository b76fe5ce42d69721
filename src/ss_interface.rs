use std::fmt;

/// Simulated time, in abstract time units
pub type SimTime = f64;

/// Index of a traffic source within the simulated population
pub type SourceId = usize;

/// Source id carried by events that do not belong to any source (ticks)
pub const NO_SOURCE: SourceId = SourceId::MAX;

/// Kinds of events the scheduler understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Source leaves its OFF sojourn and starts contributing load
    SourceOn,
    /// Source leaves its ON sojourn and stops contributing load
    SourceOff,
    /// Periodic sampling tick, not tied to a source
    Tick,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SourceOn => "SOURCE_ON",
            EventKind::SourceOff => "SOURCE_OFF",
            EventKind::Tick => "TICK",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A scheduled occurrence. Created by a source or by the manager, consumed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: SimTime,
    pub source_id: SourceId,
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: SimTime, source_id: SourceId, kind: EventKind) -> Self {
        Self {
            time,
            source_id,
            kind,
        }
    }

    pub fn tick(time: SimTime) -> Self {
        Self::new(time, NO_SOURCE, EventKind::Tick)
    }
}

/// What the manager reports after each processed source event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRecord {
    pub source_id: SourceId,
    pub kind: EventKind,
    pub time: SimTime,
    /// Aggregate rate after the event was applied
    pub aggregate_rate: f64,
}

impl EventRecord {
    pub fn new(event: &Event, aggregate_rate: f64) -> Self {
        Self {
            source_id: event.source_id,
            kind: event.kind,
            time: event.time,
            aggregate_rate,
        }
    }
}

/// Event sink trait for collecting processed events
///
/// The manager calls `log` once per processed source event. Implementations
/// decide what to keep: print, buffer in memory, stream to CSV, or nothing.
pub trait EventSink {
    fn log(&mut self, record: &EventRecord);
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn log(&mut self, record: &EventRecord) {
        (**self).log(record)
    }
}

/// No-op event sink for production use (zero overhead)
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _record: &EventRecord) {}
}
