//! Event sinks and CSV exporters

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{error, info};

use crate::ss_config::OutputConfig;
use crate::ss_interface::{EventKind, EventRecord, EventSink, SimTime, SourceId};
use crate::ss_stats::SimulationSummary;

pub const EVENTS_CSV_HEADER: &str = "sourceId,eventType,eventTime,currentAggregateRate";
pub const TIME_SERIES_CSV_HEADER: &str = "time,totalAggregateRate";

// ============================================================================
// Console Logging Sink
// ============================================================================

/// Emits every processed event through the logger
pub struct ConsoleEventSink {
    enabled: bool,
}

impl ConsoleEventSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventSink for ConsoleEventSink {
    fn log(&mut self, record: &EventRecord) {
        if !self.enabled {
            return;
        }

        info!(
            "{:>12.4} src:{:>5} {:<10} rate:{}",
            record.time, record.source_id, record.kind, record.aggregate_rate
        );
    }
}

// ============================================================================
// CSV Event Sink
// ============================================================================

/// Streams event records to a CSV file
pub struct CsvEventSink<W: Write = BufWriter<File>> {
    writer: W,
}

impl CsvEventSink {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvEventSink<W> {
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        writeln!(writer, "{}", EVENTS_CSV_HEADER)?;
        Ok(Self { writer })
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> EventSink for CsvEventSink<W> {
    fn log(&mut self, record: &EventRecord) {
        let result = writeln!(
            self.writer,
            "{},{},{},{}",
            record.source_id, record.kind, record.time, record.aggregate_rate
        );

        if let Err(e) = result {
            error!("Error writing event CSV: {}", e);
        }
    }
}

impl<W: Write> Drop for CsvEventSink<W> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            error!("Error flushing event CSV: {}", e);
        }
    }
}

// ============================================================================
// Collector Event Sink (In-Memory)
// ============================================================================

/// Collects events in memory for programmatic analysis
#[derive(Debug, Default)]
pub struct CollectorEventSink {
    pub events: Vec<EventRecord>,
}

impl CollectorEventSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    // Query helpers
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn for_source(&self, source_id: SourceId) -> impl Iterator<Item = &EventRecord> {
        self.events.iter().filter(move |e| e.source_id == source_id)
    }

    pub fn in_time_range(
        &self,
        start: SimTime,
        end: SimTime,
    ) -> impl Iterator<Item = &EventRecord> {
        self.events
            .iter()
            .filter(move |e| e.time >= start && e.time <= end)
    }

    pub fn count_by_kind(&self) -> EventKindCounts {
        let mut counts = EventKindCounts::default();
        for record in &self.events {
            match record.kind {
                EventKind::SourceOn => counts.source_on += 1,
                EventKind::SourceOff => counts.source_off += 1,
                EventKind::Tick => counts.tick += 1,
            }
        }
        counts
    }

    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut csv_sink = CsvEventSink::create(path)?;
        for record in &self.events {
            csv_sink.log(record);
        }
        csv_sink.flush()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EventKindCounts {
    pub source_on: usize,
    pub source_off: usize,
    pub tick: usize,
}

impl EventSink for CollectorEventSink {
    fn log(&mut self, record: &EventRecord) {
        self.events.push(*record);
    }
}

// ============================================================================
// Multi Sink (Combine Multiple Sinks)
// ============================================================================

/// Combines multiple event sinks
#[derive(Default)]
pub struct MultiEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl MultiEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for MultiEventSink {
    fn log(&mut self, record: &EventRecord) {
        for sink in &mut self.sinks {
            sink.log(record);
        }
    }
}

// ============================================================================
// Series / Summary Writers
// ============================================================================

pub fn write_time_series<W: Write>(
    mut writer: W,
    points: &[(SimTime, f64)],
) -> std::io::Result<()> {
    writeln!(writer, "{}", TIME_SERIES_CSV_HEADER)?;
    for (t, rate) in points {
        writeln!(writer, "{},{}", t, rate)?;
    }
    writer.flush()
}

pub fn write_time_series_csv<P: AsRef<Path>>(
    path: P,
    points: &[(SimTime, f64)],
) -> std::io::Result<()> {
    let file = File::create(&path)?;
    write_time_series(BufWriter::new(file), points)?;
    info!("Logged time-series data to {}", path.as_ref().display());
    Ok(())
}

pub fn write_summary<W: Write>(mut writer: W, summary: &SimulationSummary) -> std::io::Result<()> {
    writeln!(writer, "{}", SimulationSummary::CSV_HEADER)?;
    writeln!(writer, "{}", summary.csv_row())?;
    writer.flush()
}

pub fn write_summary_csv<P: AsRef<Path>>(
    path: P,
    summary: &SimulationSummary,
) -> std::io::Result<()> {
    let file = File::create(&path)?;
    write_summary(BufWriter::new(file), summary)?;
    info!("Logged summary statistics to {}", path.as_ref().display());
    Ok(())
}

// ============================================================================
// Configured Outputs
// ============================================================================

/// Event sink for a run: console echo, plus a CSV stream when configured
pub fn event_sink_for(output: &OutputConfig) -> std::io::Result<MultiEventSink> {
    let mut sink = MultiEventSink::new();
    if output.enable_event_logging {
        sink.add_sink(Box::new(ConsoleEventSink::new(true)));
    }
    if let Some(path) = &output.events_csv {
        sink.add_sink(Box::new(CsvEventSink::create(path)?));
        info!("Streaming events to {}", path);
    }
    Ok(sink)
}

/// Write the time-series and summary files named in `output`
pub fn write_run_outputs(
    output: &OutputConfig,
    points: &[(SimTime, f64)],
    summary: &SimulationSummary,
) -> std::io::Result<()> {
    if let Some(path) = &output.time_series_csv {
        write_time_series_csv(path, points)?;
    }
    if let Some(path) = &output.summary_csv {
        write_summary_csv(path, summary)?;
    }
    Ok(())
}
