//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `events.csv`
//! - `tick_summaries.csv`
//! - `vehicle_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::EventWriter;
use crate::{EventRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

pub const EVENT_HEADER: [&str; 6] = ["tick", "kind", "vehicle", "node", "last_edge", "order"];
pub const SUMMARY_HEADER: [&str; 7] =
    ["tick", "events", "spawns", "arrivals", "loads", "deliveries", "received"];
pub const SNAPSHOT_HEADER: [&str; 6] = ["vehicle", "tick", "component", "id", "orders", "load"];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes simulation output to three CSV files.
pub struct CsvEventWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvEventWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    /// `dir` must exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(EVENT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("vehicle_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        Ok(Self { events, summaries, snapshots, finished: false })
    }
}

impl EventWriter for CsvEventWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.kind.to_owned(),
                cell(row.vehicle),
                cell(row.node),
                cell(row.last_edge),
                cell(row.order),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.events.to_string(),
            row.spawns.to_string(),
            row.arrivals.to_string(),
            row.loads.to_string(),
            row.deliveries.to_string(),
            row.received.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.vehicle.to_string(),
                row.tick.to_string(),
                row.component.to_owned(),
                row.id.to_string(),
                row.orders.to_string(),
                row.load.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
