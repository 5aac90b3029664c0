//! `SimOutputObserver<W>` — bridges `SimObserver` to an `EventWriter`.

use ds_core::Tick;
use ds_routing::{Event, VehicleManager};
use ds_sim::SimObserver;

use crate::row::{EventRow, TickSummaryRow, VehicleSnapshotRow};
use crate::writer::EventWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that logs every event, one summary per tick, and the
/// vehicle positions at each snapshot to an [`EventWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: EventWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: EventWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: EventWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, events: &[Event]) {
        let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();
        if !rows.is_empty() {
            let result = self.writer.write_events(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::from_events(tick, events));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, vehicle_manager: &VehicleManager) {
        let rows: Vec<VehicleSnapshotRow> = vehicle_manager
            .vehicles()
            .map(|v| VehicleSnapshotRow::new(tick, v))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
