//! The `EventWriter` trait implemented by output backends.

use crate::{EventRow, OutputResult, TickSummaryRow, VehicleSnapshotRow};

/// Sink for the rows [`SimOutputObserver`](crate::SimOutputObserver) produces.
///
/// Errors are stored by the observer and retrieved with
/// [`take_error`](crate::SimOutputObserver::take_error).
pub trait EventWriter {
    /// Write the events of one tick, in emission order.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write the position of every vehicle at a snapshot tick.
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
