//! `ds-output` — simulation output writers for the delivery engine.
//!
//! | Backend | Files created                                                |
//! |---------|--------------------------------------------------------------|
//! | CSV     | `events.csv`, `tick_summaries.csv`, `vehicle_snapshots.csv`  |
//!
//! Backends implement [`EventWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ds_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ds_output::{CsvEventWriter, SimOutputObserver};
//!
//! let writer = CsvEventWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(config.total_ticks, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvEventWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{EventRow, TickSummaryRow, VehicleSnapshotRow};
pub use writer::EventWriter;
