//! Simulation observer trait for progress reporting and data collection.

use ds_core::Tick;
use ds_routing::{Event, VehicleManager};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — delivery counter
///
/// ```rust
/// use ds_core::Tick;
/// use ds_routing::Event;
/// use ds_sim::SimObserver;
///
/// #[derive(Default)]
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_tick_end(&mut self, _tick: Tick, events: &[Event]) {
///         self.0 += events.iter().filter(|e| matches!(e, Event::DeliverOrder { .. })).count();
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once the tick's events are known and every rater has seen them.
    fn on_tick_end(&mut self, _tick: Tick, _events: &[Event]) {}

    /// Called every `config.output_interval_ticks` ticks with the vehicle
    /// manager as it stands after the tick.
    fn on_snapshot(&mut self, _tick: Tick, _vehicle_manager: &VehicleManager) {}

    /// Called once when [`run`][crate::Simulation::run] stops.  `final_tick`
    /// is the first tick that was not processed.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
