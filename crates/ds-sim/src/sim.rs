//! The `Simulation` struct and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use ds_core::{SimConfig, Tick};
use ds_rating::{Rater, RatingCriteria};
use ds_routing::{Event, VehicleManager};
use ds_service::{DeliveryService, OrderGenerator};

use crate::{SimObserver, SimResult};

/// One delivery simulation: a service steering vehicles, an order source,
/// and the raters scoring the outcome.
///
/// Each tick:
///
/// 1. ask the order generator for the tick's new orders;
/// 2. hand them to the delivery service, which advances the vehicle manager
///    and returns the tick's events;
/// 3. feed the events to every rater.
///
/// Create via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation {
    /// Global configuration (total ticks, seed, output interval, …).
    pub config: SimConfig,

    pub(crate) service:      Box<dyn DeliveryService>,
    pub(crate) generator:    Box<dyn OrderGenerator>,
    pub(crate) raters:       Vec<Box<dyn Rater>>,
    pub(crate) current_tick: Tick,
    pub(crate) stop:         Arc<AtomicBool>,
}

impl Simulation {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick until `max_ticks` ticks have been processed
    /// in total or the simulation is ended.
    ///
    /// Calls observer hooks at every tick boundary and `on_sim_end` once.
    pub fn run<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> SimResult<()> {
        info!("simulation starting at {} (max {max_ticks} ticks)", self.current_tick);
        while self.current_tick.0 < max_ticks && !self.is_ended() {
            self.step(observer)?;
        }
        info!("simulation stopped at {}", self.current_tick);
        observer.on_sim_end(self.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position.  Ignores
    /// `max_ticks` and the end flag; does not call `on_sim_end`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Ask a running [`run`](Self::run) to stop after the current tick.
    pub fn end_simulation(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_ended(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Shared end flag, for stopping the simulation from another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The next tick to be processed.
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Current score for `criterion`, or `None` if no rater measures it.
    pub fn rating_for(&self, criterion: RatingCriteria) -> Option<f64> {
        self.raters.iter().find(|r| r.criterion() == criterion).map(|r| r.score())
    }

    /// Current score of every rater, in rater order.
    pub fn ratings(&self) -> Vec<(RatingCriteria, f64)> {
        self.raters.iter().map(|r| (r.criterion(), r.score())).collect()
    }

    pub fn service(&self) -> &dyn DeliveryService {
        self.service.as_ref()
    }

    pub fn vehicle_manager(&self) -> &VehicleManager {
        self.service.vehicle_manager()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.current_tick;
        observer.on_tick_start(now);
        let events = self.process_tick(now)?;
        observer.on_tick_end(now, &events);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, self.service.vehicle_manager());
        }
        self.current_tick = now.next();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<Vec<Event>> {
        let orders = self.generator.generate_orders(now);
        let events = self.service.tick(now, orders)?;
        for rater in &mut self.raters {
            rater.on_tick(&events, now);
        }
        Ok(events)
    }
}
