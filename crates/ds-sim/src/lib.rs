//! `ds-sim` — simulation loop and multi-run runner for the delivery engine.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..max_ticks (or until end_simulation):
//!   ① Orders   — OrderGenerator::generate_orders(tick)
//!   ② Service  — DeliveryService::tick(tick, orders)
//!                  → VehicleManager::tick, then the policy's decisions
//!   ③ Rating   — Rater::on_tick(events, tick) for every rater
//!   ④ Observe  — SimObserver hooks; snapshot every output_interval_ticks
//! ```
//!
//! # Runner
//!
//! [`Runner`] simulates each [`ProblemArchetype`] `config.runs` times under
//! one [`DeliveryServiceFactory`](ds_service::DeliveryServiceFactory) and
//! averages every rating criterion over all simulations.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Runs the archetypes of each round on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ds_core::SimConfig;
//! use ds_service::BasicDeliveryService;
//! use ds_sim::{NoopHooks, ProblemArchetype, Runner};
//!
//! let archetype = ProblemArchetype::builder("small", region)
//!     .vehicle(Location::new(0, 0), 1.0)
//!     .order_generator(FridayOrderGenerator::builder().build()?)
//!     .rater(InTimeRater::builder().build()?)
//!     .build()?;
//! let result = Runner::new(SimConfig::default())?
//!     .run(&[archetype], &BasicDeliveryService::factory(), &mut NoopHooks)?;
//! ```

pub mod archetype;
pub mod builder;
pub mod error;
pub mod observer;
pub mod runner;
pub mod sim;

#[cfg(test)]
mod tests;

pub use archetype::{ProblemArchetype, ProblemArchetypeBuilder};
pub use builder::SimulationBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use runner::{NoopHooks, Runner, RunnerHooks, RunnerResult};
pub use sim::Simulation;
