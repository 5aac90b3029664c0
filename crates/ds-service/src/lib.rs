//! `ds-service` — delivery policies and order sources.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`service`]   | `DeliveryService`, `DeliveryServiceFactory`              |
//! | [`basic`]     | `BasicDeliveryService` — FIFO reference policy           |
//! | [`generator`] | `OrderGenerator`, `OrderGeneratorFactory`, `EmptyOrderGenerator` |
//! | [`friday`]    | `FridayOrderGenerator` + builder/factory                 |
//! | [`error`]     | `ServiceError`, `ServiceResult<T>`                       |
//!
//! A service owns the simulation's `VehicleManager`.  Each tick it advances
//! the manager, takes the generator's new orders, and steers vehicles by
//! queueing moves whose arrival actions load or deliver orders.

pub mod basic;
pub mod error;
pub mod friday;
pub mod generator;
pub mod service;

#[cfg(test)]
mod tests;

pub use basic::BasicDeliveryService;
pub use error::{ServiceError, ServiceResult};
pub use friday::{FridayOrderGenerator, FridayOrderGeneratorBuilder, FridayOrderGeneratorFactory};
pub use generator::{EmptyOrderGenerator, OrderGenerator, OrderGeneratorFactory};
pub use service::{order_received_events, DeliveryService, DeliveryServiceFactory};
