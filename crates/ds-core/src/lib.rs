//! `ds-core` — foundational types for the delivery simulation workspace.
//!
//! This crate is a dependency of every other `ds-*` crate.  It intentionally
//! has no `ds-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`, `VehicleId`, `OrderId`            |
//! | [`location`]   | `Location` — 2-D integer grid coordinate              |
//! | [`time`]       | `Tick`, `TickInterval`, `SimConfig`                   |
//! | [`rng`]        | `SimRng` (seeded, with Gaussian sampling)             |
//! | [`error`]      | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod location;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, NodeId, OrderId, VehicleId};
pub use location::Location;
pub use rng::SimRng;
pub use time::{SimConfig, Tick, TickInterval};
