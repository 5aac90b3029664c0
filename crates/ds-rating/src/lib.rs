//! `ds-rating` — scoring a simulation from its event stream.
//!
//! # Crate layout
//!
//! | Module               | Contents                                              |
//! |----------------------|-------------------------------------------------------|
//! | [`rater`]            | `Rater`, `RaterFactory`, `RatingCriteria`             |
//! | [`in_time`]          | `InTimeRater` + builder/factory                       |
//! | [`travel_distance`]  | `TravelDistanceRater` + builder/factory               |
//! | [`amount_delivered`] | `AmountDeliveredRater` + builder/factory              |
//! | [`error`]            | `RatingError`, `RatingResult<T>`                      |
//!
//! Raters never touch the vehicle manager during a run; they only see the
//! events each tick returns.  Builders validate configuration and produce
//! factories, and the simulation asks each factory for a fresh rater per run.

pub mod amount_delivered;
pub mod error;
pub mod in_time;
pub mod rater;
pub mod travel_distance;


pub use amount_delivered::{AmountDeliveredRater, AmountDeliveredRaterBuilder, AmountDeliveredRaterFactory};
pub use error::{RatingError, RatingResult};
pub use in_time::{InTimeRater, InTimeRaterBuilder, InTimeRaterFactory};
pub use rater::{Rater, RaterFactory, RatingCriteria};
pub use travel_distance::{TravelDistanceRater, TravelDistanceRaterBuilder, TravelDistanceRaterFactory};
