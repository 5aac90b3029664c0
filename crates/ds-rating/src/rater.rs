//! The `Rater` trait and rating criteria.

use std::fmt;

use ds_core::Tick;
use ds_routing::{Event, VehicleManager};

// ── RatingCriteria ────────────────────────────────────────────────────────────

/// What a rater measures.  One rater per criterion per simulation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RatingCriteria {
    /// Deliveries inside their delivery window.
    InTime,
    /// Share of received orders that were delivered.
    AmountDelivered,
    /// Distance driven compared to a naive out-and-back baseline.
    TravelDistance,
}

impl RatingCriteria {
    pub const ALL: [RatingCriteria; 3] = [
        RatingCriteria::InTime,
        RatingCriteria::AmountDelivered,
        RatingCriteria::TravelDistance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RatingCriteria::InTime          => "in_time",
            RatingCriteria::AmountDelivered => "amount_delivered",
            RatingCriteria::TravelDistance  => "travel_distance",
        }
    }
}

impl fmt::Display for RatingCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Rater ─────────────────────────────────────────────────────────────────────

/// Scores a simulation by observing the events of every tick.
///
/// Scores are in `[0, 1]`, higher is better.  A rater that has seen nothing
/// to judge scores `0`.
///
/// # Thread safety
///
/// Raters are owned by a single simulation but simulations may run on
/// separate threads, so implementations must be `Send`.
pub trait Rater: Send {
    /// Feed the events of tick `tick`.
    fn on_tick(&mut self, events: &[Event], tick: Tick);

    /// Current score.
    fn score(&self) -> f64;

    fn criterion(&self) -> RatingCriteria;
}

// ── RaterFactory ──────────────────────────────────────────────────────────────

/// Creates a fresh [`Rater`] for every simulation run.
///
/// Factories are validated configuration; the vehicle manager is supplied at
/// creation time so raters that need the region or path calculator can take
/// them from the run they observe.
pub trait RaterFactory: Send + Sync {
    fn criterion(&self) -> RatingCriteria;

    fn create(&self, vehicle_manager: &VehicleManager) -> Box<dyn Rater>;
}
