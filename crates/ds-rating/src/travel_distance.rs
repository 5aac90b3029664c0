//! Travel-distance rating.

use std::sync::Arc;

use log::warn;

use ds_core::Tick;
use ds_region::{PathCalculator, Region};
use ds_routing::{Event, VehicleManager};

use crate::{Rater, RaterFactory, RatingCriteria, RatingError, RatingResult};

/// Rates the distance driven against an out-and-back baseline.
///
/// Every delivered order adds twice the duration of the shortest path from
/// its restaurant to its neighborhood to the worst-case total.  Every node
/// arrival adds the duration of the edge just left to the actual total.
///
/// `score = 1 - actual / (worst * factor)` while `actual < worst * factor`,
/// else `0`.
pub struct TravelDistanceRater {
    region:          Arc<Region>,
    path_calculator: Arc<dyn PathCalculator>,
    factor:          f64,
    worst_distance:  u64,
    actual_distance: u64,
}

impl TravelDistanceRater {
    pub const DEFAULT_FACTOR: f64 = 0.5;

    pub fn builder() -> TravelDistanceRaterBuilder {
        TravelDistanceRaterBuilder::default()
    }

    pub fn new(region: Arc<Region>, path_calculator: Arc<dyn PathCalculator>, factor: f64) -> Self {
        Self {
            region,
            path_calculator,
            factor,
            worst_distance: 0,
            actual_distance: 0,
        }
    }
}

impl Rater for TravelDistanceRater {
    fn on_tick(&mut self, events: &[Event], _tick: Tick) {
        for event in events {
            match event {
                Event::DeliverOrder { order, .. } => {
                    let Some(to) = self.region.node_id_at(order.location) else {
                        warn!("order {} targets {} which is not a node", order.id, order.location);
                        continue;
                    };
                    match self.path_calculator.path_duration(&self.region, order.restaurant, to) {
                        Ok(duration) => self.worst_distance += 2 * duration,
                        Err(e) => warn!("no baseline for order {}: {e}", order.id),
                    }
                }
                Event::ArrivedAtNode { last_edge, .. }
                | Event::ArrivedAtRestaurant { last_edge, .. }
                | Event::ArrivedAtNeighborhood { last_edge, .. } => {
                    if let Some(edge) = self.region.edge(*last_edge) {
                        self.actual_distance += edge.duration();
                    }
                }
                _ => {}
            }
        }
    }

    fn score(&self) -> f64 {
        let budget = self.worst_distance as f64 * self.factor;
        let actual = self.actual_distance as f64;
        if actual < budget {
            1.0 - actual / budget
        } else {
            0.0
        }
    }

    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::TravelDistance
    }
}

// ── Builder / factory ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct TravelDistanceRaterBuilder {
    factor: f64,
}

impl Default for TravelDistanceRaterBuilder {
    fn default() -> Self {
        Self { factor: TravelDistanceRater::DEFAULT_FACTOR }
    }
}

impl TravelDistanceRaterBuilder {
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// # Errors
    ///
    /// [`RatingError::Config`] for a negative or non-finite factor.
    pub fn build(self) -> RatingResult<TravelDistanceRaterFactory> {
        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(RatingError::Config(format!(
                "factor must be a non-negative number, got {}",
                self.factor
            )));
        }
        Ok(TravelDistanceRaterFactory { factor: self.factor })
    }
}

/// Validated [`TravelDistanceRater`] configuration.
#[derive(Clone, Debug)]
pub struct TravelDistanceRaterFactory {
    factor: f64,
}

impl RaterFactory for TravelDistanceRaterFactory {
    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::TravelDistance
    }

    /// The rater measures paths with the manager's own region and calculator.
    fn create(&self, vehicle_manager: &VehicleManager) -> Box<dyn Rater> {
        Box::new(TravelDistanceRater::new(
            Arc::clone(vehicle_manager.region()),
            Arc::clone(vehicle_manager.path_calculator()),
            self.factor,
        ))
    }
}
