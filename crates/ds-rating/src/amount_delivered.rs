//! Delivered-share rating.

use ds_core::Tick;
use ds_routing::{Event, VehicleManager};

use crate::{Rater, RaterFactory, RatingCriteria, RatingError, RatingResult};

/// Rates the share of received orders that were delivered.
///
/// `score = 1 - undelivered / (received * factor)` while
/// `undelivered < received * factor`, else `0`.  With the default factor of
/// `0.99`, leaving 99 % of orders undelivered already scores zero.
#[derive(Debug)]
pub struct AmountDeliveredRater {
    factor:    f64,
    received:  u64,
    delivered: u64,
}

impl AmountDeliveredRater {
    pub const DEFAULT_FACTOR: f64 = 0.99;

    pub fn builder() -> AmountDeliveredRaterBuilder {
        AmountDeliveredRaterBuilder::default()
    }
}

impl Rater for AmountDeliveredRater {
    fn on_tick(&mut self, events: &[Event], _tick: Tick) {
        for event in events {
            match event {
                Event::OrderReceived { .. } => self.received += 1,
                Event::DeliverOrder { .. } => self.delivered += 1,
                _ => {}
            }
        }
    }

    fn score(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        let undelivered = self.received.saturating_sub(self.delivered) as f64;
        let budget = self.received as f64 * self.factor;
        if undelivered < budget {
            1.0 - undelivered / budget
        } else {
            0.0
        }
    }

    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::AmountDelivered
    }
}

// ── Builder / factory ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AmountDeliveredRaterBuilder {
    factor: f64,
}

impl Default for AmountDeliveredRaterBuilder {
    fn default() -> Self {
        Self { factor: AmountDeliveredRater::DEFAULT_FACTOR }
    }
}

impl AmountDeliveredRaterBuilder {
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// # Errors
    ///
    /// [`RatingError::Config`] unless `0 < factor <= 1`.
    pub fn build(self) -> RatingResult<AmountDeliveredRaterFactory> {
        if !(self.factor > 0.0 && self.factor <= 1.0) {
            return Err(RatingError::Config(format!(
                "factor must be in (0, 1], got {}",
                self.factor
            )));
        }
        Ok(AmountDeliveredRaterFactory { factor: self.factor })
    }
}

/// Validated [`AmountDeliveredRater`] configuration.
#[derive(Clone, Debug)]
pub struct AmountDeliveredRaterFactory {
    factor: f64,
}

impl AmountDeliveredRaterFactory {
    pub fn rater(&self) -> AmountDeliveredRater {
        AmountDeliveredRater { factor: self.factor, received: 0, delivered: 0 }
    }
}

impl RaterFactory for AmountDeliveredRaterFactory {
    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::AmountDelivered
    }

    fn create(&self, _vehicle_manager: &VehicleManager) -> Box<dyn Rater> {
        Box::new(self.rater())
    }
}
