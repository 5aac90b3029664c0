//! Punctuality rating.

use ds_core::Tick;
use ds_routing::{Event, VehicleManager};

use crate::{Rater, RaterFactory, RatingCriteria, RatingError, RatingResult};

/// Rates how close deliveries land to their delivery window.
///
/// Every received order adds `max_ticks_off` to both the worst-case and the
/// actual penalty totals.  A delivery removes up to `max_ticks_off` from the
/// actual total again: all of it when inside the window, less the further
/// outside it lands.  The first `ignored_ticks_off` ticks outside the window
/// are free.
///
/// `score = 1 - actual / worst`, or `0` before any order is received.
#[derive(Debug)]
pub struct InTimeRater {
    ignored_ticks_off: u64,
    max_ticks_off:     u64,
    max_total:         u64,
    actual_total:      u64,
}

impl InTimeRater {
    pub const DEFAULT_IGNORED_TICKS_OFF: u64 = 5;
    pub const DEFAULT_MAX_TICKS_OFF: u64 = 25;

    pub fn builder() -> InTimeRaterBuilder {
        InTimeRaterBuilder::default()
    }

    /// Penalty for delivering `ticks_off` ticks outside the window.
    fn penalty(&self, ticks_off: u64) -> u64 {
        ticks_off
            .saturating_sub(self.ignored_ticks_off)
            .min(self.max_ticks_off)
    }
}

impl Rater for InTimeRater {
    fn on_tick(&mut self, events: &[Event], tick: Tick) {
        for event in events {
            match event {
                Event::OrderReceived { .. } => {
                    self.max_total += self.max_ticks_off;
                    self.actual_total += self.max_ticks_off;
                }
                Event::DeliverOrder { order, .. } => {
                    let ticks_off = order.delivery_interval.ticks_off(tick);
                    let credit = self.max_ticks_off - self.penalty(ticks_off);
                    self.actual_total = self.actual_total.saturating_sub(credit);
                }
                _ => {}
            }
        }
    }

    fn score(&self) -> f64 {
        if self.max_total == 0 {
            return 0.0;
        }
        1.0 - self.actual_total as f64 / self.max_total as f64
    }

    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::InTime
    }
}

// ── Builder / factory ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct InTimeRaterBuilder {
    ignored_ticks_off: u64,
    max_ticks_off:     u64,
}

impl Default for InTimeRaterBuilder {
    fn default() -> Self {
        Self {
            ignored_ticks_off: InTimeRater::DEFAULT_IGNORED_TICKS_OFF,
            max_ticks_off:     InTimeRater::DEFAULT_MAX_TICKS_OFF,
        }
    }
}

impl InTimeRaterBuilder {
    pub fn ignored_ticks_off(mut self, ticks: u64) -> Self {
        self.ignored_ticks_off = ticks;
        self
    }

    pub fn max_ticks_off(mut self, ticks: u64) -> Self {
        self.max_ticks_off = ticks;
        self
    }

    /// # Errors
    ///
    /// [`RatingError::Config`] if `max_ticks_off` is zero.
    pub fn build(self) -> RatingResult<InTimeRaterFactory> {
        if self.max_ticks_off == 0 {
            return Err(RatingError::Config("max_ticks_off must be positive".into()));
        }
        Ok(InTimeRaterFactory {
            ignored_ticks_off: self.ignored_ticks_off,
            max_ticks_off:     self.max_ticks_off,
        })
    }
}

/// Validated [`InTimeRater`] configuration.
#[derive(Clone, Debug)]
pub struct InTimeRaterFactory {
    ignored_ticks_off: u64,
    max_ticks_off:     u64,
}

impl InTimeRaterFactory {
    pub fn rater(&self) -> InTimeRater {
        InTimeRater {
            ignored_ticks_off: self.ignored_ticks_off,
            max_ticks_off:     self.max_ticks_off,
            max_total:         0,
            actual_total:      0,
        }
    }
}

impl RaterFactory for InTimeRaterFactory {
    fn criterion(&self) -> RatingCriteria {
        RatingCriteria::InTime
    }

    fn create(&self, _vehicle_manager: &VehicleManager) -> Box<dyn Rater> {
        Box::new(self.rater())
    }
}
