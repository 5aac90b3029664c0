//! Confirmed customer orders.

use ds_core::{Location, NodeId, OrderId, Tick, TickInterval};

/// An order accepted by the delivery service.
///
/// `restaurant` is the node the food is picked up at and `location` the
/// neighborhood it goes to.  `actual_delivery_tick` is `None` until the
/// order is handed over.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedOrder {
    pub id:                   OrderId,
    pub location:             Location,
    pub restaurant:           NodeId,
    pub delivery_interval:    TickInterval,
    pub food:                 Vec<String>,
    pub weight:               f64,
    pub actual_delivery_tick: Option<Tick>,
}

impl ConfirmedOrder {
    pub fn new(
        id:                OrderId,
        location:          Location,
        restaurant:        NodeId,
        delivery_interval: TickInterval,
        food:              Vec<String>,
        weight:            f64,
    ) -> Self {
        Self {
            id,
            location,
            restaurant,
            delivery_interval,
            food,
            weight,
            actual_delivery_tick: None,
        }
    }

    #[inline]
    pub fn is_delivered(&self) -> bool {
        self.actual_delivery_tick.is_some()
    }

    /// Ticks between the actual delivery and the delivery window; `None`
    /// while undelivered.
    pub fn ticks_off(&self) -> Option<u64> {
        self.actual_delivery_tick
            .map(|tick| self.delivery_interval.ticks_off(tick))
    }
}
