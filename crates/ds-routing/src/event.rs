//! Domain events and the per-tick event buffer.

use ds_core::{EdgeId, NodeId, OrderId, Tick, VehicleId};

use crate::ConfirmedOrder;

// ── Event ─────────────────────────────────────────────────────────────────────

/// An immutable fact recorded at a tick.
///
/// Arrival events carry the edge the vehicle just left; spawns happen at the
/// vehicle's starting restaurant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Spawn {
        vehicle: VehicleId,
        node:    NodeId,
        tick:    Tick,
    },
    ArrivedAtNode {
        vehicle:   VehicleId,
        node:      NodeId,
        last_edge: EdgeId,
        tick:      Tick,
    },
    ArrivedAtRestaurant {
        vehicle:   VehicleId,
        node:      NodeId,
        last_edge: EdgeId,
        tick:      Tick,
    },
    ArrivedAtNeighborhood {
        vehicle:   VehicleId,
        node:      NodeId,
        last_edge: EdgeId,
        tick:      Tick,
    },
    LoadOrder {
        vehicle: VehicleId,
        node:    NodeId,
        order:   ConfirmedOrder,
        tick:    Tick,
    },
    DeliverOrder {
        vehicle: VehicleId,
        node:    NodeId,
        order:   ConfirmedOrder,
        tick:    Tick,
    },
    OrderReceived {
        order: ConfirmedOrder,
        tick:  Tick,
    },
}

impl Event {
    pub fn tick(&self) -> Tick {
        match self {
            Event::Spawn { tick, .. }
            | Event::ArrivedAtNode { tick, .. }
            | Event::ArrivedAtRestaurant { tick, .. }
            | Event::ArrivedAtNeighborhood { tick, .. }
            | Event::LoadOrder { tick, .. }
            | Event::DeliverOrder { tick, .. }
            | Event::OrderReceived { tick, .. } => *tick,
        }
    }

    /// The vehicle involved; `None` for [`Event::OrderReceived`].
    pub fn vehicle(&self) -> Option<VehicleId> {
        match self {
            Event::Spawn { vehicle, .. }
            | Event::ArrivedAtNode { vehicle, .. }
            | Event::ArrivedAtRestaurant { vehicle, .. }
            | Event::ArrivedAtNeighborhood { vehicle, .. }
            | Event::LoadOrder { vehicle, .. }
            | Event::DeliverOrder { vehicle, .. } => Some(*vehicle),
            Event::OrderReceived { .. } => None,
        }
    }

    /// The node the event happened at; `None` for [`Event::OrderReceived`].
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Event::Spawn { node, .. }
            | Event::ArrivedAtNode { node, .. }
            | Event::ArrivedAtRestaurant { node, .. }
            | Event::ArrivedAtNeighborhood { node, .. }
            | Event::LoadOrder { node, .. }
            | Event::DeliverOrder { node, .. } => Some(*node),
            Event::OrderReceived { .. } => None,
        }
    }

    /// The edge left by an arrival event.
    pub fn last_edge(&self) -> Option<EdgeId> {
        match self {
            Event::ArrivedAtNode { last_edge, .. }
            | Event::ArrivedAtRestaurant { last_edge, .. }
            | Event::ArrivedAtNeighborhood { last_edge, .. } => Some(*last_edge),
            _ => None,
        }
    }

    pub fn order(&self) -> Option<&ConfirmedOrder> {
        match self {
            Event::LoadOrder { order, .. }
            | Event::DeliverOrder { order, .. }
            | Event::OrderReceived { order, .. } => Some(order),
            _ => None,
        }
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.order().map(|o| o.id)
    }

    /// `true` for the three node-arrival variants.
    pub fn is_arrival(&self) -> bool {
        self.last_edge().is_some()
    }

    /// Stable lowercase name, used as the `kind` column of event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Spawn { .. }                 => "spawn",
            Event::ArrivedAtNode { .. }         => "arrived_at_node",
            Event::ArrivedAtRestaurant { .. }   => "arrived_at_restaurant",
            Event::ArrivedAtNeighborhood { .. } => "arrived_at_neighborhood",
            Event::LoadOrder { .. }             => "load_order",
            Event::DeliverOrder { .. }          => "deliver_order",
            Event::OrderReceived { .. }         => "order_received",
        }
    }
}

// ── EventBus ──────────────────────────────────────────────────────────────────

/// Buffer of events posted since the last drain.
///
/// The vehicle manager owns one bus and drains it by value at the end of
/// every tick; events posted between ticks (by a delivery service, say) are
/// returned with the next tick's batch.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_post(&mut self, event: Event) {
        self.pending.push(event);
    }

    pub fn queue_post_all(&mut self, events: impl IntoIterator<Item = Event>) {
        self.pending.extend(events);
    }

    /// Take every buffered event, in posting order.
    pub fn pop_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    pub fn peek(&self) -> &[Event] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
