//! Plain data row types written by output backends.

use ds_core::Tick;
use ds_routing::{ComponentRef, Event, Vehicle};

/// One event, flattened.  Fields an event kind does not carry are `None`
/// and written as empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick:      u64,
    pub kind:      &'static str,
    pub vehicle:   Option<u32>,
    pub node:      Option<u32>,
    pub last_edge: Option<u32>,
    pub order:     Option<u64>,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            tick:      event.tick().0,
            kind:      event.kind(),
            vehicle:   event.vehicle().map(|v| v.0),
            node:      event.node().map(|n| n.0),
            last_edge: event.last_edge().map(|e| e.0),
            order:     event.order_id().map(|o| o.0),
        }
    }
}

/// Event counts for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub events:     u64,
    pub spawns:     u64,
    pub arrivals:   u64,
    pub loads:      u64,
    pub deliveries: u64,
    pub received:   u64,
}

impl TickSummaryRow {
    pub fn from_events(tick: Tick, events: &[Event]) -> Self {
        let mut row = Self { tick: tick.0, events: events.len() as u64, ..Self::default() };
        for event in events {
            match event {
                Event::Spawn { .. } => row.spawns += 1,
                Event::LoadOrder { .. } => row.loads += 1,
                Event::DeliverOrder { .. } => row.deliveries += 1,
                Event::OrderReceived { .. } => row.received += 1,
                e if e.is_arrival() => row.arrivals += 1,
                _ => {}
            }
        }
        row
    }
}

/// Where one vehicle is at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshotRow {
    pub vehicle:   u32,
    pub tick:      u64,
    /// `"node"` or `"edge"`.
    pub component: &'static str,
    pub id:        u32,
    pub orders:    u32,
    pub load:      f64,
}

impl VehicleSnapshotRow {
    pub fn new(tick: Tick, vehicle: &Vehicle) -> Self {
        let (component, id) = match vehicle.occupied() {
            ComponentRef::Node(n) => ("node", n.0),
            ComponentRef::Edge(e) => ("edge", e.0),
        };
        Self {
            vehicle: vehicle.id().0,
            tick: tick.0,
            component,
            id,
            orders: vehicle.orders().len() as u32,
            load: vehicle.current_weight(),
        }
    }
}
