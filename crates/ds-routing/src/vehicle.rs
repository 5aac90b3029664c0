//! Vehicles and their movement queues.
//!
//! # Movement model
//!
//! A vehicle holds a queue of [`PathSegment`]s.  Each segment is the list of
//! nodes still to visit on the way to its destination plus an optional
//! [`ArrivalAction`] run when the destination is reached.  One state change
//! happens per tick at most: node → edge, or edge → node.  Segments are
//! planned by the vehicle manager through its injected path calculator.

use std::collections::VecDeque;
use std::fmt;

use ds_core::{NodeId, OrderId, Tick, VehicleId};

use crate::{ComponentRef, ConfirmedOrder, RoutingError, RoutingResult, VehicleManager};

/// Callback run when a vehicle completes a queued segment.
///
/// It receives the manager, so it can queue further moves or load and
/// deliver orders.  An error aborts the current tick and is returned from
/// [`VehicleManager::tick`].
pub type ArrivalAction =
    Box<dyn FnOnce(&mut VehicleManager, VehicleId, Tick) -> RoutingResult<()> + Send>;

/// Box `f` as the arrival action of a move.
pub fn on_arrival<F>(f: F) -> Option<ArrivalAction>
where
    F: FnOnce(&mut VehicleManager, VehicleId, Tick) -> RoutingResult<()> + Send + 'static,
{
    Some(Box::new(f))
}

// ── PathSegment ───────────────────────────────────────────────────────────────

/// One queued leg: the remaining nodes to visit, ending at `destination`.
pub struct PathSegment {
    pub(crate) nodes:       VecDeque<NodeId>,
    pub(crate) destination: NodeId,
    pub(crate) action:      Option<ArrivalAction>,
}

impl PathSegment {
    pub(crate) fn new(nodes: Vec<NodeId>, destination: NodeId, action: Option<ArrivalAction>) -> Self {
        Self { nodes: nodes.into(), destination, action }
    }

    pub fn remaining(&self) -> &VecDeque<NodeId> {
        &self.nodes
    }

    #[inline]
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    #[inline]
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathSegment")
            .field("nodes", &self.nodes)
            .field("destination", &self.destination)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Read-only copy of a queued segment, as returned by [`Vehicle::paths`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedPath {
    pub nodes:       Vec<NodeId>,
    pub destination: NodeId,
    pub has_action:  bool,
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// A delivery vehicle.
///
/// Owned by the [`VehicleManager`]; all mutation goes through it so that
/// `occupied` always names a wrapper that lists the vehicle.
#[derive(Debug)]
pub struct Vehicle {
    pub(crate) id:            VehicleId,
    pub(crate) capacity:      f64,
    pub(crate) orders:        Vec<ConfirmedOrder>,
    pub(crate) occupied:      ComponentRef,
    pub(crate) starting_node: NodeId,
    pub(crate) move_queue:    VecDeque<PathSegment>,
    /// Tick of the last state change.  A vehicle moves at most once per tick.
    pub(crate) last_moved:    Option<Tick>,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleId, capacity: f64, starting_node: NodeId) -> Self {
        Self {
            id,
            capacity,
            orders: Vec::new(),
            occupied: ComponentRef::Node(starting_node),
            starting_node,
            move_queue: VecDeque::new(),
            last_moved: None,
        }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn orders(&self) -> &[ConfirmedOrder] {
        &self.orders
    }

    pub fn carries(&self, order: OrderId) -> bool {
        self.orders.iter().any(|o| o.id == order)
    }

    /// Sum of the weights of all loaded orders.
    pub fn current_weight(&self) -> f64 {
        self.orders.iter().map(|o| o.weight).sum()
    }

    /// Capacity left for further orders.
    pub fn remaining_capacity(&self) -> f64 {
        self.capacity - self.current_weight()
    }

    /// The component the vehicle is on (or will spawn on, while pending).
    #[inline]
    pub fn occupied(&self) -> ComponentRef {
        self.occupied
    }

    /// The restaurant the vehicle spawns at and returns to on reset.
    #[inline]
    pub fn starting_node(&self) -> NodeId {
        self.starting_node
    }

    #[inline]
    pub fn last_moved(&self) -> Option<Tick> {
        self.last_moved
    }

    /// `true` while segments remain queued.
    pub fn is_moving(&self) -> bool {
        !self.move_queue.is_empty()
    }

    /// Snapshot of the queued segments, head first.
    pub fn paths(&self) -> Vec<PlannedPath> {
        self.move_queue
            .iter()
            .map(|s| PlannedPath {
                nodes:       s.nodes.iter().copied().collect(),
                destination: s.destination,
                has_action:  s.action.is_some(),
            })
            .collect()
    }

    /// Where the vehicle stands once its queue is empty: the destination of
    /// the last segment, or its current node.  `None` mid-edge with no queue.
    pub fn planned_end(&self) -> Option<NodeId> {
        match self.move_queue.back() {
            Some(segment) => Some(segment.destination),
            None => self.occupied.as_node(),
        }
    }

    /// Add `order` if it fits.  A failed load leaves the vehicle untouched.
    pub(crate) fn load_order(&mut self, order: ConfirmedOrder) -> RoutingResult<()> {
        let potential = self.current_weight() + order.weight;
        if potential > self.capacity {
            return Err(RoutingError::VehicleOverloaded {
                vehicle: self.id,
                excess:  potential - self.capacity,
            });
        }
        self.orders.push(order);
        Ok(())
    }

    /// Remove and return the order with id `order`, if carried.
    pub(crate) fn unload_order(&mut self, order: OrderId) -> Option<ConfirmedOrder> {
        let index = self.orders.iter().position(|o| o.id == order)?;
        Some(self.orders.remove(index))
    }

    /// Back to the starting restaurant with no orders and no queued moves.
    pub(crate) fn reset(&mut self) {
        self.occupied = ComponentRef::Node(self.starting_node);
        self.move_queue.clear();
        self.orders.clear();
        self.last_moved = None;
    }
}
