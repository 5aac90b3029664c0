//! The tick-driven [`VehicleManager`].
//!
//! # Tick order
//!
//! ```text
//! tick(now)
//!  ├─ spawn pending vehicles        → Spawn events
//!  ├─ tick node wrappers (by NodeId) → vehicles leave nodes onto edges
//!  ├─ tick edge wrappers (by EdgeId) → vehicles reach nodes, arrival events
//!  └─ drain the event bus
//! ```
//!
//! Every state change stamps the vehicle's `last_moved`; a vehicle already
//! moved in tick `now` is skipped for the rest of that tick.  A vehicle that
//! enters an edge during the node phase is therefore never advanced again in
//! the edge phase, even on a zero-duration edge.

use std::sync::Arc;

use log::debug;

use ds_core::{EdgeId, Location, NodeId, OrderId, Tick, VehicleId};
use ds_region::{Edge, Node, PathCalculator, Region, RegionError};

use crate::occupied::VehicleStats;
use crate::vehicle::PathSegment;
use crate::{
    ArrivalAction, ComponentRef, ConfirmedOrder, Event, EventBus, Occupied, OccupiedKind,
    RoutingError, RoutingResult, Vehicle,
};

/// Owns the vehicles and one [`Occupied`] per region component.
///
/// Vehicles are added pending and become active at the next tick.  Vehicle
/// ids are dense indices into the manager's vehicle list and stay stable
/// across [`reset`](Self::reset).
pub struct VehicleManager {
    region:          Arc<Region>,
    path_calculator: Arc<dyn PathCalculator>,

    /// Indexed by `NodeId`.
    occupied_nodes: Vec<Occupied>,
    /// Indexed by `EdgeId`.
    occupied_edges: Vec<Occupied>,

    /// Every vehicle ever added, indexed by `VehicleId`.
    vehicles: Vec<Vehicle>,
    /// Spawned vehicles, in spawn order.
    active:   Vec<VehicleId>,
    /// Vehicles waiting for the next tick to spawn.
    pending:  Vec<VehicleId>,

    events:    EventBus,
    last_tick: Option<Tick>,
}

impl VehicleManager {
    pub fn new(region: Arc<Region>, path_calculator: Arc<dyn PathCalculator>) -> Self {
        let occupied_nodes = region
            .nodes()
            .iter()
            .map(|n| Occupied::node(n.id(), n.kind()))
            .collect();
        let occupied_edges = region
            .edges()
            .iter()
            .map(|e| Occupied::edge(e.id()))
            .collect();
        Self {
            region,
            path_calculator,
            occupied_nodes,
            occupied_edges,
            vehicles: Vec::new(),
            active: Vec::new(),
            pending: Vec::new(),
            events: EventBus::new(),
            last_tick: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    pub fn path_calculator(&self) -> &Arc<dyn PathCalculator> {
        &self.path_calculator
    }

    /// The last tick processed, `None` before the first tick or after reset.
    pub fn current_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    /// Active (spawned) vehicles, in spawn order.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.active.iter().map(|id| &self.vehicles[id.index()])
    }

    /// Active and pending vehicles, by id.
    pub fn all_vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn is_active(&self, id: VehicleId) -> bool {
        self.active.contains(&id)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Events posted here between ticks are returned by the next tick.
    pub fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // ── Occupancy queries ─────────────────────────────────────────────────

    /// The wrapper of `component`.
    ///
    /// # Errors
    ///
    /// [`RoutingError::ComponentNotFound`] if `component` is out of range
    /// for this manager's region.
    pub fn occupied(&self, component: ComponentRef) -> RoutingResult<&Occupied> {
        let wrapper = match component {
            ComponentRef::Node(n) => self.occupied_nodes.get(n.index()),
            ComponentRef::Edge(e) => self.occupied_edges.get(e.index()),
        };
        wrapper.ok_or(RoutingError::ComponentNotFound(component))
    }

    /// The wrapper of `node`, checked against the region it was created for.
    ///
    /// A bare [`ComponentRef`] is only an index; use this (or
    /// [`occupied_for_edge`](Self::occupied_for_edge)) when the component may
    /// come from another region.
    ///
    /// # Errors
    ///
    /// [`RoutingError::ComponentNotFound`] if `node` belongs to another
    /// region or was never inserted into this one.
    pub fn occupied_for_node(&self, node: &Node) -> RoutingResult<&Occupied> {
        let component = ComponentRef::Node(node.id());
        if node.region() != self.region.id() || self.region.node(node.id()).is_none() {
            return Err(RoutingError::ComponentNotFound(component));
        }
        self.occupied(component)
    }

    /// The wrapper of `edge`, checked against the region it was created for.
    pub fn occupied_for_edge(&self, edge: &Edge) -> RoutingResult<&Occupied> {
        let component = ComponentRef::Edge(edge.id());
        if edge.region() != self.region.id() || self.region.edge(edge.id()).is_none() {
            return Err(RoutingError::ComponentNotFound(component));
        }
        self.occupied(component)
    }

    /// The wrapper of the node at `location`.
    pub fn occupied_node(&self, location: Location) -> RoutingResult<&Occupied> {
        let node = self
            .region
            .node_id_at(location)
            .ok_or(RoutingError::LocationNotFound(location))?;
        Ok(&self.occupied_nodes[node.index()])
    }

    /// All node wrappers, indexed by `NodeId`.
    pub fn occupied_nodes(&self) -> &[Occupied] {
        &self.occupied_nodes
    }

    /// All edge wrappers, indexed by `EdgeId`.
    pub fn occupied_edges(&self) -> &[Occupied] {
        &self.occupied_edges
    }

    pub fn occupied_restaurants(&self) -> impl Iterator<Item = &Occupied> + '_ {
        self.occupied_nodes
            .iter()
            .filter(|o| o.kind() == OccupiedKind::Restaurant)
    }

    pub fn occupied_restaurant(&self, node: NodeId) -> RoutingResult<&Occupied> {
        self.occupied_of_kind(node, OccupiedKind::Restaurant)
    }

    pub fn occupied_neighborhoods(&self) -> impl Iterator<Item = &Occupied> + '_ {
        self.occupied_nodes
            .iter()
            .filter(|o| o.kind() == OccupiedKind::Neighborhood)
    }

    pub fn occupied_neighborhood(&self, node: NodeId) -> RoutingResult<&Occupied> {
        self.occupied_of_kind(node, OccupiedKind::Neighborhood)
    }

    /// The component `vehicle` was on before its current one.
    pub fn previous_occupied(&self, vehicle: VehicleId) -> Option<ComponentRef> {
        let current = self.vehicle(vehicle)?.occupied;
        self.wrapper(current).stats(vehicle)?.previous
    }

    fn occupied_of_kind(&self, node: NodeId, expected: OccupiedKind) -> RoutingResult<&Occupied> {
        let component = ComponentRef::Node(node);
        let wrapper = self.occupied(component)?;
        if wrapper.kind() != expected {
            return Err(RoutingError::WrongComponentKind {
                component,
                expected,
                found: wrapper.kind(),
            });
        }
        Ok(wrapper)
    }

    // ── Vehicles ──────────────────────────────────────────────────────────

    /// Add a vehicle at the restaurant at `location`.
    ///
    /// The vehicle is pending: it is placed on the restaurant and emits its
    /// `Spawn` event at the next tick.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::LocationNotFound`] if no node sits at `location`.
    /// - [`RoutingError::NotARestaurant`] if the node is not a restaurant.
    pub fn add_vehicle(&mut self, location: Location, capacity: f64) -> RoutingResult<VehicleId> {
        let node = self
            .region
            .node_at(location)
            .ok_or(RoutingError::LocationNotFound(location))?;
        if !node.kind().is_restaurant() {
            return Err(RoutingError::NotARestaurant(location));
        }
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, capacity, node.id()));
        self.pending.push(id);
        debug!("added {id} (capacity {capacity}) at {}", node.name());
        Ok(id)
    }

    /// Queue a move to `target` after every move already queued.
    ///
    /// The path starts where the vehicle will be once its queue is done:
    /// the destination of the last segment, its current node, or the far end
    /// of its current edge.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::SelfMove`] if the queue is empty and the vehicle
    ///   already rests on `target`.
    /// - [`RoutingError::Path`] if no path exists.
    ///
    /// The queue is unchanged on error.
    pub fn move_queued(
        &mut self,
        vehicle: VehicleId,
        target:  NodeId,
        action:  Option<ArrivalAction>,
    ) -> RoutingResult<()> {
        self.check_target(target)?;
        let v = self.vehicle_ref(vehicle)?;
        if v.move_queue.is_empty() && v.occupied == ComponentRef::Node(target) {
            return Err(RoutingError::SelfMove { vehicle, node: target });
        }
        let from = match v.planned_end() {
            Some(node) => node,
            None => self.far_end(vehicle)?,
        };
        let nodes = self.path_calculator.path(&self.region, from, target)?;
        self.vehicles[vehicle.index()]
            .move_queue
            .push_back(PathSegment::new(nodes, target, action));
        Ok(())
    }

    /// Replace every queued move with a single move to `target`.
    ///
    /// A vehicle on an edge first finishes the edge: the new segment starts
    /// with the endpoint opposite the node it entered the edge from.
    ///
    /// # Errors
    ///
    /// As [`move_queued`](Self::move_queued), evaluated before the queue is
    /// touched: a vehicle resting on `target` is a self-move even with moves
    /// queued.
    pub fn move_direct(
        &mut self,
        vehicle: VehicleId,
        target:  NodeId,
        action:  Option<ArrivalAction>,
    ) -> RoutingResult<()> {
        self.check_target(target)?;
        let occupied = self.vehicle_ref(vehicle)?.occupied;
        let nodes = match occupied {
            ComponentRef::Node(node) if node == target => {
                return Err(RoutingError::SelfMove { vehicle, node: target });
            }
            ComponentRef::Node(node) => self.path_calculator.path(&self.region, node, target)?,
            ComponentRef::Edge(_) => {
                let far = self.far_end(vehicle)?;
                let mut nodes = vec![far];
                nodes.extend(self.path_calculator.path(&self.region, far, target)?);
                nodes
            }
        };
        let queue = &mut self.vehicles[vehicle.index()].move_queue;
        queue.clear();
        queue.push_back(PathSegment::new(nodes, target, action));
        Ok(())
    }

    // ── Orders ────────────────────────────────────────────────────────────

    /// Load `order` onto `vehicle` at `restaurant`.  Emits `LoadOrder`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::WrongComponentKind`] if `restaurant` is not one.
    /// - [`RoutingError::VehicleNotPresent`] if the vehicle is elsewhere.
    /// - [`RoutingError::WrongRestaurant`] if the order is picked up elsewhere.
    /// - [`RoutingError::VehicleOverloaded`] if it does not fit; the vehicle
    ///   keeps its current load.
    pub fn load_order(
        &mut self,
        restaurant: NodeId,
        vehicle:    VehicleId,
        order:      ConfirmedOrder,
        tick:       Tick,
    ) -> RoutingResult<()> {
        let wrapper = self.occupied_restaurant(restaurant)?;
        self.vehicle_ref(vehicle)?;
        if !wrapper.contains(vehicle) {
            return Err(RoutingError::VehicleNotPresent {
                vehicle,
                component: wrapper.component(),
            });
        }
        if order.restaurant != restaurant {
            return Err(RoutingError::WrongRestaurant { order: order.id, restaurant });
        }
        self.vehicles[vehicle.index()].load_order(order.clone())?;
        debug!("{vehicle} loaded order {} at {restaurant}", order.id);
        self.events.queue_post(Event::LoadOrder { vehicle, node: restaurant, order, tick });
        Ok(())
    }

    /// Hand over order `order` from `vehicle` at `neighborhood`.
    ///
    /// Stamps `actual_delivery_tick`, emits `DeliverOrder`, and returns the
    /// delivered order.
    pub fn deliver_order(
        &mut self,
        neighborhood: NodeId,
        vehicle:      VehicleId,
        order:        OrderId,
        tick:         Tick,
    ) -> RoutingResult<ConfirmedOrder> {
        let wrapper = self.occupied_neighborhood(neighborhood)?;
        self.vehicle_ref(vehicle)?;
        if !wrapper.contains(vehicle) {
            return Err(RoutingError::VehicleNotPresent {
                vehicle,
                component: wrapper.component(),
            });
        }
        let mut delivered = self.vehicles[vehicle.index()]
            .unload_order(order)
            .ok_or(RoutingError::OrderNotCarried { vehicle, order })?;
        delivered.actual_delivery_tick = Some(tick);
        debug!("{vehicle} delivered order {order} at {neighborhood}");
        self.events.queue_post(Event::DeliverOrder {
            vehicle,
            node: neighborhood,
            order: delivered.clone(),
            tick,
        });
        Ok(delivered)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the simulation to `now` and return every event of the tick.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::NonMonotonicTick`] unless `now` is later than the
    ///   previous tick.
    /// - Any error returned by an arrival action.  The rest of the tick is
    ///   abandoned and every event queued so far is discarded, so none of
    ///   them shows up in a later tick.  Moves already made stay made, and
    ///   `now` still counts as processed.
    pub fn tick(&mut self, now: Tick) -> RoutingResult<Vec<Event>> {
        if let Some(last) = self.last_tick {
            if now <= last {
                return Err(RoutingError::NonMonotonicTick { last, now });
            }
        }
        self.last_tick = Some(now);

        if let Err(e) = self.advance_all(now) {
            self.events.clear();
            return Err(e);
        }
        Ok(self.events.pop_events())
    }

    fn advance_all(&mut self, now: Tick) -> RoutingResult<()> {
        for id in std::mem::take(&mut self.pending) {
            self.spawn(id, now);
        }

        for index in 0..self.occupied_nodes.len() {
            let component = ComponentRef::Node(NodeId(index as u32));
            let due = self.occupied_nodes[index].due_vehicles(now, 0);
            for vehicle in due {
                self.advance(vehicle, component, now)?;
            }
        }

        for index in 0..self.occupied_edges.len() {
            let component = ComponentRef::Edge(EdgeId(index as u32));
            let duration = self.region.edges()[index].duration();
            let due = self.occupied_edges[index].due_vehicles(now, duration);
            for vehicle in due {
                self.advance(vehicle, component, now)?;
            }
        }
        Ok(())
    }

    /// Return to the pre-simulation state.
    ///
    /// Every wrapper is emptied, every vehicle goes back to its starting
    /// restaurant with no orders and no queue, and all vehicles become
    /// pending again in id order, so the next tick re-emits their spawns.
    /// Calling this twice is the same as calling it once.
    pub fn reset(&mut self) {
        for wrapper in self.occupied_nodes.iter_mut().chain(self.occupied_edges.iter_mut()) {
            wrapper.reset();
        }
        for vehicle in &mut self.vehicles {
            vehicle.reset();
        }
        self.active.clear();
        self.pending = self.vehicles.iter().map(Vehicle::id).collect();
        self.events.clear();
        self.last_tick = None;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn spawn(&mut self, id: VehicleId, now: Tick) {
        let node = self.vehicles[id.index()].starting_node;
        let vehicle = &mut self.vehicles[id.index()];
        vehicle.occupied = ComponentRef::Node(node);
        vehicle.last_moved = Some(now);
        self.occupied_nodes[node.index()].insert(id, VehicleStats { arrived_at: now, previous: None });
        self.active.push(id);
        debug!("spawned {id} at {node} in {now}");
        self.events.queue_post(Event::Spawn { vehicle: id, node, tick: now });
    }

    /// Move `vehicle` if it is still on `component` and has not moved yet
    /// this tick.
    fn advance(&mut self, vehicle: VehicleId, component: ComponentRef, now: Tick) -> RoutingResult<()> {
        let v = &self.vehicles[vehicle.index()];
        if v.occupied != component || v.last_moved == Some(now) {
            return Ok(());
        }
        self.move_vehicle(vehicle, now)
    }

    /// Perform at most one state change for `vehicle`.
    fn move_vehicle(&mut self, vehicle: VehicleId, now: Tick) -> RoutingResult<()> {
        loop {
            let v = &mut self.vehicles[vehicle.index()];
            let next = match v.move_queue.front() {
                None => return Ok(()),
                Some(segment) => segment.nodes.front().copied(),
            };

            let Some(next) = next else {
                // Head segment done: run its action, or fall through to the next one.
                let action = v.move_queue.pop_front().and_then(|s| s.action);
                match action {
                    Some(action) => return action(self, vehicle, now),
                    None => continue,
                }
            };

            let occupied = v.occupied;
            return match occupied {
                ComponentRef::Node(node) => {
                    let edge = self
                        .region
                        .edge_between(node, next)
                        .ok_or(RegionError::NoPath { from: node, to: next })?
                        .id();
                    self.enter(vehicle, ComponentRef::Edge(edge), now);
                    Ok(())
                }
                ComponentRef::Edge(_) => {
                    if let Some(segment) = v.move_queue.front_mut() {
                        segment.nodes.pop_front();
                    }
                    self.enter(vehicle, ComponentRef::Node(next), now);
                    self.complete_exhausted(vehicle, now)
                }
            };
        }
    }

    /// After reaching a node: finish every segment that ended there,
    /// stopping at the first one carrying an action.
    fn complete_exhausted(&mut self, vehicle: VehicleId, now: Tick) -> RoutingResult<()> {
        loop {
            let v = &mut self.vehicles[vehicle.index()];
            match v.move_queue.front() {
                Some(segment) if segment.is_exhausted() => {}
                _ => return Ok(()),
            }
            if let Some(action) = v.move_queue.pop_front().and_then(|s| s.action) {
                return action(self, vehicle, now);
            }
        }
    }

    /// Move `vehicle` onto `to` and emit the arrival event for node kinds.
    fn enter(&mut self, vehicle: VehicleId, to: ComponentRef, now: Tick) {
        let from = self.vehicles[vehicle.index()].occupied;
        self.wrapper_mut(from).remove(vehicle);
        self.wrapper_mut(to).insert(vehicle, VehicleStats { arrived_at: now, previous: Some(from) });

        let v = &mut self.vehicles[vehicle.index()];
        v.occupied = to;
        v.last_moved = Some(now);
        debug!("{vehicle} {from} -> {to} in {now}");

        let ComponentRef::Node(node) = to else { return };
        let last_edge = from.as_edge().unwrap_or(EdgeId::INVALID);
        debug_assert!(from.as_edge().is_some(), "nodes are only entered from edges");
        let event = match self.occupied_nodes[node.index()].kind() {
            OccupiedKind::Restaurant => Event::ArrivedAtRestaurant { vehicle, node, last_edge, tick: now },
            OccupiedKind::Neighborhood => Event::ArrivedAtNeighborhood { vehicle, node, last_edge, tick: now },
            OccupiedKind::Node | OccupiedKind::Edge => Event::ArrivedAtNode { vehicle, node, last_edge, tick: now },
        };
        self.events.queue_post(event);
    }

    /// Far endpoint of the edge `vehicle` is on, relative to the node it
    /// entered from.
    fn far_end(&self, vehicle: VehicleId) -> RoutingResult<NodeId> {
        let v = self.vehicle_ref(vehicle)?;
        let ComponentRef::Edge(edge_id) = v.occupied else {
            return Err(RoutingError::VehicleNotPresent { vehicle, component: v.occupied });
        };
        let edge = self
            .region
            .edge(edge_id)
            .ok_or(RoutingError::ComponentNotFound(v.occupied))?;
        let entered_from = self
            .wrapper(v.occupied)
            .stats(vehicle)
            .and_then(|s| s.previous)
            .and_then(ComponentRef::as_node)
            .ok_or(RoutingError::VehicleNotPresent { vehicle, component: v.occupied })?;
        edge.other_end(entered_from)
            .ok_or(RoutingError::VehicleNotPresent { vehicle, component: v.occupied })
    }

    fn check_target(&self, target: NodeId) -> RoutingResult<()> {
        if target.index() >= self.occupied_nodes.len() {
            return Err(RoutingError::ComponentNotFound(ComponentRef::Node(target)));
        }
        Ok(())
    }

    fn vehicle_ref(&self, id: VehicleId) -> RoutingResult<&Vehicle> {
        self.vehicles.get(id.index()).ok_or(RoutingError::UnknownVehicle(id))
    }

    /// Wrapper for a component already known to be valid.
    fn wrapper(&self, component: ComponentRef) -> &Occupied {
        match component {
            ComponentRef::Node(n) => &self.occupied_nodes[n.index()],
            ComponentRef::Edge(e) => &self.occupied_edges[e.index()],
        }
    }

    fn wrapper_mut(&mut self, component: ComponentRef) -> &mut Occupied {
        match component {
            ComponentRef::Node(n) => &mut self.occupied_nodes[n.index()],
            ComponentRef::Edge(e) => &mut self.occupied_edges[e.index()],
        }
    }
}
