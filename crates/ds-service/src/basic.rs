//! FIFO reference delivery policy.

use log::{debug, warn};

use ds_core::{Location, NodeId, OrderId, Tick, VehicleId};
use ds_routing::{
    on_arrival, ComponentRef, ConfirmedOrder, Event, RoutingError, VehicleManager,
};

use crate::service::order_received_events;
use crate::{DeliveryService, DeliveryServiceFactory, ServiceResult};

/// Loads orders earliest-deadline-first onto whatever vehicles stand idle at
/// the right restaurant, then sends each loaded vehicle round its
/// neighborhoods and back.
///
/// Per tick:
///
/// 1. tick the vehicle manager;
/// 2. add the new orders to the pending list and sort it by delivery
///    deadline (stable, so equal deadlines stay first-come first-served);
/// 3. for every restaurant with pending orders, fill each idle vehicle
///    there with every pending order that still fits;
/// 4. send every idle vehicle carrying orders to each distinct destination
///    (delivering on arrival) and then back to its restaurant.
///
/// A vehicle is idle while it stands on a restaurant with nothing queued.
pub struct BasicDeliveryService {
    vehicle_manager: VehicleManager,
    pending:         Vec<ConfirmedOrder>,
}

impl BasicDeliveryService {
    pub fn new(vehicle_manager: VehicleManager) -> Self {
        Self { vehicle_manager, pending: Vec::new() }
    }

    /// Factory usable wherever a [`DeliveryServiceFactory`] is expected.
    pub fn factory() -> impl DeliveryServiceFactory {
        |vm: VehicleManager| Box::new(BasicDeliveryService::new(vm)) as Box<dyn DeliveryService>
    }

    /// Idle vehicles standing on `restaurant`, by spawn order.
    fn idle_at(&self, restaurant: NodeId) -> Vec<VehicleId> {
        self.vehicle_manager
            .vehicles()
            .filter(|v| v.occupied() == ComponentRef::Node(restaurant) && !v.is_moving())
            .map(|v| v.id())
            .collect()
    }

    fn load_pending(&mut self, now: Tick) -> ServiceResult<()> {
        let mut restaurants: Vec<NodeId> = Vec::new();
        for order in &self.pending {
            if !restaurants.contains(&order.restaurant) {
                restaurants.push(order.restaurant);
            }
        }

        for restaurant in restaurants {
            for vehicle in self.idle_at(restaurant) {
                let mut index = 0;
                while index < self.pending.len() {
                    if self.pending[index].restaurant != restaurant {
                        index += 1;
                        continue;
                    }
                    let order = self.pending.remove(index);
                    let id = order.id;
                    match self.vehicle_manager.load_order(restaurant, vehicle, order.clone(), now) {
                        Ok(()) => debug!("order {id} assigned to {vehicle}"),
                        Err(RoutingError::VehicleOverloaded { excess, .. }) => {
                            warn!("{vehicle} cannot take order {id} (over by {excess}); keeping it pending");
                            self.pending.insert(index, order);
                            index += 1;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch_loaded(&mut self) -> ServiceResult<()> {
        let mut plans: Vec<(VehicleId, NodeId, Vec<(NodeId, Vec<OrderId>)>)> = Vec::new();
        for vehicle in self.vehicle_manager.vehicles() {
            let ComponentRef::Node(at) = vehicle.occupied() else { continue };
            if vehicle.is_moving() || vehicle.orders().is_empty() || at != vehicle.starting_node() {
                continue;
            }
            let mut stops: Vec<(Location, Vec<OrderId>)> = Vec::new();
            for order in vehicle.orders() {
                match stops.iter_mut().find(|(loc, _)| *loc == order.location) {
                    Some((_, ids)) => ids.push(order.id),
                    None => stops.push((order.location, vec![order.id])),
                }
            }
            let region = self.vehicle_manager.region();
            let stops = stops
                .into_iter()
                .map(|(location, ids)| {
                    region
                        .node_id_at(location)
                        .map(|node| (node, ids))
                        .ok_or(RoutingError::LocationNotFound(location))
                })
                .collect::<Result<Vec<_>, _>>()?;
            plans.push((vehicle.id(), at, stops));
        }

        for (vehicle, home, stops) in plans {
            debug!("{vehicle} leaves for {} stop(s)", stops.len());
            for (node, ids) in stops {
                self.vehicle_manager.move_queued(
                    vehicle,
                    node,
                    on_arrival(move |vm, v, tick| {
                        for id in ids {
                            vm.deliver_order(node, v, id, tick)?;
                        }
                        Ok(())
                    }),
                )?;
            }
            self.vehicle_manager.move_queued(vehicle, home, None)?;
        }
        Ok(())
    }
}

impl DeliveryService for BasicDeliveryService {
    fn tick(&mut self, now: Tick, new_orders: Vec<ConfirmedOrder>) -> ServiceResult<Vec<Event>> {
        let mut events = self.vehicle_manager.tick(now)?;
        let received = order_received_events(&new_orders, now);

        self.pending.extend(new_orders);
        self.pending.sort_by_key(|o| o.delivery_interval.end);

        self.load_pending(now)?;
        self.dispatch_loaded()?;

        events.extend(received);
        Ok(events)
    }

    fn pending_orders(&self) -> &[ConfirmedOrder] {
        &self.pending
    }

    fn vehicle_manager(&self) -> &VehicleManager {
        &self.vehicle_manager
    }

    fn vehicle_manager_mut(&mut self) -> &mut VehicleManager {
        &mut self.vehicle_manager
    }

    fn reset(&mut self) {
        self.pending.clear();
        self.vehicle_manager.reset();
    }
}
