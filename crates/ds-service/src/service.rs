//! The `DeliveryService` trait — the policy layer above the vehicle manager.

use ds_core::Tick;
use ds_routing::{ConfirmedOrder, Event, VehicleManager};

use crate::ServiceResult;

/// Decides which vehicle carries which order and where vehicles go.
///
/// A service owns the [`VehicleManager`] of its simulation and advances it
/// once per tick from [`tick`](Self::tick).
///
/// # Thread safety
///
/// Each simulation owns its service; simulations may run on separate
/// threads, so implementations must be `Send`.
pub trait DeliveryService: Send {
    /// Advance the manager to `now`, hand `new_orders` to the policy, and
    /// return the tick's events.  The returned list ends with one
    /// `OrderReceived` event per new order.
    fn tick(&mut self, now: Tick, new_orders: Vec<ConfirmedOrder>) -> ServiceResult<Vec<Event>>;

    /// Orders received but not yet loaded onto a vehicle.
    fn pending_orders(&self) -> &[ConfirmedOrder];

    fn vehicle_manager(&self) -> &VehicleManager;

    fn vehicle_manager_mut(&mut self) -> &mut VehicleManager;

    /// Forget all orders and reset the vehicle manager.
    fn reset(&mut self);
}

/// Builds a delivery service around a vehicle manager.
pub trait DeliveryServiceFactory: Send + Sync {
    fn create(&self, vehicle_manager: VehicleManager) -> Box<dyn DeliveryService>;
}

impl<F> DeliveryServiceFactory for F
where
    F: Fn(VehicleManager) -> Box<dyn DeliveryService> + Send + Sync,
{
    fn create(&self, vehicle_manager: VehicleManager) -> Box<dyn DeliveryService> {
        self(vehicle_manager)
    }
}

/// `OrderReceived` events for `orders`, in order.
pub fn order_received_events(orders: &[ConfirmedOrder], tick: Tick) -> Vec<Event> {
    orders
        .iter()
        .map(|order| Event::OrderReceived { order: order.clone(), tick })
        .collect()
}
