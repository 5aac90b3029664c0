use thiserror::Error;

use ds_core::{Location, NodeId, OrderId, Tick, VehicleId};
use ds_region::RegionError;

use crate::{ComponentRef, OccupiedKind};

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("vehicle {vehicle} is already at {node} and has no queued moves")]
    SelfMove { vehicle: VehicleId, node: NodeId },

    #[error("vehicles can only spawn at restaurants; {0} is not one")]
    NotARestaurant(Location),

    #[error("no node at {0}")]
    LocationNotFound(Location),

    #[error("vehicle {0} is not managed here")]
    UnknownVehicle(VehicleId),

    #[error("{0} is not a component of this manager's region")]
    ComponentNotFound(ComponentRef),

    #[error("{component} is a {found:?}, expected a {expected:?}")]
    WrongComponentKind {
        component: ComponentRef,
        expected:  OccupiedKind,
        found:     OccupiedKind,
    },

    #[error("vehicle {vehicle} is not at {component}")]
    VehicleNotPresent { vehicle: VehicleId, component: ComponentRef },

    #[error("order {order} does not belong to restaurant {restaurant}")]
    WrongRestaurant { order: OrderId, restaurant: NodeId },

    #[error("vehicle {vehicle} does not carry order {order}")]
    OrderNotCarried { vehicle: VehicleId, order: OrderId },

    #[error("vehicle {vehicle} would be overloaded by {excess}")]
    VehicleOverloaded { vehicle: VehicleId, excess: f64 },

    #[error("tick {now} does not follow previous tick {last}")]
    NonMonotonicTick { last: Tick, now: Tick },

    #[error("path planning failed: {0}")]
    Path(#[from] RegionError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
