//! `ds-routing` — occupancy, vehicle movement, and the per-tick engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`order`]    | `ConfirmedOrder`                                                |
//! | [`event`]    | `Event`, `EventBus` (per-tick buffer, drained by value)         |
//! | [`occupied`] | `ComponentRef`, `Occupied`, `OccupiedKind`, `VehicleStats`      |
//! | [`vehicle`]  | `Vehicle`, `PathSegment`, `PlannedPath`, `ArrivalAction`        |
//! | [`manager`]  | `VehicleManager` — spawning, moves, orders, `tick`              |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                              |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ds_core::{Location, Tick};
//! use ds_region::{DijkstraPathCalculator, NodeKind, RegionBuilder};
//! use ds_routing::{Event, VehicleManager};
//!
//! let mut b = RegionBuilder::new();
//! b.add_node("A", Location::new(0, 0), NodeKind::Restaurant { available_food: vec![] }).unwrap();
//! let hood = b.add_node("B", Location::new(5, 0), NodeKind::Neighborhood).unwrap();
//! b.add_edge("A-B", Location::new(0, 0), Location::new(5, 0), 5).unwrap();
//!
//! let mut vm = VehicleManager::new(b.build_shared(), Arc::new(DijkstraPathCalculator));
//! let v = vm.add_vehicle(Location::new(0, 0), 10.0).unwrap();
//! assert!(matches!(vm.tick(Tick(0)).unwrap()[0], Event::Spawn { .. }));
//!
//! vm.move_queued(v, hood, None).unwrap();
//! for t in 1..6 {
//!     assert!(vm.tick(Tick(t)).unwrap().is_empty());
//! }
//! assert!(matches!(vm.tick(Tick(6)).unwrap()[0], Event::ArrivedAtNeighborhood { .. }));
//! ```

pub mod error;
pub mod event;
pub mod manager;
pub mod occupied;
pub mod order;
pub mod vehicle;


pub use error::{RoutingError, RoutingResult};
pub use event::{Event, EventBus};
pub use manager::VehicleManager;
pub use occupied::{ComponentRef, Occupied, OccupiedKind, VehicleStats};
pub use order::ConfirmedOrder;
pub use vehicle::{on_arrival, ArrivalAction, PathSegment, PlannedPath, Vehicle};
