//! Unit tests for ds-service.

use std::sync::Arc;

use ds_core::{Location, NodeId, OrderId, SimRng, Tick, TickInterval};
use ds_region::{DijkstraPathCalculator, NodeKind, RegionBuilder};
use ds_routing::{ComponentRef, ConfirmedOrder, Event, VehicleManager};

use crate::{
    BasicDeliveryService, DeliveryService, DeliveryServiceFactory, EmptyOrderGenerator,
    FridayOrderGenerator, OrderGeneratorFactory, ServiceError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const R: Location = Location { x: 0, y: 0 };
const H: Location = Location { x: 5, y: 0 };

/// Restaurant R(0,0) —5— neighborhood H(5,0).
fn manager() -> VehicleManager {
    let mut b = RegionBuilder::new();
    b.add_node("R", R, NodeKind::Restaurant { available_food: vec!["pizza".into(), "pasta".into()] })
        .unwrap();
    b.add_node("H", H, NodeKind::Neighborhood).unwrap();
    b.add_edge("R-H", R, H, 5).unwrap();
    VehicleManager::new(b.build_shared(), Arc::new(DijkstraPathCalculator))
}

/// Basic service over [`manager`] with one vehicle of `capacity` at R.
fn service(capacity: f64) -> BasicDeliveryService {
    let mut vm = manager();
    vm.add_vehicle(R, capacity).unwrap();
    BasicDeliveryService::new(vm)
}

fn order(id: u64, weight: f64, deadline: u64) -> ConfirmedOrder {
    ConfirmedOrder::new(
        OrderId(id),
        H,
        NodeId(0),
        TickInterval::new(Tick(0), Tick(deadline)),
        vec!["pizza".into()],
        weight,
    )
}

/// Tick `svc` from `from` to `to` inclusive with no new orders, collecting events.
fn run(svc: &mut dyn DeliveryService, from: u64, to: u64) -> Vec<Event> {
    (from..=to).flat_map(|t| svc.tick(Tick(t), vec![]).unwrap()).collect()
}

fn kinds(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::kind).collect()
}

// ── BasicDeliveryService ──────────────────────────────────────────────────────

#[cfg(test)]
mod basic {
    use super::*;

    #[test]
    fn order_received_events_close_the_tick() {
        let mut svc = service(1.0);
        let events = svc.tick(Tick(0), vec![order(1, 0.2, 20)]).unwrap();
        assert_eq!(kinds(&events), ["spawn", "order_received"]);
        assert_eq!(events[1].order_id(), Some(OrderId(1)));
    }

    #[test]
    fn delivers_and_returns() {
        let mut svc = service(1.0);
        svc.tick(Tick(0), vec![order(1, 0.4, 20)]).unwrap();
        assert!(svc.pending_orders().is_empty());

        let vm = svc.vehicle_manager();
        let v = vm.all_vehicles()[0].id();
        assert!(vm.all_vehicles()[0].carries(OrderId(1)));
        assert_eq!(vm.all_vehicles()[0].paths().len(), 2);

        // Loading happened after the manager tick, so its event surfaces next tick.
        let t1 = svc.tick(Tick(1), vec![]).unwrap();
        assert_eq!(kinds(&t1), ["load_order"]);

        let t6 = run(&mut svc, 2, 6);
        let delivered = t6
            .iter()
            .find_map(|e| match e {
                Event::DeliverOrder { order, tick, vehicle, .. } => Some((order.clone(), *tick, *vehicle)),
                _ => None,
            })
            .unwrap();
        assert_eq!(delivered.1, Tick(6));
        assert_eq!(delivered.2, v);
        assert_eq!(delivered.0.actual_delivery_tick, Some(Tick(6)));

        let back = run(&mut svc, 7, 12);
        assert_eq!(kinds(&back), ["arrived_at_restaurant"]);
        let vehicle = &svc.vehicle_manager().all_vehicles()[0];
        assert_eq!(vehicle.occupied(), ComponentRef::Node(NodeId(0)));
        assert!(!vehicle.is_moving());
        assert!(vehicle.orders().is_empty());
    }

    #[test]
    fn orders_that_do_not_fit_wait_for_the_next_trip() {
        let mut svc = service(1.0);
        svc.tick(Tick(0), vec![order(1, 0.6, 20), order(2, 0.6, 20)]).unwrap();
        assert_eq!(svc.pending_orders().len(), 1);
        assert_eq!(svc.pending_orders()[0].id, OrderId(2));

        run(&mut svc, 1, 11);
        assert_eq!(svc.pending_orders().len(), 1);

        // Back at R on tick 12: the second order is loaded and dispatched.
        svc.tick(Tick(12), vec![]).unwrap();
        assert!(svc.pending_orders().is_empty());
        let vehicle = &svc.vehicle_manager().all_vehicles()[0];
        assert!(vehicle.carries(OrderId(2)));
        assert!(vehicle.is_moving());
    }

    #[test]
    fn overloaded_order_is_skipped_not_lost() {
        let mut svc = service(1.0);
        svc.tick(Tick(0), vec![order(1, 0.6, 10), order(2, 0.6, 15), order(3, 0.3, 20)])
            .unwrap();

        // 2 overflows after 1; 3 still fits behind it.
        let vehicle = &svc.vehicle_manager().all_vehicles()[0];
        assert!(vehicle.carries(OrderId(1)));
        assert!(vehicle.carries(OrderId(3)));
        assert!(!vehicle.carries(OrderId(2)));
        let pending: Vec<OrderId> = svc.pending_orders().iter().map(|o| o.id).collect();
        assert_eq!(pending, [OrderId(2)]);
    }

    #[test]
    fn earliest_deadline_loads_first() {
        let mut svc = service(0.5);
        svc.tick(Tick(0), vec![order(1, 0.4, 30), order(2, 0.4, 10)]).unwrap();
        let vehicle = &svc.vehicle_manager().all_vehicles()[0];
        assert!(vehicle.carries(OrderId(2)));
        assert!(!vehicle.carries(OrderId(1)));
    }

    #[test]
    fn loaded_vehicle_is_dispatched_once() {
        let mut svc = service(1.0);
        svc.tick(Tick(0), vec![order(1, 0.1, 20)]).unwrap();
        svc.tick(Tick(1), vec![order(2, 0.1, 20)]).unwrap();
        // The vehicle left on tick 1, so order 2 waits and no extra legs are queued.
        assert_eq!(svc.pending_orders().len(), 1);
        assert_eq!(svc.vehicle_manager().all_vehicles()[0].paths().len(), 2);
    }

    #[test]
    fn reset_forgets_orders_and_respawns() {
        let mut svc = service(1.0);
        svc.tick(Tick(0), vec![order(1, 0.6, 20), order(2, 0.6, 20)]).unwrap();
        run(&mut svc, 1, 3);
        svc.reset();
        assert!(svc.pending_orders().is_empty());
        assert_eq!(svc.vehicle_manager().current_tick(), None);

        let events = svc.tick(Tick(0), vec![]).unwrap();
        assert_eq!(kinds(&events), ["spawn"]);
        assert!(svc.vehicle_manager().all_vehicles()[0].orders().is_empty());
    }

    #[test]
    fn factory_wraps_manager() {
        let mut vm = manager();
        vm.add_vehicle(R, 1.0).unwrap();
        let mut svc = BasicDeliveryService::factory().create(vm);
        assert_eq!(svc.vehicle_manager().all_vehicles().len(), 1);
        assert_eq!(kinds(&svc.tick(Tick(0), vec![]).unwrap()), ["spawn"]);
    }

    #[test]
    fn stale_tick_surfaces_as_routing_error() {
        let mut svc = service(1.0);
        svc.tick(Tick(3), vec![]).unwrap();
        assert!(matches!(svc.tick(Tick(3), vec![]), Err(ServiceError::Routing(_))));
    }
}

// ── Order generators ──────────────────────────────────────────────────────────

#[cfg(test)]
mod generators {
    use super::*;

    fn collect(factory: &dyn OrderGeneratorFactory, last_tick: u64) -> Vec<ConfirmedOrder> {
        let vm = manager();
        let mut rng = SimRng::new(1);
        let mut generator = factory.create(&vm, &mut rng).unwrap();
        (0..=last_tick).flat_map(|t| generator.generate_orders(Tick(t))).collect()
    }

    #[test]
    fn empty_generator_is_empty() {
        assert!(collect(&EmptyOrderGenerator, 50).is_empty());
    }

    #[test]
    fn friday_places_every_order_within_the_evening() {
        let factory = FridayOrderGenerator::builder()
            .order_count(60)
            .last_tick(40)
            .delivery_interval(15)
            .max_weight(0.5)
            .seed(3)
            .build()
            .unwrap();
        let orders = collect(&factory, 40);
        assert_eq!(orders.len(), 60);

        for (i, o) in orders.iter().enumerate() {
            assert_eq!(o.id, OrderId(i as u64));
            assert_eq!(o.location, H);
            assert_eq!(o.restaurant, NodeId(0));
            assert_eq!(o.delivery_interval.duration(), 15);
            assert!(o.delivery_interval.start <= Tick(40));
            assert!((0.0..0.5).contains(&o.weight));
            assert!((1..10).contains(&o.food.len()));
            assert!(o.food.iter().all(|f| f == "pizza" || f == "pasta"));
        }
        assert!(orders.windows(2).all(|w| w[0].delivery_interval.start <= w[1].delivery_interval.start));
    }

    #[test]
    fn friday_is_reproducible_from_its_seed() {
        let factory = FridayOrderGenerator::builder().order_count(30).last_tick(20).seed(9).build().unwrap();
        assert_eq!(collect(&factory, 20), collect(&factory, 20));
    }

    #[test]
    fn friday_ticks_after_the_schedule_are_quiet() {
        let factory = FridayOrderGenerator::builder().order_count(10).last_tick(5).seed(1).build().unwrap();
        let vm = manager();
        let mut generator = factory.create(&vm, &mut SimRng::new(0)).unwrap();
        let total: usize = (0..=5).map(|t| generator.generate_orders(Tick(t)).len()).sum();
        assert_eq!(total, 10);
        assert!(generator.generate_orders(Tick(3)).is_empty());
        assert!(generator.generate_orders(Tick(6)).is_empty());
    }

    #[test]
    fn friday_needs_restaurants_and_neighborhoods() {
        let mut b = RegionBuilder::new();
        b.add_node("R", R, NodeKind::Restaurant { available_food: vec![] }).unwrap();
        let vm = VehicleManager::new(b.build_shared(), Arc::new(DijkstraPathCalculator));
        let factory = FridayOrderGenerator::builder().build().unwrap();
        let err = factory.create(&vm, &mut SimRng::new(0)).err().unwrap();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn friday_rejects_bad_parameters() {
        assert!(FridayOrderGenerator::builder().standard_deviation(0.0).build().is_err());
        assert!(FridayOrderGenerator::builder().max_weight(-1.0).build().is_err());
        assert!(FridayOrderGenerator::builder().max_weight(f64::INFINITY).build().is_err());
    }
}
