//! Unit tests for ds-sim.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ds_core::{Location, NodeId, OrderId, SimConfig, SimRng, Tick, TickInterval};
use ds_rating::{AmountDeliveredRater, InTimeRater, RaterFactory, RatingCriteria};
use ds_region::{NodeKind, Region, RegionBuilder};
use ds_routing::{ConfirmedOrder, Event, VehicleManager};
use ds_service::{
    BasicDeliveryService, FridayOrderGenerator, OrderGenerator, OrderGeneratorFactory, ServiceResult,
};

use crate::{
    NoopHooks, NoopObserver, ProblemArchetype, Runner, RunnerHooks, RunnerResult, SimError, SimObserver,
    Simulation, SimulationBuilder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const R: Location = Location { x: 0, y: 0 };
const H: Location = Location { x: 5, y: 0 };

/// Restaurant R(0,0) —5— neighborhood H(5,0).
fn region() -> Arc<Region> {
    let mut b = RegionBuilder::new();
    b.add_node("R", R, NodeKind::Restaurant { available_food: vec!["soup".into()] }).unwrap();
    b.add_node("H", H, NodeKind::Neighborhood).unwrap();
    b.add_edge("R-H", R, H, 5).unwrap();
    b.build_shared()
}

fn config(total_ticks: u64) -> SimConfig {
    SimConfig { total_ticks, seed: 7, runs: 1, output_interval_ticks: 1 }
}

fn order(id: u64) -> ConfirmedOrder {
    ConfirmedOrder::new(OrderId(id), H, NodeId(0), TickInterval::new(Tick(0), Tick(10)), vec![], 0.1)
}

/// Hands out a fixed list of `(tick, order)` pairs.
#[derive(Clone)]
struct Scripted(Vec<(u64, ConfirmedOrder)>);

impl OrderGenerator for Scripted {
    fn generate_orders(&mut self, tick: Tick) -> Vec<ConfirmedOrder> {
        self.0.iter().filter(|(t, _)| *t == tick.0).map(|(_, o)| o.clone()).collect()
    }
}

impl OrderGeneratorFactory for Scripted {
    fn create(&self, _vm: &VehicleManager, _rng: &mut SimRng) -> ServiceResult<Box<dyn OrderGenerator>> {
        Ok(Box::new(self.clone()))
    }
}

fn one_order() -> Scripted {
    Scripted(vec![(0, order(1))])
}

/// Basic service with one vehicle at R, one order at tick 0, both raters.
fn simulation(total_ticks: u64) -> Simulation {
    let mut vm = VehicleManager::new(region(), Arc::new(ds_region::DijkstraPathCalculator));
    vm.add_vehicle(R, 1.0).unwrap();
    let in_time = InTimeRater::builder().build().unwrap().create(&vm);
    let amount = AmountDeliveredRater::builder().build().unwrap().create(&vm);
    SimulationBuilder::new(config(total_ticks), Box::new(BasicDeliveryService::new(vm)))
        .order_generator(Box::new(one_order()))
        .rater(in_time)
        .rater(amount)
        .build()
        .unwrap()
}

fn archetype(name: &str, vehicles: usize) -> ProblemArchetype {
    let mut b = ProblemArchetype::builder(name, region())
        .order_generator(one_order())
        .rater(InTimeRater::builder().build().unwrap())
        .rater(AmountDeliveredRater::builder().build().unwrap())
        .total_ticks(20);
    for _ in 0..vehicles {
        b = b.vehicle(R, 1.0);
    }
    b.build().unwrap()
}

#[derive(Default)]
struct Recorder {
    starts:    Vec<Tick>,
    events:    usize,
    snapshots: Vec<Tick>,
    ended:     Option<Tick>,
    stop:      Option<(Tick, Arc<AtomicBool>)>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }

    fn on_tick_end(&mut self, tick: Tick, events: &[Event]) {
        self.events += events.len();
        if let Some((at, flag)) = &self.stop {
            if *at == tick {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }

    fn on_snapshot(&mut self, tick: Tick, _vm: &VehicleManager) {
        self.snapshots.push(tick);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimulationBuilder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn defaults_to_no_orders_and_no_raters() {
        let vm = VehicleManager::new(region(), Arc::new(ds_region::DijkstraPathCalculator));
        let mut sim = SimulationBuilder::new(config(5), Box::new(BasicDeliveryService::new(vm)))
            .build()
            .unwrap();
        assert_eq!(sim.current_tick(), Tick(0));
        assert!(sim.ratings().is_empty());
        sim.run(5, &mut NoopObserver).unwrap();
        assert!(sim.service().pending_orders().is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let vm = VehicleManager::new(region(), Arc::new(ds_region::DijkstraPathCalculator));
        let result = SimulationBuilder::new(config(0), Box::new(BasicDeliveryService::new(vm))).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn duplicate_criterion_rejected() {
        let vm = VehicleManager::new(region(), Arc::new(ds_region::DijkstraPathCalculator));
        let factory = InTimeRater::builder().build().unwrap();
        let (first, second) = (factory.create(&vm), factory.create(&vm));
        let result = SimulationBuilder::new(config(5), Box::new(BasicDeliveryService::new(vm)))
            .rater(first)
            .rater(second)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Simulation loop ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_stops_at_max_ticks() {
        let mut sim = simulation(20);
        let mut rec = Recorder::default();
        sim.run(8, &mut rec).unwrap();
        assert_eq!(sim.current_tick(), Tick(8));
        assert_eq!(rec.starts, (0..8).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.ended, Some(Tick(8)));
    }

    #[test]
    fn run_resumes_from_current_tick() {
        let mut sim = simulation(20);
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        let mut rec = Recorder::default();
        sim.run(5, &mut rec).unwrap();
        assert_eq!(rec.starts, [Tick(3), Tick(4)]);
    }

    #[test]
    fn run_ticks_skips_sim_end() {
        let mut sim = simulation(20);
        let mut rec = Recorder::default();
        sim.run_ticks(4, &mut rec).unwrap();
        assert_eq!(sim.current_tick(), Tick(4));
        assert_eq!(rec.ended, None);
    }

    #[test]
    fn delivery_scores_full_marks() {
        let mut sim = simulation(20);
        let mut rec = Recorder::default();
        sim.run(20, &mut rec).unwrap();
        assert_eq!(sim.rating_for(RatingCriteria::InTime), Some(1.0));
        assert_eq!(sim.rating_for(RatingCriteria::AmountDelivered), Some(1.0));
        assert_eq!(sim.rating_for(RatingCriteria::TravelDistance), None);
        // spawn, order_received, load, arrival, delivery, return arrival
        assert_eq!(rec.events, 6);
    }

    #[test]
    fn end_simulation_stops_after_current_tick() {
        let mut sim = simulation(20);
        let mut rec = Recorder { stop: Some((Tick(3), sim.stop_handle())), ..Default::default() };
        sim.run(20, &mut rec).unwrap();
        assert!(sim.is_ended());
        assert_eq!(sim.current_tick(), Tick(4));
        assert_eq!(rec.ended, Some(Tick(4)));
    }

    #[test]
    fn ended_simulation_does_not_run() {
        let mut sim = simulation(20);
        sim.end_simulation();
        sim.run(20, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(0));
    }

    #[test]
    fn snapshots_follow_output_interval() {
        let mut sim = simulation(20);
        sim.config.output_interval_ticks = 2;
        let mut rec = Recorder::default();
        sim.run(6, &mut rec).unwrap();
        assert_eq!(rec.snapshots, [Tick(0), Tick(2), Tick(4)]);

        let mut sim = simulation(20);
        sim.config.output_interval_ticks = 0;
        let mut rec = Recorder::default();
        sim.run(6, &mut rec).unwrap();
        assert!(rec.snapshots.is_empty());
    }
}

// ── ProblemArchetype ──────────────────────────────────────────────────────────

#[cfg(test)]
mod archetype_tests {
    use super::*;

    #[test]
    fn vehicle_manager_is_fresh_each_time() {
        let a = archetype("a", 2);
        let vm = a.vehicle_manager().unwrap();
        assert_eq!(vm.all_vehicles().len(), 2);
        assert_eq!(vm.vehicles().count(), 0);
        assert_eq!(a.vehicle_manager().unwrap().current_tick(), None);
    }

    #[test]
    fn total_ticks_falls_back_to_config() {
        let a = ProblemArchetype::builder("a", region()).build().unwrap();
        assert_eq!(a.total_ticks(&config(33)), 33);
        assert_eq!(archetype("b", 1).total_ticks(&config(33)), 20);
    }

    #[test]
    fn build_validates() {
        let off_restaurant = ProblemArchetype::builder("a", region()).vehicle(H, 1.0).build();
        assert!(matches!(off_restaurant, Err(SimError::Routing(_))));

        let zero = ProblemArchetype::builder("a", region()).total_ticks(0).build();
        assert!(matches!(zero, Err(SimError::Config(_))));

        let twice = ProblemArchetype::builder("a", region())
            .rater(InTimeRater::builder().build().unwrap())
            .rater(InTimeRater::builder().build().unwrap())
            .build();
        assert!(matches!(twice, Err(SimError::Config(_))));
    }

    #[test]
    fn simulation_carries_archetype_raters() {
        let a = archetype("a", 1);
        let sim = a
            .simulation(&config(20), &BasicDeliveryService::factory(), &mut SimRng::new(0))
            .unwrap();
        let criteria: Vec<_> = sim.ratings().into_iter().map(|(c, _)| c).collect();
        assert_eq!(criteria, a.criteria());
        assert_eq!(sim.vehicle_manager().all_vehicles().len(), 1);
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        setups:    Vec<(String, u32)>,
        finished:  usize,
        stop_at:   Option<usize>,
        result:    Option<RunnerResult>,
    }

    impl RunnerHooks for Counting {
        fn on_setup(&mut self, _sim: &mut Simulation, archetype: &ProblemArchetype, run: u32) {
            self.setups.push((archetype.name().to_owned(), run));
        }

        fn on_finished(&mut self, _sim: &Simulation, _archetype: &ProblemArchetype) -> bool {
            self.finished += 1;
            self.stop_at == Some(self.finished)
        }

        fn on_result(&mut self, result: &RunnerResult) {
            self.result = Some(result.clone());
        }
    }

    #[test]
    fn averages_are_true_means() {
        // "served" delivers on time (1.0); "unserved" has no vehicle (0.0).
        let archetypes = [archetype("served", 1), archetype("unserved", 0)];
        let mut cfg = config(20);
        cfg.runs = 3;
        let mut hooks = Counting::default();
        let result = Runner::new(cfg)
            .unwrap()
            .run(&archetypes, &BasicDeliveryService::factory(), &mut hooks)
            .unwrap();

        assert_eq!(result.simulations, 6);
        assert!(!result.stopped_early);
        assert_eq!(result.average(RatingCriteria::InTime), Some(0.5));
        assert_eq!(result.average(RatingCriteria::AmountDelivered), Some(0.5));
        assert_eq!(result.average(RatingCriteria::TravelDistance), None);
        assert_eq!(hooks.setups.len(), 6);
        assert_eq!(hooks.setups[1], ("unserved".to_owned(), 0));
        assert_eq!(hooks.setups[5], ("unserved".to_owned(), 2));
        assert_eq!(hooks.result, Some(result));
    }

    #[test]
    fn hook_can_stop_the_runner() {
        let archetypes = [archetype("served", 1), archetype("unserved", 0)];
        let mut cfg = config(20);
        cfg.runs = 5;
        let mut hooks = Counting { stop_at: Some(1), ..Default::default() };
        let result = Runner::new(cfg)
            .unwrap()
            .run(&archetypes, &BasicDeliveryService::factory(), &mut hooks)
            .unwrap();

        assert!(result.stopped_early);
        assert_eq!(result.simulations, 1);
        assert_eq!(result.average(RatingCriteria::InTime), Some(1.0));
        assert_eq!(hooks.finished, 1);
    }

    #[test]
    fn same_seed_same_result() {
        let friday = || {
            ProblemArchetype::builder("friday", region())
                .vehicle(R, 1.0)
                .vehicle(R, 1.0)
                .order_generator(FridayOrderGenerator::builder().order_count(40).last_tick(30).build().unwrap())
                .rater(InTimeRater::builder().build().unwrap())
                .rater(AmountDeliveredRater::builder().build().unwrap())
                .total_ticks(60)
                .build()
                .unwrap()
        };
        let mut cfg = config(60);
        cfg.runs = 2;
        let run = || {
            Runner::new(cfg.clone())
                .unwrap()
                .run(&[friday()], &BasicDeliveryService::factory(), &mut NoopHooks)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = config(20);
        cfg.runs = 0;
        assert!(matches!(Runner::new(cfg), Err(SimError::Core(_))));
    }
}
