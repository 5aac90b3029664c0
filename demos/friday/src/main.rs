//! friday — a Friday evening of food deliveries in a seven-node town.
//!
//! Runs the `friday` archetype `config.runs` times under the basic FIFO
//! delivery service and prints the averaged ratings, then replays one run
//! with CSV output under `output/friday/`.
//!
//! Usage: `friday [config.json]`, where the optional file holds a
//! `SimConfig`, e.g.
//!
//! ```json
//! { "total_ticks": 540, "seed": 7, "runs": 5, "output_interval_ticks": 30 }
//! ```

mod region;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use ds_core::{SimConfig, SimRng};
use ds_output::{CsvEventWriter, SimOutputObserver};
use ds_rating::{AmountDeliveredRater, InTimeRater, RatingCriteria, TravelDistanceRater};
use ds_service::{BasicDeliveryService, FridayOrderGenerator};
use ds_sim::{ProblemArchetype, Runner, RunnerHooks, RunnerResult, Simulation};

use region::{build_region, NOODLE_BAR, PIZZERIA};

// ── Constants ─────────────────────────────────────────────────────────────────

const ORDER_COUNT:      u32 = 150;
const LAST_ORDER_TICK:  u64 = 480; // 8 hours of 1-minute ticks
const VEHICLE_CAPACITY: f64 = 1.0;
const OUTPUT_DIR:       &str = "output/friday";

// ── Progress hooks ────────────────────────────────────────────────────────────

struct Progress {
    started: Instant,
}

impl RunnerHooks for Progress {
    fn on_setup(&mut self, _sim: &mut Simulation, archetype: &ProblemArchetype, run: u32) {
        info!("setting up '{}' run {run}", archetype.name());
    }

    fn on_finished(&mut self, sim: &Simulation, archetype: &ProblemArchetype) -> bool {
        let scores: Vec<String> = sim
            .ratings()
            .into_iter()
            .map(|(c, s)| format!("{c}={s:.3}"))
            .collect();
        println!("  {:<8} finished at {}: {}", archetype.name(), sim.current_tick(), scores.join("  "));
        false
    }

    fn on_result(&mut self, result: &RunnerResult) {
        println!();
        println!(
            "{} simulation(s) in {:.3} s",
            result.simulations,
            self.started.elapsed().as_secs_f64()
        );
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SimConfig { total_ticks: 540, seed: 42, runs: 3, output_interval_ticks: 30 });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: SimConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    config.validate()?;
    Ok(config)
}

fn friday_archetype(config: &SimConfig) -> Result<ProblemArchetype> {
    let region = build_region()?;
    println!(
        "Region: {} nodes ({} restaurants, {} neighborhoods), {} edges",
        region.node_count(),
        region.restaurants().count(),
        region.neighborhoods().count(),
        region.edge_count()
    );

    let archetype = ProblemArchetype::builder("friday", region)
        .vehicle(PIZZERIA, VEHICLE_CAPACITY)
        .vehicle(PIZZERIA, VEHICLE_CAPACITY)
        .vehicle(NOODLE_BAR, VEHICLE_CAPACITY)
        .vehicle(NOODLE_BAR, VEHICLE_CAPACITY)
        .order_generator(
            FridayOrderGenerator::builder()
                .order_count(ORDER_COUNT)
                .last_tick(LAST_ORDER_TICK.min(config.total_ticks))
                .build()?,
        )
        .rater(InTimeRater::builder().build()?)
        .rater(AmountDeliveredRater::builder().build()?)
        .rater(TravelDistanceRater::builder().build()?)
        .build()?;
    Ok(archetype)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("=== friday — delivery simulation ===");
    println!(
        "Ticks: {}  |  Runs: {}  |  Seed: {}  |  Orders/run: {ORDER_COUNT}",
        config.total_ticks, config.runs, config.seed
    );
    println!();

    let archetype = friday_archetype(&config)?;
    let service = BasicDeliveryService::factory();

    // 1. Averaged runs.
    let mut hooks = Progress { started: Instant::now() };
    let result = Runner::new(config.clone())?.run(std::slice::from_ref(&archetype), &service, &mut hooks)?;

    println!("{:<18} {:>8}", "Criterion", "Average");
    println!("{}", "-".repeat(27));
    for criterion in RatingCriteria::ALL {
        match result.average(criterion) {
            Some(score) => println!("{:<18} {:>8.3}", criterion.as_str(), score),
            None => println!("{:<18} {:>8}", criterion.as_str(), "-"),
        }
    }
    println!();

    // 2. One more run with the event log written out.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let mut obs = SimOutputObserver::new(CsvEventWriter::new(Path::new(OUTPUT_DIR))?);
    let mut sim = archetype.simulation(&config, &service, &mut SimRng::new(config.seed))?;
    sim.run(archetype.total_ticks(&config), &mut obs)?;
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    let vm = sim.vehicle_manager();
    println!("Logged run written to {OUTPUT_DIR}/ (events.csv, tick_summaries.csv, vehicle_snapshots.csv)");
    println!("Orders still pending: {}", sim.service().pending_orders().len());
    println!();
    println!("{:<10} {:<14} {:>7} {:>7}", "Vehicle", "Position", "Orders", "Load");
    println!("{}", "-".repeat(41));
    for v in vm.all_vehicles() {
        println!(
            "{:<10} {:<14} {:>7} {:>7.2}",
            v.id().0,
            v.occupied().to_string(),
            v.orders().len(),
            v.current_weight()
        );
    }

    Ok(())
}
