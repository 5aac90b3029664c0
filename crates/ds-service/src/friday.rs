//! Friday-evening order generator: a rush centred on the middle of the
//! evening, tapering off towards both ends.

use std::collections::BTreeMap;

use log::debug;

use ds_core::{Location, NodeId, OrderId, SimRng, Tick, TickInterval};
use ds_routing::{ConfirmedOrder, VehicleManager};

use crate::{OrderGenerator, OrderGeneratorFactory, ServiceError, ServiceResult};

/// Upper bound (exclusive) on the number of food items per order.
const MAX_FOOD_ITEMS: usize = 10;

/// Order ticks follow a normal distribution with mean `0.5` and the
/// configured standard deviation, sampled on `[0, 1]` (draws outside are
/// rejected) and scaled to `[0, last_tick]`.
///
/// Each order goes to a uniformly chosen neighborhood from a uniformly
/// chosen restaurant, with 1 to 9 items from the restaurant's menu, a weight
/// in `[0, max_weight)`, and a delivery window of `delivery_interval` ticks
/// starting at the order tick.  Order ids count up from zero in tick order.
pub struct FridayOrderGenerator {
    schedule:      BTreeMap<Tick, u32>,
    restaurants:   Vec<(NodeId, Vec<String>)>,
    neighborhoods: Vec<Location>,
    interval:      u64,
    max_weight:    f64,
    next_id:       u64,
    rng:           SimRng,
}

impl FridayOrderGenerator {
    pub fn builder() -> FridayOrderGeneratorBuilder {
        FridayOrderGeneratorBuilder::default()
    }

    fn order(&mut self, tick: Tick) -> Option<ConfirmedOrder> {
        let location = *self.rng.choose(&self.neighborhoods)?;
        let (restaurant, menu) = self.rng.choose(&self.restaurants)?.clone();

        let items = self.rng.gen_range(1..MAX_FOOD_ITEMS);
        let food = if menu.is_empty() {
            Vec::new()
        } else {
            (0..items).filter_map(|_| self.rng.choose(&menu).cloned()).collect()
        };
        let weight = if self.max_weight > 0.0 { self.rng.gen_range(0.0..self.max_weight) } else { 0.0 };

        let id = OrderId(self.next_id);
        self.next_id += 1;
        Some(ConfirmedOrder::new(
            id,
            location,
            restaurant,
            TickInterval::new(tick, tick + self.interval),
            food,
            weight,
        ))
    }
}

impl OrderGenerator for FridayOrderGenerator {
    fn generate_orders(&mut self, tick: Tick) -> Vec<ConfirmedOrder> {
        let Some(count) = self.schedule.remove(&tick) else {
            return Vec::new();
        };
        (0..count).filter_map(|_| self.order(tick)).collect()
    }
}

// ── Builder / factory ─────────────────────────────────────────────────────────

/// Configuration for [`FridayOrderGenerator`].
///
/// ```
/// use ds_service::FridayOrderGenerator;
///
/// let factory = FridayOrderGenerator::builder()
///     .order_count(200)
///     .last_tick(120)
///     .seed(7)
///     .build()
///     .unwrap();
/// # let _ = factory;
/// ```
#[derive(Clone, Debug)]
pub struct FridayOrderGeneratorBuilder {
    order_count:        u32,
    delivery_interval:  u64,
    max_weight:         f64,
    standard_deviation: f64,
    last_tick:          u64,
    seed:               Option<u64>,
}

impl Default for FridayOrderGeneratorBuilder {
    fn default() -> Self {
        Self {
            order_count:        1000,
            delivery_interval:  15,
            max_weight:         0.5,
            standard_deviation: 0.5,
            last_tick:          480,
            seed:               None,
        }
    }
}

impl FridayOrderGeneratorBuilder {
    pub fn order_count(mut self, n: u32) -> Self {
        self.order_count = n;
        self
    }

    /// Length of each order's delivery window, in ticks.
    pub fn delivery_interval(mut self, ticks: u64) -> Self {
        self.delivery_interval = ticks;
        self
    }

    pub fn max_weight(mut self, w: f64) -> Self {
        self.max_weight = w;
        self
    }

    pub fn standard_deviation(mut self, sd: f64) -> Self {
        self.standard_deviation = sd;
        self
    }

    /// Latest tick an order can be placed at.
    pub fn last_tick(mut self, tick: u64) -> Self {
        self.last_tick = tick;
        self
    }

    /// Fix the generator's own seed.  Without one, each generator draws from
    /// the run stream it is created with.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// [`ServiceError::Config`] for a negative or non-finite `max_weight`, or
    /// a non-positive or non-finite `standard_deviation`.
    pub fn build(self) -> ServiceResult<FridayOrderGeneratorFactory> {
        if !(self.max_weight.is_finite() && self.max_weight >= 0.0) {
            return Err(ServiceError::Config(format!(
                "max_weight must be finite and non-negative, got {}",
                self.max_weight
            )));
        }
        if !(self.standard_deviation.is_finite() && self.standard_deviation > 0.0) {
            return Err(ServiceError::Config(format!(
                "standard_deviation must be finite and positive, got {}",
                self.standard_deviation
            )));
        }
        Ok(FridayOrderGeneratorFactory { config: self })
    }
}

/// Validated [`FridayOrderGenerator`] configuration.
#[derive(Clone, Debug)]
pub struct FridayOrderGeneratorFactory {
    config: FridayOrderGeneratorBuilder,
}

impl FridayOrderGeneratorFactory {
    fn schedule(&self, rng: &mut SimRng) -> BTreeMap<Tick, u32> {
        let cfg = &self.config;
        let mut schedule = BTreeMap::new();
        let mut placed = 0;
        while placed < cfg.order_count {
            let g = rng.gaussian(0.5, cfg.standard_deviation);
            if !(0.0..=1.0).contains(&g) {
                continue;
            }
            let tick = Tick((g * cfg.last_tick as f64).round() as u64);
            *schedule.entry(tick).or_insert(0) += 1;
            placed += 1;
        }
        schedule
    }
}

impl OrderGeneratorFactory for FridayOrderGeneratorFactory {
    fn create(
        &self,
        vehicle_manager: &VehicleManager,
        rng:             &mut SimRng,
    ) -> ServiceResult<Box<dyn OrderGenerator>> {
        let region = vehicle_manager.region();
        let restaurants: Vec<(NodeId, Vec<String>)> = region
            .restaurants()
            .map(|n| (n.id(), n.available_food().to_vec()))
            .collect();
        let neighborhoods: Vec<Location> = region.neighborhoods().map(|n| n.location()).collect();
        if restaurants.is_empty() {
            return Err(ServiceError::Config("region has no restaurants".into()));
        }
        if neighborhoods.is_empty() {
            return Err(ServiceError::Config("region has no neighborhoods".into()));
        }

        let mut rng = match self.config.seed {
            Some(seed) => SimRng::new(seed),
            None => rng.child(0),
        };
        let schedule = self.schedule(&mut rng);
        debug!(
            "friday generator: {} orders over {} distinct ticks",
            self.config.order_count,
            schedule.len()
        );

        Ok(Box::new(FridayOrderGenerator {
            schedule,
            restaurants,
            neighborhoods,
            interval: self.config.delivery_interval,
            max_weight: self.config.max_weight,
            next_id: 0,
            rng,
        }))
    }
}
