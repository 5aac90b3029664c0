//! Problem archetypes: everything a run needs except the delivery policy.

use std::fmt;
use std::sync::Arc;

use ds_core::{Location, SimConfig, SimRng};
use ds_rating::{RaterFactory, RatingCriteria};
use ds_region::{DijkstraPathCalculator, PathCalculator, Region};
use ds_routing::VehicleManager;
use ds_service::{DeliveryServiceFactory, EmptyOrderGenerator, OrderGeneratorFactory};

use crate::{SimError, SimResult, Simulation, SimulationBuilder};

/// A named delivery problem: a region, a fleet, an order source, and the
/// criteria it is rated by.
///
/// Archetypes are immutable and shareable; every run builds a fresh vehicle
/// manager, order generator, and rater set from them.
#[derive(Clone)]
pub struct ProblemArchetype {
    name:            String,
    region:          Arc<Region>,
    path_calculator: Arc<dyn PathCalculator>,
    vehicles:        Vec<(Location, f64)>,
    order_generator: Arc<dyn OrderGeneratorFactory>,
    raters:          Vec<Arc<dyn RaterFactory>>,
    total_ticks:     Option<u64>,
}

impl ProblemArchetype {
    pub fn builder(name: impl Into<String>, region: Arc<Region>) -> ProblemArchetypeBuilder {
        ProblemArchetypeBuilder {
            archetype: ProblemArchetype {
                name:            name.into(),
                region,
                path_calculator: Arc::new(DijkstraPathCalculator),
                vehicles:        Vec::new(),
                order_generator: Arc::new(EmptyOrderGenerator),
                raters:          Vec::new(),
                total_ticks:     None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    /// Criteria this archetype is rated by, in rater order.
    pub fn criteria(&self) -> Vec<RatingCriteria> {
        self.raters.iter().map(|r| r.criterion()).collect()
    }

    /// Ticks per run: the archetype's own length, else `config.total_ticks`.
    pub fn total_ticks(&self, config: &SimConfig) -> u64 {
        self.total_ticks.unwrap_or(config.total_ticks)
    }

    /// A fresh vehicle manager with the archetype's fleet added (pending).
    ///
    /// # Errors
    ///
    /// [`SimError::Routing`] if a vehicle does not start on a restaurant.
    pub fn vehicle_manager(&self) -> SimResult<VehicleManager> {
        let mut vm = VehicleManager::new(Arc::clone(&self.region), Arc::clone(&self.path_calculator));
        for &(location, capacity) in &self.vehicles {
            vm.add_vehicle(location, capacity)?;
        }
        Ok(vm)
    }

    /// Build one run of this archetype under `service`.
    ///
    /// `rng` is the run's stream; the order generator draws from it.
    pub fn simulation(
        &self,
        config:  &SimConfig,
        service: &dyn DeliveryServiceFactory,
        rng:     &mut SimRng,
    ) -> SimResult<Simulation> {
        let vm = self.vehicle_manager()?;
        let generator = self.order_generator.create(&vm, rng)?;
        let raters: Vec<_> = self.raters.iter().map(|f| f.create(&vm)).collect();
        SimulationBuilder::new(config.clone(), service.create(vm))
            .order_generator(generator)
            .raters(raters)
            .build()
    }
}

impl fmt::Debug for ProblemArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemArchetype")
            .field("name", &self.name)
            .field("nodes", &self.region.node_count())
            .field("vehicles", &self.vehicles.len())
            .field("criteria", &self.criteria())
            .field("total_ticks", &self.total_ticks)
            .finish()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`ProblemArchetype`].
///
/// | Method                 | Default                         |
/// |------------------------|---------------------------------|
/// | `.path_calculator(p)`  | [`DijkstraPathCalculator`]      |
/// | `.vehicle(loc, cap)`   | no vehicles                     |
/// | `.order_generator(g)`  | [`EmptyOrderGenerator`]         |
/// | `.rater(r)`            | no raters                       |
/// | `.total_ticks(n)`      | `SimConfig::total_ticks`        |
pub struct ProblemArchetypeBuilder {
    archetype: ProblemArchetype,
}

impl ProblemArchetypeBuilder {
    pub fn path_calculator(mut self, path_calculator: Arc<dyn PathCalculator>) -> Self {
        self.archetype.path_calculator = path_calculator;
        self
    }

    /// Add a vehicle of `capacity` starting at the restaurant at `location`.
    pub fn vehicle(mut self, location: Location, capacity: f64) -> Self {
        self.archetype.vehicles.push((location, capacity));
        self
    }

    pub fn order_generator(mut self, factory: impl OrderGeneratorFactory + 'static) -> Self {
        self.archetype.order_generator = Arc::new(factory);
        self
    }

    pub fn rater(mut self, factory: impl RaterFactory + 'static) -> Self {
        self.archetype.raters.push(Arc::new(factory));
        self
    }

    pub fn total_ticks(mut self, ticks: u64) -> Self {
        self.archetype.total_ticks = Some(ticks);
        self
    }

    /// # Errors
    ///
    /// [`SimError::Config`] for a zero run length or two raters with the
    /// same criterion; [`SimError::Routing`] if a vehicle does not start on
    /// a restaurant.
    pub fn build(self) -> SimResult<ProblemArchetype> {
        let a = self.archetype;
        if a.total_ticks == Some(0) {
            return Err(SimError::Config(format!("archetype '{}' has zero total_ticks", a.name)));
        }
        let criteria = a.criteria();
        for (i, c) in criteria.iter().enumerate() {
            if criteria[..i].contains(c) {
                return Err(SimError::Config(format!("archetype '{}' rates {c} twice", a.name)));
            }
        }
        a.vehicle_manager()?;
        Ok(a)
    }
}
