//! The `OrderGenerator` trait and the trivial empty source.

use ds_core::{SimRng, Tick};
use ds_routing::{ConfirmedOrder, VehicleManager};

use crate::ServiceResult;

/// Produces the orders that appear at each tick.
///
/// Generators are created per run by an [`OrderGeneratorFactory`], so any
/// precomputed schedule is drawn fresh for every run.
pub trait OrderGenerator: Send {
    /// Orders placed at `tick`.  Called once per tick, in tick order.
    fn generate_orders(&mut self, tick: Tick) -> Vec<ConfirmedOrder>;
}

/// Builds an order generator for one run.
pub trait OrderGeneratorFactory: Send + Sync {
    /// `rng` is the run's stream; factories that do not carry their own
    /// seed derive their randomness from it.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Config`](crate::ServiceError::Config) when the region
    /// cannot support the generator (e.g. no restaurants).
    fn create(
        &self,
        vehicle_manager: &VehicleManager,
        rng:             &mut SimRng,
    ) -> ServiceResult<Box<dyn OrderGenerator>>;
}

// ── EmptyOrderGenerator ───────────────────────────────────────────────────────

/// Never produces an order.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyOrderGenerator;

impl OrderGenerator for EmptyOrderGenerator {
    fn generate_orders(&mut self, _tick: Tick) -> Vec<ConfirmedOrder> {
        Vec::new()
    }
}

impl OrderGeneratorFactory for EmptyOrderGenerator {
    fn create(&self, _vm: &VehicleManager, _rng: &mut SimRng) -> ServiceResult<Box<dyn OrderGenerator>> {
        Ok(Box::new(EmptyOrderGenerator))
    }
}
