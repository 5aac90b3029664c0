//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use ds_core::{SimConfig, Tick};
use ds_rating::Rater;
use ds_service::{DeliveryService, EmptyOrderGenerator, OrderGenerator};

use crate::{SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, output interval
/// - a [`DeliveryService`] owning the run's vehicle manager
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                   |
/// |-----------------------|---------------------------|
/// | `.order_generator(g)` | [`EmptyOrderGenerator`]   |
/// | `.rater(r)`           | no raters                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimulationBuilder::new(config, Box::new(BasicDeliveryService::new(vm)))
///     .order_generator(generator)
///     .rater(InTimeRater::builder().build()?.create(&vm))
///     .build()?;
/// sim.run(config.total_ticks, &mut NoopObserver)?;
/// ```
pub struct SimulationBuilder {
    config:    SimConfig,
    service:   Box<dyn DeliveryService>,
    generator: Option<Box<dyn OrderGenerator>>,
    raters:    Vec<Box<dyn Rater>>,
}

impl SimulationBuilder {
    pub fn new(config: SimConfig, service: Box<dyn DeliveryService>) -> Self {
        Self { config, service, generator: None, raters: Vec::new() }
    }

    pub fn order_generator(mut self, generator: Box<dyn OrderGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Add a rater.  At most one rater per criterion.
    pub fn rater(mut self, rater: Box<dyn Rater>) -> Self {
        self.raters.push(rater);
        self
    }

    pub fn raters(mut self, raters: impl IntoIterator<Item = Box<dyn Rater>>) -> Self {
        self.raters.extend(raters);
        self
    }

    /// Validate inputs and return a simulation positioned at tick 0.
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] if the config is invalid.
    /// - [`SimError::Config`] if two raters share a criterion.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;

        for (i, rater) in self.raters.iter().enumerate() {
            let criterion = rater.criterion();
            if self.raters[..i].iter().any(|r| r.criterion() == criterion) {
                return Err(SimError::Config(format!("more than one rater for {criterion}")));
            }
        }

        Ok(Simulation {
            config:       self.config,
            service:      self.service,
            generator:    self.generator.unwrap_or_else(|| Box::new(EmptyOrderGenerator)),
            raters:       self.raters,
            current_tick: Tick::ZERO,
            stop:         Arc::new(AtomicBool::new(false)),
        })
    }
}
