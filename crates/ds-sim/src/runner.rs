//! Repeated runs over a set of archetypes, with averaged ratings.

use std::collections::BTreeMap;

use log::info;

use ds_core::{SimConfig, SimRng};
use ds_rating::RatingCriteria;
use ds_service::DeliveryServiceFactory;

use crate::{NoopObserver, ProblemArchetype, SimResult, Simulation};

/// Callbacks invoked by [`Runner::run`].
pub trait RunnerHooks {
    /// Called after a simulation is built and before it runs.  `run` counts
    /// from zero.  Every archetype of a round is set up before the round's
    /// first simulation starts.
    fn on_setup(&mut self, _sim: &mut Simulation, _archetype: &ProblemArchetype, _run: u32) {}

    /// Called after a simulation finishes.  Return `true` to stop the
    /// runner; the finished simulation still counts towards the averages.
    fn on_finished(&mut self, _sim: &Simulation, _archetype: &ProblemArchetype) -> bool {
        false
    }

    /// Called once with the final result.
    fn on_result(&mut self, _result: &RunnerResult) {}
}

/// [`RunnerHooks`] that do nothing.
pub struct NoopHooks;

impl RunnerHooks for NoopHooks {}

/// Outcome of [`Runner::run`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunnerResult {
    /// Arithmetic mean of every criterion over the simulations rating it.
    pub averages:      BTreeMap<RatingCriteria, f64>,
    /// Number of simulations that ran to completion.
    pub simulations:   u32,
    /// Whether a hook stopped the runner before every run finished.
    pub stopped_early: bool,
}

impl RunnerResult {
    pub fn average(&self, criterion: RatingCriteria) -> Option<f64> {
        self.averages.get(&criterion).copied()
    }
}

#[derive(Default)]
struct Totals {
    sums:        BTreeMap<RatingCriteria, (f64, u32)>,
    simulations: u32,
}

impl Totals {
    fn add(&mut self, sim: &Simulation) {
        for (criterion, score) in sim.ratings() {
            let entry = self.sums.entry(criterion).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
        self.simulations += 1;
    }

    fn finish(self, stopped_early: bool) -> RunnerResult {
        let averages = self
            .sums
            .into_iter()
            .map(|(criterion, (sum, n))| (criterion, sum / f64::from(n)))
            .collect();
        RunnerResult { averages, simulations: self.simulations, stopped_early }
    }
}

/// Simulates every archetype `config.runs` times under one delivery policy.
///
/// Runs proceed round by round: round `r` simulates each archetype once, in
/// slice order.  Every simulation gets its own RNG stream derived from
/// `config.seed`, so results are reproducible and do not depend on the
/// `parallel` feature.
pub struct Runner {
    config: SimConfig,
}

impl Runner {
    /// # Errors
    ///
    /// [`SimError::Core`](crate::SimError::Core) if `config` is invalid.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run everything and return the averaged ratings.
    ///
    /// With the `parallel` feature, the archetypes of one round run on
    /// Rayon's thread pool; hooks are still called sequentially in
    /// archetype order.
    pub fn run<H: RunnerHooks>(
        &self,
        archetypes: &[ProblemArchetype],
        service:    &dyn DeliveryServiceFactory,
        hooks:      &mut H,
    ) -> SimResult<RunnerResult> {
        let mut master = SimRng::new(self.config.seed);
        let mut totals = Totals::default();
        let mut stopped = false;

        info!(
            "runner: {} archetype(s) x {} run(s), seed {}",
            archetypes.len(),
            self.config.runs,
            self.config.seed
        );

        for run in 0..self.config.runs {
            let mut sims = Vec::with_capacity(archetypes.len());
            for (index, archetype) in archetypes.iter().enumerate() {
                let mut rng = master.child((u64::from(run) << 32) | index as u64);
                let mut sim = archetype.simulation(&self.config, service, &mut rng)?;
                hooks.on_setup(&mut sim, archetype, run);
                sims.push(sim);
            }

            #[cfg(not(feature = "parallel"))]
            {
                for (sim, archetype) in sims.iter_mut().zip(archetypes) {
                    self.run_one(sim, archetype, run)?;
                    totals.add(sim);
                    if hooks.on_finished(sim, archetype) {
                        stopped = true;
                        break;
                    }
                }
            }

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;

                sims.par_iter_mut()
                    .zip(archetypes.par_iter())
                    .map(|(sim, archetype)| self.run_one(sim, archetype, run))
                    .collect::<SimResult<Vec<()>>>()?;

                for (sim, archetype) in sims.iter().zip(archetypes) {
                    totals.add(sim);
                    if hooks.on_finished(sim, archetype) {
                        stopped = true;
                        break;
                    }
                }
            }

            if stopped {
                info!("runner stopped by hook after run {run}");
                break;
            }
        }

        let result = totals.finish(stopped);
        hooks.on_result(&result);
        Ok(result)
    }

    fn run_one(&self, sim: &mut Simulation, archetype: &ProblemArchetype, run: u32) -> SimResult<()> {
        info!("run {run}: archetype '{}'", archetype.name());
        sim.run(archetype.total_ticks(&self.config), &mut NoopObserver)
    }
}
