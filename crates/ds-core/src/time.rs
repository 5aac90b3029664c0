//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter with no wall-clock
//! mapping.  Edge durations, delivery windows, and rating tolerances are all
//! expressed in ticks, so every comparison is exact integer arithmetic.
//!
//! Any real-time pacing (e.g. a viewer throttling the tick rate) happens
//! outside the engine.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickInterval ──────────────────────────────────────────────────────────────

/// A closed tick range `[start, end]`, used for order delivery windows.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickInterval {
    pub start: Tick,
    pub end:   Tick,
}

impl TickInterval {
    /// Create an interval.  `start` and `end` are swapped if given reversed.
    pub fn new(start: Tick, end: Tick) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// `end - start`.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick <= self.end
    }

    /// Distance in ticks from `tick` to the nearest bound; zero when inside.
    pub fn ticks_off(&self, tick: Tick) -> u64 {
        if tick < self.start {
            self.start - tick
        } else {
            tick.since(self.end)
        }
    }
}

impl fmt::Display for TickInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the runner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Ticks simulated per run.  Tick `total_ticks` itself is not simulated.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// How many times each problem archetype is simulated; scores are
    /// averaged over all runs.
    pub runs: u32,

    /// Write output every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which a run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.total_ticks == 0 {
            return Err(CoreError::Config("total_ticks must be positive".into()));
        }
        if self.runs == 0 {
            return Err(CoreError::Config("runs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:           500,
            seed:                  42,
            runs:                  1,
            output_interval_ticks: 1,
        }
    }
}
