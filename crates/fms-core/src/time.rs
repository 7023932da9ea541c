//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter where one tick is one
//! simulated second.  There is no wall-clock mapping: the generator produces
//! a flat time series and real-time pacing is not a concern.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter (one simulated second).
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

    /// The following tick.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Parameters of a single generation run.
///
/// The vehicle model's own thresholds live in `fms_vehicle::VehicleParams`;
/// this struct only says how long to run and which seed to start from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Total ticks to simulate.  Default: 280.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl RunConfig {
    /// Ticks generated by a default run.
    pub const DEFAULT_TICKS: u64 = 280;

    pub fn new(total_ticks: u64, seed: u64) -> Self {
        Self { total_ticks, seed }
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { total_ticks: Self::DEFAULT_TICKS, seed: 0 }
    }
}
