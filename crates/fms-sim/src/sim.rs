//! The `Sim` struct and its tick loop.

use fms_core::{RandomSource, RunConfig, Tick};
use fms_vehicle::{PhaseTransition, TickReport, VehicleParams, VehicleSnapshot, VehicleState};
use tracing::{debug, info, trace};

use crate::{SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// Owns the vehicle state and the random source and advances them one
/// tick at a time through [`fms_vehicle::step`].  After every tick the
/// observer receives a [`VehicleSnapshot`]; the engine itself never fails,
/// so the only error a run can end with is an observer halting it.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Run length and seed.
    pub config: RunConfig,

    /// Validated vehicle-model thresholds.
    pub params: VehicleParams,

    state: VehicleState,
    rng:   Box<dyn RandomSource>,
}

impl Sim {
    pub(crate) fn new(
        config: RunConfig,
        params: VehicleParams,
        state:  VehicleState,
        rng:    Box<dyn RandomSource>,
    ) -> Self {
        Self { config, params, state, rng }
    }

    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Ticks simulated so far.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.state.cycle_count
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot::of(&self.state)
    }

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Calls `on_run_start` once, `on_tick` after every tick and
    /// `on_run_end` at the end.  Use [`NoopObserver`][crate::NoopObserver]
    /// if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let remaining = self.config.end_tick().since(self.current_tick());
        info!(ticks = remaining, seed = self.config.seed, "run started");

        observer.on_run_start(&self.snapshot());
        self.check(observer)?;

        self.run_ticks(remaining, observer)?;

        let final_tick = self.current_tick();
        observer.on_run_end(final_tick);
        self.check(observer)?;

        info!(
            final_tick = final_tick.0,
            odometer_m = self.state.resources.traveled_distance,
            fuel = self.state.resources.fuel_level,
            "run finished"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.  Does not call the
    /// start/end hooks.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let snapshot = self.step_once();
            observer.on_tick(snapshot.tick, &snapshot);
            self.check(observer)?;
        }
        Ok(())
    }

    /// Advance one tick and return its snapshot.
    pub fn step_once(&mut self) -> VehicleSnapshot {
        let report =
            fms_vehicle::step_in_place(&mut self.state, &self.params, &mut self.rng);
        let snapshot = VehicleSnapshot::of(&self.state);
        self.log_report(&report, &snapshot);
        snapshot
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn check<O: SimObserver>(&self, observer: &O) -> SimResult<()> {
        if observer.halted() {
            let tick = self.current_tick();
            info!(tick = tick.0, "run halted by observer");
            return Err(SimError::Halted { tick });
        }
        Ok(())
    }

    fn log_report(&self, report: &TickReport, snapshot: &VehicleSnapshot) {
        match report.phase {
            Some(PhaseTransition::Stop(trigger)) => {
                debug!(tick = report.tick.0, ?trigger, "driving period ended");
            }
            Some(PhaseTransition::Resume(trigger)) => {
                debug!(
                    tick = report.tick.0,
                    ?trigger,
                    duration = self.state.phase.driving_duration,
                    "driving resumed"
                );
            }
            None => {}
        }
        if let Some(swap) = report.swap {
            debug!(
                tick = report.tick.0,
                outgoing = %swap.outgoing,
                incoming = %swap.incoming,
                "drivers swapped"
            );
        }
        trace!(
            tick = report.tick.0,
            speed_change = ?report.speed_change,
            %snapshot,
            "tick"
        );
    }
}
