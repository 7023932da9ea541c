//! Simulation observer trait for progress reporting and data collection.

use fms_core::Tick;
use fms_vehicle::VehicleSnapshot;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct SpeedPrinter;
///
/// impl SimObserver for SpeedPrinter {
///     fn on_tick(&mut self, tick: Tick, snap: &VehicleSnapshot) {
///         println!("{tick}: {} km/h", snap.vehicle_speed);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the first tick with the initial state.
    fn on_run_start(&mut self, _initial: &VehicleSnapshot) {}

    /// Called after every tick with the state that tick produced.
    fn on_tick(&mut self, _tick: Tick, _snapshot: &VehicleSnapshot) {}

    /// Called once after the final tick completes.
    fn on_run_end(&mut self, _final_tick: Tick) {}

    /// Polled after every hook; `true` stops the run with
    /// [`SimError::Halted`][crate::SimError::Halted].
    fn halted(&self) -> bool {
        false
    }
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every per-tick snapshot in memory.
#[derive(Default)]
pub struct SnapshotLog {
    pub initial:   Option<VehicleSnapshot>,
    pub snapshots: Vec<VehicleSnapshot>,
    pub finished:  Option<Tick>,
}

impl SimObserver for SnapshotLog {
    fn on_run_start(&mut self, initial: &VehicleSnapshot) {
        self.initial = Some(initial.clone());
    }

    fn on_tick(&mut self, _tick: Tick, snapshot: &VehicleSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.finished = Some(final_tick);
    }
}
