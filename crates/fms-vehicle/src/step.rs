//! The pure per-tick transition function.

use fms_core::{RandomSource, Tick};

use crate::duty::{DriverScheduler, DriverSwap};
use crate::params::VehicleParams;
use crate::phase::{PhaseController, PhaseTransition};
use crate::resources::ResourceModel;
use crate::speed::{SpeedChange, SpeedModel};
use crate::state::VehicleState;
use crate::tracker::GeoTracker;

/// What happened during one tick, for logging and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick:         Tick,
    pub phase:        Option<PhaseTransition>,
    pub speed_change: Option<SpeedChange>,
    pub swap:         Option<DriverSwap>,
}

/// Advance `state` by one simulated second.
///
/// Components run in a fixed order, each reading what the previous ones
/// wrote: phase → speed → resources → position → driver duty, then a
/// final pull-over check in case both drivers went on break.  Given the
/// same input state and the same sequence of unit draws, the output is
/// bit-identical.
pub fn step<R: RandomSource + ?Sized>(
    state:  &VehicleState,
    params: &VehicleParams,
    rng:    &mut R,
) -> (VehicleState, TickReport) {
    let mut next = state.clone();
    let report = step_in_place(&mut next, params, rng);
    (next, report)
}

/// In-place form of [`step`], for callers that own the state.
pub fn step_in_place<R: RandomSource + ?Sized>(
    state:  &mut VehicleState,
    params: &VehicleParams,
    rng:    &mut R,
) -> TickReport {
    state.cycle_count = state.cycle_count.next();

    let phase = PhaseController::update(state, &params.phase, rng);
    let speed_change = SpeedModel::update(state, &params.speed, phase, rng);
    ResourceModel::update(state, &params.resources, rng);
    GeoTracker::update(state, &params.geo, rng);
    let swap = DriverScheduler::update(state, &params.duty, rng);
    let phase = PhaseController::pull_over(state, &params.phase, rng).or(phase);

    TickReport { tick: state.cycle_count, phase, speed_change, swap }
}
