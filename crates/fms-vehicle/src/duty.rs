//! Driver duty scheduler: break rules, role reconciliation, and swaps.
//!
//! Rules run in [`DutyRule::ORDER`].  Once [`DutyRule::BreakOverride`] has put
//! a driver on break into REST, no later rule may assign that driver any
//! other state, so a driver with `needs_break` always ends the tick in REST.

use fms_core::RandomSource;

use crate::params::DutyParams;
use crate::state::{DriverSlot, VehicleState, WorkingState};

/// One step of the scheduler's per-tick policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DutyRule {
    /// Force a break when too long has passed since the last one.
    PeriodicBreak,
    /// Count active/rest ticks; set or clear `needs_break`.
    CycleAccounting,
    /// Drivers on break are put into REST.
    BreakOverride,
    /// Assign DRIVE/WORK/AVAILABLE/REST from phase and speed.
    RoleReconciliation,
    /// Occasionally hand the wheel to the other driver.
    DriverSwap,
}

impl DutyRule {
    pub const ORDER: [DutyRule; 5] = [
        DutyRule::PeriodicBreak,
        DutyRule::CycleAccounting,
        DutyRule::BreakOverride,
        DutyRule::RoleReconciliation,
        DutyRule::DriverSwap,
    ];
}

/// A completed handover of the wheel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriverSwap {
    pub outgoing: DriverSlot,
    pub incoming: DriverSlot,
}

pub struct DriverScheduler;

impl DriverScheduler {
    /// Apply every rule in order.  The swap roll is always drawn, exactly
    /// once per tick.
    pub fn update<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &DutyParams,
        rng:    &mut R,
    ) -> Option<DriverSwap> {
        let mut swap = None;
        for rule in DutyRule::ORDER {
            match rule {
                DutyRule::PeriodicBreak      => Self::enforce_periodic_breaks(state, params),
                DutyRule::CycleAccounting    => Self::account_cycles(state, params),
                DutyRule::BreakOverride      => Self::override_breaks(state),
                DutyRule::RoleReconciliation => Self::reconcile_roles(state, params),
                DutyRule::DriverSwap         => swap = Self::maybe_swap(state, params, rng),
            }
        }
        swap
    }

    pub fn enforce_periodic_breaks(state: &mut VehicleState, params: &DutyParams) {
        let now = state.cycle_count;
        for driver in &mut state.drivers {
            if now.since(driver.last_break_tick) > params.forced_break_interval {
                driver.needs_break = true;
                driver.last_break_tick = now;
            }
        }
    }

    pub fn account_cycles(state: &mut VehicleState, params: &DutyParams) {
        for driver in &mut state.drivers {
            if driver.working_state.is_active() {
                driver.active_cycles += 1;
                driver.rest_cycles = 0;
                if driver.active_cycles >= params.drive_ticks_before_break {
                    driver.needs_break = true;
                }
            } else {
                driver.rest_cycles += 1;
                driver.active_cycles = 0;
                if driver.needs_break && driver.rest_cycles >= params.break_ticks {
                    driver.needs_break = false;
                }
            }
        }
    }

    pub fn override_breaks(state: &mut VehicleState) {
        for driver in &mut state.drivers {
            if driver.needs_break {
                driver.working_state = WorkingState::Rest;
            }
        }
    }

    /// Driving phase: driver 1 drives when moving, else works; driver 2
    /// takes over (or works) only while driver 1 rests.  Resting phase: a
    /// stopped driver 1 rests, driver 2 rests unless mid-handover.
    pub fn reconcile_roles(state: &mut VehicleState, params: &DutyParams) {
        let speed = state.speed.vehicle_speed;
        let [driver1, driver2] = &mut state.drivers;

        if state.phase.is_driving() {
            let moving = speed > params.handover_above_kmh;
            if !driver1.needs_break {
                driver1.working_state = if moving { WorkingState::Drive } else { WorkingState::Work };
            }
            if !driver2.needs_break {
                let driver1_resting = driver1.working_state == WorkingState::Rest;
                driver2.working_state = match (driver1_resting, moving) {
                    (true, true)  => WorkingState::Drive,
                    (true, false) => WorkingState::Work,
                    (false, _)    => WorkingState::Available,
                };
            }
        } else {
            if !driver1.needs_break && speed <= 0.0 {
                driver1.working_state = WorkingState::Rest;
            }
            if !driver2.needs_break && driver2.working_state != WorkingState::Drive {
                driver2.working_state = WorkingState::Rest;
            }
        }
    }

    /// Hand the wheel from whoever is driving to the other driver, provided
    /// the incoming driver is not on break.  The outgoing driver rests with
    /// fresh counters.
    pub fn maybe_swap<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &DutyParams,
        rng:    &mut R,
    ) -> Option<DriverSwap> {
        let roll = rng.chance(params.swap_chance);
        if !roll || !state.phase.is_driving() || state.speed.vehicle_speed <= params.swap_above_kmh {
            return None;
        }

        let outgoing = DriverSlot::ALL.into_iter().find(|&slot| {
            state.driver(slot).working_state == WorkingState::Drive
                && !state.driver(slot.other()).needs_break
        })?;
        let incoming = outgoing.other();
        let now = state.cycle_count;

        let out = state.driver_mut(outgoing);
        out.working_state = WorkingState::Rest;
        out.active_cycles = 0;
        out.last_break_tick = now;
        state.driver_mut(incoming).working_state = WorkingState::Drive;

        Some(DriverSwap { outgoing, incoming })
    }
}
