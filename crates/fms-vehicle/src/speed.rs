//! Cruise / transition speed model.
//!
//! While driving the model is a two-state machine:
//!
//! ```text
//!            spontaneous change (chance) ─┐
//!            cruise segment elapsed ──────┤
//!   Cruising ─────────────────────────────┴──▶ Transitioning
//!      ▲                                            │
//!      └──────── transition_counter >= duration ────┘
//! ```
//!
//! A phase resumption always launches a transition from the current speed
//! towards the new profile's base speed, so a parked vehicle pulls away
//! instead of jumping to cruise speed.
//!
//! While resting the vehicle decelerates to a stop, then idles or winds the
//! engine down.  `parking_brake_engaged` is derived from the final speed.
//!
//! Driver 1's working state follows the speed (DRIVE above
//! `drive_above_kmh`, WORK below, REST once stopped while resting), except
//! while that driver is on break.  When resting, driver 2 stands in for a
//! driver 1 on break until the vehicle has stopped.

use fms_core::RandomSource;

use crate::params::SpeedParams;
use crate::phase::PhaseTransition;
use crate::state::{DriverSlot, SpeedMode, VehicleState, WorkingState};

/// Why a transition started.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpeedChange {
    /// Driving resumed; accelerate towards the profile's base speed.
    Launch,
    /// Unscheduled change while cruising (traffic).
    Spontaneous,
    /// The cruise segment ran out.
    Scheduled,
}

pub struct SpeedModel;

impl SpeedModel {
    /// Advance speed and engine speed by one tick.
    ///
    /// Returns the transition started this tick, if any.
    pub fn update<R: RandomSource + ?Sized>(
        state:      &mut VehicleState,
        params:     &SpeedParams,
        transition: Option<PhaseTransition>,
        rng:        &mut R,
    ) -> Option<SpeedChange> {
        let change = if state.phase.is_driving() {
            Self::drive(state, params, transition, rng)
        } else {
            Self::rest(state, params, rng);
            None
        };
        state.parking_brake_engaged = state.speed.vehicle_speed <= 0.0;
        change
    }

    fn drive<R: RandomSource + ?Sized>(
        state:      &mut VehicleState,
        params:     &SpeedParams,
        transition: Option<PhaseTransition>,
        rng:        &mut R,
    ) -> Option<SpeedChange> {
        let mut change = None;
        if let Some(PhaseTransition::Resume(_)) = transition {
            let target = params.target_bounds.clamp(state.phase.profile.base_speed);
            let from = state.speed.vehicle_speed;
            state.speed.current_speed = from;
            Self::begin(state, target, params.scheduled_kmh_per_tick);
            change = Some(SpeedChange::Launch);
        }

        change = match state.speed.mode {
            SpeedMode::Cruising => Self::cruise(state, params, rng).or(change),
            SpeedMode::Transitioning => {
                Self::interpolate(state, params, rng);
                change
            }
        };

        let speed = &mut state.speed;
        speed.engine_speed = params.engine_rpm(speed.vehicle_speed)
            + rng.uniform(-params.rpm_jitter, params.rpm_jitter);

        let driver1 = if speed.vehicle_speed > params.drive_above_kmh {
            WorkingState::Drive
        } else {
            WorkingState::Work
        };
        state.assign(DriverSlot::One, driver1);
        change
    }

    /// Draw order: jitter, spontaneous roll, then either the spontaneous
    /// change and direction, or (segment elapsed) the large-change roll and
    /// its magnitude/direction.
    fn cruise<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &SpeedParams,
        rng:    &mut R,
    ) -> Option<SpeedChange> {
        let speed = &mut state.speed;
        speed.cruise_counter += 1;

        let jitter = rng.uniform(-params.cruise_jitter, params.cruise_jitter);
        speed.vehicle_speed = params.speed_bounds.clamp(speed.current_speed + jitter);

        if rng.chance(params.spontaneous_change_chance) {
            let amount = params.spontaneous_change.draw(rng);
            let target = params.target_bounds.clamp(speed.current_speed + rng.sign() * amount);
            Self::begin(state, target, params.spontaneous_kmh_per_tick);
            return Some(SpeedChange::Spontaneous);
        }

        if speed.cruise_counter >= speed.cruise_duration {
            let previous = speed.target_speed;
            let target = if rng.chance(params.large_change_chance) {
                let amount = params.large_change.draw(rng);
                previous + rng.sign() * amount
            } else {
                previous + rng.uniform(-params.small_change, params.small_change)
            };
            let target = params.target_bounds.clamp(target);
            Self::begin(state, target, params.scheduled_kmh_per_tick);
            return Some(SpeedChange::Scheduled);
        }
        None
    }

    /// Close `damping * progress` of the remaining gap, then snap to the
    /// target once the transition has run its length.
    fn interpolate<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &SpeedParams,
        rng:    &mut R,
    ) {
        let speed = &mut state.speed;
        speed.transition_counter += 1;

        let duration = speed.transition_duration.max(1);
        let progress = (f64::from(speed.transition_counter) / f64::from(duration)).min(1.0);
        speed.current_speed +=
            (speed.target_speed - speed.current_speed) * progress * params.transition_damping;

        let jitter = rng.uniform(-params.transition_jitter, params.transition_jitter);
        speed.vehicle_speed = params.speed_bounds.clamp(speed.current_speed + jitter);

        if speed.transition_counter >= duration {
            speed.mode = SpeedMode::Cruising;
            speed.cruise_counter = 0;
            speed.current_speed = speed.target_speed;
            speed.cruise_duration = params.cruise_ticks.draw(rng);
        }
    }

    fn begin(state: &mut VehicleState, target: f64, kmh_per_tick: f64) {
        let speed = &mut state.speed;
        speed.mode = SpeedMode::Transitioning;
        speed.transition_counter = 0;
        speed.target_speed = target;
        speed.transition_duration = transition_ticks(target - speed.current_speed, kmh_per_tick);
    }

    /// The wheel goes to the first driver not on break, so driver 2 brings
    /// the vehicle to a stop while driver 1 is on break.
    fn rest<R: RandomSource + ?Sized>(state: &mut VehicleState, params: &SpeedParams, rng: &mut R) {
        let speed = &mut state.speed;
        let at_wheel = if speed.vehicle_speed > 0.0 {
            speed.vehicle_speed = (speed.vehicle_speed - params.rest_deceleration).max(0.0);
            speed.engine_speed = params.engine_rpm(speed.vehicle_speed);
            if speed.vehicle_speed > params.drive_above_kmh {
                WorkingState::Drive
            } else {
                WorkingState::Work
            }
        } else {
            speed.vehicle_speed = 0.0;
            if speed.engine_speed > 0.0 {
                if rng.chance(params.shutdown_chance) {
                    speed.engine_speed = (speed.engine_speed - params.shutdown_step_rpm).max(0.0);
                } else {
                    speed.engine_speed =
                        params.idle_rpm + rng.uniform(-params.rpm_jitter, params.rpm_jitter);
                }
            }
            WorkingState::Rest
        };
        if let Some(slot) = state.wheel_driver() {
            state.assign(slot, at_wheel);
        }
    }
}

/// `1 + |Δ| / kmh_per_tick`, truncated; never zero.
#[inline]
pub fn transition_ticks(delta_kmh: f64, kmh_per_tick: f64) -> u32 {
    let ticks = 1.0 + delta_kmh.abs() / kmh_per_tick;
    if ticks.is_finite() { (ticks as u32).max(1) } else { 1 }
}
