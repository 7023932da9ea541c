//! Driving-period / resting-period controller.
//!
//! # Transition table
//!
//! Evaluated once per tick after `counter` is incremented.  The first row
//! whose guard holds wins; later rows draw no randomness.
//!
//! | From    | Trigger                        | Guard                                   |
//! |---------|--------------------------------|-----------------------------------------|
//! | Driving | [`RestTrigger::DurationExpired`] | `counter >= driving_duration`          |
//! | Driving | [`RestTrigger::NoDriver`]      | both drivers on break                   |
//! | Driving | [`RestTrigger::Unplanned`]     | `chance(unplanned_rest_chance)`         |
//! | Driving | [`RestTrigger::Refuel`]        | `fuel < refuel_below_level` and `chance` |
//! | Driving | [`RestTrigger::Fatigue`]       | `counter > fatigue_after_ticks` and `chance` |
//! | Resting | [`ResumeTrigger::RestExpired`] | `counter >= rest_duration`, a driver fit |
//!
//! After the table, a vehicle that is resting (including one that started
//! resting this very tick) resumes with probability
//! `spontaneous_resume_chance` ([`ResumeTrigger::Spontaneous`]), again only
//! when a driver is fit to take the wheel.
//!
//! Breaks are decided after the phase, so [`PhaseController::pull_over`] runs
//! once more at the end of the tick: a driving period never outlasts the
//! tick in which its last fit driver went on break.

use fms_core::RandomSource;

use crate::params::{PhaseParams, TickRange};
use crate::state::{Phase, SpeedProfile, VehicleState, WorkingState};

/// Why a driving period ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RestTrigger {
    DurationExpired,
    /// Both drivers are on break; nobody can take the wheel.
    NoDriver,
    Unplanned,
    Refuel,
    Fatigue,
}

impl RestTrigger {
    /// Evaluation order; duration expiry always wins a tie.
    pub const PRIORITY: [RestTrigger; 5] = [
        RestTrigger::DurationExpired,
        RestTrigger::NoDriver,
        RestTrigger::Unplanned,
        RestTrigger::Refuel,
        RestTrigger::Fatigue,
    ];

    fn fires<R: RandomSource + ?Sized>(
        self,
        state:  &VehicleState,
        params: &PhaseParams,
        rng:    &mut R,
    ) -> bool {
        let phase = &state.phase;
        match self {
            RestTrigger::DurationExpired => phase.counter >= phase.driving_duration,
            RestTrigger::NoDriver => !state.has_fit_driver(),
            RestTrigger::Unplanned => rng.chance(params.unplanned_rest_chance),
            RestTrigger::Refuel => {
                state.resources.fuel_level < params.refuel_below_level
                    && rng.chance(params.refuel_chance)
            }
            RestTrigger::Fatigue => {
                phase.counter > params.fatigue_after_ticks && rng.chance(params.fatigue_chance)
            }
        }
    }

    pub fn rest_ticks(self, params: &PhaseParams) -> TickRange {
        match self {
            RestTrigger::DurationExpired => params.scheduled_rest_ticks,
            RestTrigger::NoDriver        => params.scheduled_rest_ticks,
            RestTrigger::Unplanned       => params.unplanned_rest_ticks,
            RestTrigger::Refuel          => params.refuel_rest_ticks,
            RestTrigger::Fatigue         => params.fatigue_rest_ticks,
        }
    }
}

/// Why a resting period ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResumeTrigger {
    RestExpired,
    Spontaneous,
}

impl ResumeTrigger {
    pub fn drive_ticks(self, params: &PhaseParams) -> TickRange {
        match self {
            ResumeTrigger::RestExpired => params.scheduled_drive_ticks,
            ResumeTrigger::Spontaneous => params.spontaneous_drive_ticks,
        }
    }
}

/// A phase flip that happened during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseTransition {
    Stop(RestTrigger),
    Resume(ResumeTrigger),
}

/// Governs `phase` and its duration counters.
pub struct PhaseController;

impl PhaseController {
    /// Advance the phase by one tick.
    ///
    /// Returns the last transition taken this tick, if any.  A stop followed
    /// by a spontaneous resumption in the same tick reports the resumption.
    pub fn update<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &PhaseParams,
        rng:    &mut R,
    ) -> Option<PhaseTransition> {
        state.phase.counter = state.phase.counter.saturating_add(1);

        let mut transition = None;
        match state.phase.phase {
            Phase::Driving => {
                let fired = RestTrigger::PRIORITY
                    .into_iter()
                    .find(|trigger| trigger.fires(state, params, rng));
                if let Some(trigger) = fired {
                    Self::stop(state, trigger, params, rng);
                    transition = Some(PhaseTransition::Stop(trigger));
                }
            }
            Phase::Resting => {
                if state.phase.counter >= state.phase.rest_duration && state.has_fit_driver() {
                    Self::resume(state, ResumeTrigger::RestExpired, params, rng);
                    transition = Some(PhaseTransition::Resume(ResumeTrigger::RestExpired));
                }
            }
        }

        if state.phase.phase == Phase::Resting
            && rng.chance(params.spontaneous_resume_chance)
            && state.has_fit_driver()
        {
            Self::resume(state, ResumeTrigger::Spontaneous, params, rng);
            transition = Some(PhaseTransition::Resume(ResumeTrigger::Spontaneous));
        }

        transition
    }

    /// End the driving period if no driver is left to take the wheel.
    ///
    /// Draws the rest length only when it fires.
    pub fn pull_over<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &PhaseParams,
        rng:    &mut R,
    ) -> Option<PhaseTransition> {
        if !state.phase.is_driving() || state.has_fit_driver() {
            return None;
        }
        Self::stop(state, RestTrigger::NoDriver, params, rng);
        Some(PhaseTransition::Stop(RestTrigger::NoDriver))
    }

    fn stop<R: RandomSource + ?Sized>(
        state:   &mut VehicleState,
        trigger: RestTrigger,
        params:  &PhaseParams,
        rng:     &mut R,
    ) {
        state.phase.phase = Phase::Resting;
        state.phase.counter = 0;
        state.phase.rest_duration = trigger.rest_ticks(params).draw(rng);
        state.set_roles(WorkingState::Rest, WorkingState::Rest);
    }

    fn resume<R: RandomSource + ?Sized>(
        state:   &mut VehicleState,
        trigger: ResumeTrigger,
        params:  &PhaseParams,
        rng:     &mut R,
    ) {
        state.phase.phase = Phase::Driving;
        state.phase.counter = 0;
        state.phase.driving_duration = trigger.drive_ticks(params).draw(rng);
        state.set_roles(WorkingState::Drive, WorkingState::Available);

        let base_speed = params.profile_base_speed.draw(rng);
        let variation = params.profile_variation.draw(rng);
        let period = params.profile_period.draw(rng);
        let phase_offset = rng.uniform(0.0, std::f64::consts::TAU);
        state.phase.profile = SpeedProfile { base_speed, variation, period, phase_offset };
    }
}
