//! Unit and scenario tests for the vehicle state machine.

#[cfg(test)]
mod helpers {
    use fms_core::ReplayRng;

    use crate::{VehicleParams, VehicleState};

    /// Every low-probability event fails with this source.
    pub fn quiet() -> ReplayRng {
        ReplayRng::constant(0.99)
    }

    /// On the road at `kmh`, with a driving period that will not run out.
    pub fn highway(kmh: f64) -> VehicleState {
        let mut s = VehicleState::cruising(kmh);
        s.phase.driving_duration = 10_000;
        s
    }

    /// Parked with a rest period that will not run out.
    pub fn parked() -> VehicleState {
        let mut s = VehicleState::default();
        s.phase.rest_duration = 10_000;
        s
    }

    pub fn params() -> VehicleParams {
        VehicleParams::default()
    }
}

// ── Params ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use crate::{Bounds, TickRange, VehicleParams};

    #[test]
    fn defaults_validate() {
        assert!(VehicleParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_probability() {
        let mut p = VehicleParams::default();
        p.duty.swap_chance = 1.5;
        let err = p.validate().unwrap_err().to_string();
        assert!(err.contains("duty.swap_chance"), "{err}");
    }

    #[test]
    fn rejects_inverted_range() {
        let mut p = VehicleParams::default();
        p.phase.scheduled_rest_ticks = TickRange::new(30, 10);
        assert!(p.validate().is_err());

        let mut p = VehicleParams::default();
        p.speed.target_bounds = Bounds::new(95.0, 40.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_zero_transition_rate() {
        let mut p = VehicleParams::default();
        p.speed.scheduled_kmh_per_tick = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn bounds_clamp_and_contain() {
        let b = Bounds::new(0.0, 100.0);
        assert_eq!(b.clamp(-3.0), 0.0);
        assert_eq!(b.clamp(130.0), 100.0);
        assert!(b.contains(100.0));
        assert!(!Bounds::new(-0.3, 0.3).contains(0.31));
    }
}

// ── PhaseController ───────────────────────────────────────────────────────────

#[cfg(test)]
mod phase {
    use fms_core::ReplayRng;

    use super::helpers::{highway, params, parked, quiet};
    use crate::{
        Phase, PhaseController, PhaseTransition, RestTrigger, ResumeTrigger, VehicleState,
        WorkingState,
    };

    #[test]
    fn driving_continues_without_triggers() {
        let mut s = highway(70.0);
        let t = PhaseController::update(&mut s, &params().phase, &mut quiet());
        assert_eq!(t, None);
        assert_eq!(s.phase.phase, Phase::Driving);
        assert_eq!(s.phase.counter, 1);
    }

    #[test]
    fn duration_expiry_wins_tie_with_unplanned_stop() {
        let mut s = VehicleState::cruising(70.0);
        s.phase.counter = s.phase.driving_duration - 1;
        // Draws: rest length (scheduled range), spontaneous-resume roll.
        // An unplanned stop would have consumed a roll first and drawn from
        // the shorter unplanned range.
        let mut rng = ReplayRng::new(vec![0.0, 0.99]);
        let t = PhaseController::update(&mut s, &params().phase, &mut rng);

        assert_eq!(t, Some(PhaseTransition::Stop(RestTrigger::DurationExpired)));
        assert_eq!(s.phase.rest_duration, params().phase.scheduled_rest_ticks.min);
        assert_eq!(rng.position(), 2);
        assert_eq!(s.phase.counter, 0);
        assert_eq!(s.driver(crate::DriverSlot::One).working_state, WorkingState::Rest);
        assert_eq!(s.driver(crate::DriverSlot::Two).working_state, WorkingState::Rest);
    }

    #[test]
    fn refuel_stop_when_tank_low() {
        let mut s = highway(70.0);
        s.resources.fuel_level = 10.0;
        // unplanned roll fails, refuel roll fires, rest length, resume roll.
        let mut rng = ReplayRng::new(vec![0.5, 0.05, 0.0, 0.99]);
        let t = PhaseController::update(&mut s, &params().phase, &mut rng);
        assert_eq!(t, Some(PhaseTransition::Stop(RestTrigger::Refuel)));
        assert_eq!(s.phase.rest_duration, params().phase.refuel_rest_ticks.min);
    }

    #[test]
    fn refuel_and_fatigue_draw_only_when_eligible() {
        let mut s = highway(70.0);
        let mut rng = ReplayRng::constant(0.5);
        PhaseController::update(&mut s, &params().phase, &mut rng);
        // Fuel is high and the period is young: only the unplanned roll.
        assert_eq!(rng.position(), 1);
    }

    #[test]
    fn fatigue_stop_after_long_driving() {
        let mut s = highway(70.0);
        s.phase.counter = 20;
        // unplanned fails, fatigue fires, rest length, resume roll.
        let mut rng = ReplayRng::new(vec![0.5, 0.01, 0.0, 0.99]);
        let t = PhaseController::update(&mut s, &params().phase, &mut rng);
        assert_eq!(t, Some(PhaseTransition::Stop(RestTrigger::Fatigue)));
        assert_eq!(s.phase.rest_duration, params().phase.fatigue_rest_ticks.min);
    }

    #[test]
    fn stop_then_spontaneous_resume_reports_resume() {
        let mut s = highway(70.0);
        let t = PhaseController::update(&mut s, &params().phase, &mut ReplayRng::constant(0.0));
        assert_eq!(t, Some(PhaseTransition::Resume(ResumeTrigger::Spontaneous)));
        assert_eq!(s.phase.phase, Phase::Driving);
        assert_eq!(s.phase.driving_duration, params().phase.spontaneous_drive_ticks.min);
    }

    #[test]
    fn rest_expiry_resumes_with_fresh_profile() {
        let mut s = VehicleState::default();
        s.phase.counter = s.phase.rest_duration - 1;
        let t = PhaseController::update(&mut s, &params().phase, &mut quiet());

        assert_eq!(t, Some(PhaseTransition::Resume(ResumeTrigger::RestExpired)));
        assert!(s.phase.is_driving());
        let p = params().phase;
        assert!(p.scheduled_drive_ticks.min <= s.phase.driving_duration);
        assert!(s.phase.driving_duration <= p.scheduled_drive_ticks.max);
        assert!(p.profile_base_speed.contains(s.phase.profile.base_speed));
        assert!((0.0..std::f64::consts::TAU).contains(&s.phase.profile.phase_offset));
        assert_eq!(s.drivers[0].working_state, WorkingState::Drive);
        assert_eq!(s.drivers[1].working_state, WorkingState::Available);
    }

    #[test]
    fn resume_leaves_driver_on_break_resting() {
        let mut s = VehicleState::default();
        s.phase.counter = s.phase.rest_duration - 1;
        s.drivers[0].needs_break = true;
        PhaseController::update(&mut s, &params().phase, &mut quiet());
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[1].working_state, WorkingState::Available);
    }

    #[test]
    fn crew_on_break_ends_driving() {
        let mut s = highway(70.0);
        s.drivers[0].needs_break = true;
        s.drivers[1].needs_break = true;
        // Outranks the unplanned roll: rest length, then the resume roll.
        let mut rng = ReplayRng::new(vec![0.0, 0.0]);
        let t = PhaseController::update(&mut s, &params().phase, &mut rng);
        assert_eq!(t, Some(PhaseTransition::Stop(RestTrigger::NoDriver)));
        assert_eq!(s.phase.phase, Phase::Resting);
        assert_eq!(s.phase.rest_duration, params().phase.scheduled_rest_ticks.min);
        assert_eq!(rng.position(), 2);
    }

    #[test]
    fn pull_over_needs_both_drivers_on_break() {
        let p = params().phase;
        let mut s = highway(70.0);
        s.drivers[0].needs_break = true;
        assert_eq!(PhaseController::pull_over(&mut s, &p, &mut quiet()), None);
        assert!(s.phase.is_driving());

        s.drivers[1].needs_break = true;
        s.phase.counter = 12;
        let mut rng = quiet();
        let t = PhaseController::pull_over(&mut s, &p, &mut rng);
        assert_eq!(t, Some(PhaseTransition::Stop(RestTrigger::NoDriver)));
        assert_eq!(s.phase.phase, Phase::Resting);
        assert_eq!(s.phase.counter, 0);
        // Only the rest length is drawn.
        assert_eq!(rng.position(), 1);

        // Already resting: nothing to do.
        assert_eq!(PhaseController::pull_over(&mut s, &p, &mut rng), None);
    }

    #[test]
    fn rest_outlasts_its_duration_while_crew_on_break() {
        let p = params().phase;
        let mut s = parked();
        s.phase.rest_duration = 5;
        s.phase.counter = 10;
        s.drivers[0].needs_break = true;
        s.drivers[1].needs_break = true;
        // Even a spontaneous-resume roll that fires is held back.
        let mut always = ReplayRng::constant(0.0);
        assert_eq!(PhaseController::update(&mut s, &p, &mut always), None);
        assert_eq!(s.phase.phase, Phase::Resting);

        s.drivers[1].needs_break = false;
        let t = PhaseController::update(&mut s, &p, &mut quiet());
        assert_eq!(t, Some(PhaseTransition::Resume(ResumeTrigger::RestExpired)));
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[1].working_state, WorkingState::Available);
    }

    #[test]
    fn resting_stays_resting_until_expiry() {
        let mut s = parked();
        let mut rng = quiet();
        for _ in 0..50 {
            assert_eq!(PhaseController::update(&mut s, &params().phase, &mut rng), None);
        }
        assert_eq!(s.phase.counter, 50);
        // One spontaneous-resume roll per resting tick.
        assert_eq!(rng.position(), 50);
    }
}

// ── SpeedModel ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use fms_core::ReplayRng;

    use super::helpers::{highway, params, parked, quiet};
    use crate::phase::{PhaseController, PhaseTransition, ResumeTrigger};
    use crate::speed::transition_ticks;
    use crate::state::SpeedMode;
    use crate::{SpeedChange, SpeedModel, VehicleState, WorkingState};

    #[test]
    fn transition_length_formula() {
        assert_eq!(transition_ticks(20.0, 2.0), 11);
        assert_eq!(transition_ticks(-9.0, 3.0), 4);
        assert_eq!(transition_ticks(0.0, 2.0), 1);
        assert_eq!(transition_ticks(10.0, 0.0), 1);
    }

    #[test]
    fn cruising_stays_near_current_speed() {
        let mut s = highway(70.0);
        let sp = params().speed;
        let change = SpeedModel::update(&mut s, &sp, None, &mut quiet());
        assert_eq!(change, None);
        assert!((s.speed.vehicle_speed - 70.0).abs() <= sp.cruise_jitter);
        assert!(!s.parking_brake_engaged);
        assert_eq!(s.drivers[0].working_state, WorkingState::Drive);
    }

    #[test]
    fn segment_end_schedules_bounded_change() {
        let mut s = highway(70.0);
        s.speed.cruise_counter = s.speed.cruise_duration - 1;
        let sp = params().speed;
        let change = SpeedModel::update(&mut s, &sp, None, &mut quiet());
        assert_eq!(change, Some(SpeedChange::Scheduled));
        assert_eq!(s.speed.mode, SpeedMode::Transitioning);
        // 0.99 picks the small branch at its upper end.
        assert!((s.speed.target_speed - 79.8).abs() < 1e-9);
        assert!(sp.target_bounds.contains(s.speed.target_speed));
    }

    #[test]
    fn spontaneous_change_uses_faster_rate() {
        let mut s = highway(70.0);
        // jitter, spontaneous roll, magnitude, direction (+).
        let mut rng = ReplayRng::new(vec![0.5, 0.0, 0.5, 0.0]);
        let change = SpeedModel::update(&mut s, &params().speed, None, &mut rng);
        assert_eq!(change, Some(SpeedChange::Spontaneous));
        assert!((s.speed.target_speed - 80.0).abs() < 1e-9);
        assert_eq!(s.speed.transition_duration, transition_ticks(10.0, 3.0));
    }

    #[test]
    fn transition_reaches_target_and_resumes_cruise() {
        let mut s = highway(60.0);
        s.speed.cruise_counter = s.speed.cruise_duration - 1;
        let sp = params().speed;
        let mut rng = quiet();
        SpeedModel::update(&mut s, &sp, None, &mut rng);
        let target = s.speed.target_speed;
        let ticks = s.speed.transition_duration;

        for _ in 0..ticks {
            let before = s.speed.current_speed;
            SpeedModel::update(&mut s, &sp, None, &mut rng);
            assert!(s.speed.current_speed >= before - 1e-9);
        }
        assert_eq!(s.speed.mode, SpeedMode::Cruising);
        assert_eq!(s.speed.current_speed, target);
        assert_eq!(s.speed.cruise_counter, 0);
    }

    #[test]
    fn resume_launches_from_standstill() {
        let mut s = VehicleState::default();
        s.phase.counter = s.phase.rest_duration - 1;
        let p = params();
        let mut rng = quiet();
        let t = PhaseController::update(&mut s, &p.phase, &mut rng);
        assert_eq!(t, Some(PhaseTransition::Resume(ResumeTrigger::RestExpired)));

        let change = SpeedModel::update(&mut s, &p.speed, t, &mut rng);
        assert_eq!(change, Some(SpeedChange::Launch));
        assert_eq!(s.speed.mode, SpeedMode::Transitioning);
        assert!(s.speed.vehicle_speed < 2.0, "jumped to {}", s.speed.vehicle_speed);
        assert_eq!(s.drivers[0].working_state, WorkingState::Work);
    }

    #[test]
    fn resting_decelerates_then_stops() {
        let mut s = highway(9.0);
        s.phase.phase = crate::Phase::Resting;
        let sp = params().speed;
        let mut rng = quiet();

        SpeedModel::update(&mut s, &sp, None, &mut rng);
        assert_eq!(s.speed.vehicle_speed, 7.0);
        assert_eq!(s.drivers[0].working_state, WorkingState::Drive);

        // 5, 3, 1, 0 (still WORK while rolling), then stopped.
        for _ in 0..5 {
            SpeedModel::update(&mut s, &sp, None, &mut rng);
        }
        assert_eq!(s.speed.vehicle_speed, 0.0);
        assert!(s.parking_brake_engaged);
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
    }

    #[test]
    fn parked_engine_off_stays_off() {
        let mut s = parked();
        let mut rng = ReplayRng::constant(0.0);
        SpeedModel::update(&mut s, &params().speed, None, &mut rng);
        assert_eq!(s.speed.engine_speed, 0.0);
        assert_eq!(rng.position(), 0);
    }

    #[test]
    fn idling_engine_winds_down() {
        let mut s = parked();
        s.speed.engine_speed = 300.0;
        SpeedModel::update(&mut s, &params().speed, None, &mut ReplayRng::constant(0.0));
        assert_eq!(s.speed.engine_speed, 100.0);
        SpeedModel::update(&mut s, &params().speed, None, &mut ReplayRng::constant(0.0));
        assert_eq!(s.speed.engine_speed, 0.0);
    }

    #[test]
    fn co_driver_stops_the_vehicle_during_a_break() {
        let mut s = highway(30.0);
        s.phase.phase = crate::Phase::Resting;
        s.drivers[0].needs_break = true;
        s.drivers[0].working_state = WorkingState::Rest;
        s.drivers[1].working_state = WorkingState::Rest;
        let sp = params().speed;
        let mut rng = quiet();

        SpeedModel::update(&mut s, &sp, None, &mut rng);
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[1].working_state, WorkingState::Drive);

        for _ in 0..15 {
            SpeedModel::update(&mut s, &sp, None, &mut rng);
        }
        assert_eq!(s.speed.vehicle_speed, 0.0);
        assert_eq!(s.drivers[1].working_state, WorkingState::Rest);
    }

    #[test]
    fn driver_on_break_is_not_put_back_to_drive() {
        let mut s = highway(70.0);
        s.drivers[0].needs_break = true;
        s.drivers[0].working_state = WorkingState::Rest;
        SpeedModel::update(&mut s, &params().speed, None, &mut quiet());
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
    }
}

// ── ResourceModel ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod resources {
    use fms_core::ReplayRng;

    use super::helpers::{highway, params, parked, quiet};
    use crate::ResourceModel;

    #[test]
    fn moving_consumes_and_travels() {
        let mut s = highway(72.0);
        ResourceModel::update(&mut s, &params().resources, &mut quiet());
        let r = &s.resources;
        assert!((r.fuel_level - (80.0 - 0.082)).abs() < 1e-9);
        assert!((r.adblue_level - (90.0 - 0.082 * 0.7)).abs() < 1e-9);
        assert_eq!(r.traveled_distance, 54_500_000 + 20);
        assert!((r.engine_hours - (1000.0 + 1.0 / 3600.0)).abs() < 1e-12);
        assert!((r.air_temperature - 15.098).abs() < 1e-9);
        assert_eq!(r.current_weight, 3000.0);
    }

    #[test]
    fn engine_off_consumes_nothing() {
        let mut s = parked();
        let before = s.resources.clone();
        ResourceModel::update(&mut s, &params().resources, &mut quiet());
        assert_eq!(s.resources.fuel_level, before.fuel_level);
        assert_eq!(s.resources.adblue_level, before.adblue_level);
        assert_eq!(s.resources.engine_hours, before.engine_hours);
        assert_eq!(s.resources.traveled_distance, before.traveled_distance);
    }

    #[test]
    fn tanks_never_go_negative() {
        let mut s = highway(90.0);
        s.resources.fuel_level = 0.001;
        s.resources.adblue_level = 0.0;
        ResourceModel::update(&mut s, &params().resources, &mut quiet());
        assert_eq!(s.resources.fuel_level, 0.0);
        assert_eq!(s.resources.adblue_level, 0.0);
    }

    #[test]
    fn weight_and_cards_change_on_roll() {
        let mut s = parked();
        ResourceModel::update(&mut s, &params().resources, &mut ReplayRng::constant(0.0));
        assert_eq!(s.resources.current_weight, 2970.0);
        assert!((s.resources.air_temperature - 14.9).abs() < 1e-9);
        assert!(!s.drivers[0].is_card_present);
        assert!(!s.drivers[1].is_card_present);
    }

    #[test]
    fn temperature_stays_in_bounds() {
        let mut s = parked();
        s.resources.air_temperature = 39.95;
        let p = params().resources;
        for _ in 0..10 {
            ResourceModel::update(&mut s, &p, &mut quiet());
        }
        assert_eq!(s.resources.air_temperature, 40.0);
    }
}

// ── GeoTracker ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tracker {
    use fms_core::ReplayRng;
    use fms_core::geo::METRES_PER_DEGREE;

    use super::helpers::{highway, params, parked, quiet};
    use crate::GeoTracker;

    #[test]
    fn heading_north_moves_latitude() {
        let mut s = highway(36.0);
        let start = s.position.point;
        GeoTracker::update(&mut s, &params().geo, &mut quiet());
        let expected = start.lat + 10.0 / METRES_PER_DEGREE;
        assert!((s.position.point.lat - expected).abs() < 1e-12);
        assert!((s.position.point.lon - start.lon).abs() < 1e-12);
        assert_eq!(s.position.heading, 0.0);
    }

    #[test]
    fn heading_perturbation_wraps() {
        let mut s = highway(50.0);
        s.position.heading = 5.0;
        // heading roll fires, turn of -20 degrees.
        GeoTracker::update(&mut s, &params().geo, &mut ReplayRng::constant(0.0));
        assert!((s.position.heading - 345.0).abs() < 1e-9);
    }

    #[test]
    fn stationary_position_holds_without_jitter() {
        let mut s = parked();
        let start = s.position.clone();
        GeoTracker::update(&mut s, &params().geo, &mut quiet());
        assert_eq!(s.position, start);
    }

    #[test]
    fn stationary_jitter_is_tiny() {
        let mut s = parked();
        let start = s.position.point;
        GeoTracker::update(&mut s, &params().geo, &mut ReplayRng::constant(0.0));
        assert!((s.position.point.lat - (start.lat - 0.000_01)).abs() < 1e-12);
        assert!((s.position.point.lon - (start.lon - 0.000_01)).abs() < 1e-12);
    }
}

// ── DriverScheduler ───────────────────────────────────────────────────────────

#[cfg(test)]
mod duty {
    use fms_core::{ReplayRng, Tick};

    use super::helpers::{highway, params, parked, quiet};
    use crate::{DriverScheduler, DriverSlot, DriverSwap, DutyRule, WorkingState};

    #[test]
    fn break_override_precedes_reconciliation() {
        let order = DutyRule::ORDER;
        let pos = |r: DutyRule| order.iter().position(|&x| x == r);
        assert!(pos(DutyRule::BreakOverride) < pos(DutyRule::RoleReconciliation));
        assert!(pos(DutyRule::CycleAccounting) < pos(DutyRule::BreakOverride));
        assert_eq!(order.last(), Some(&DutyRule::DriverSwap));
    }

    #[test]
    fn periodic_break_after_long_interval() {
        let mut s = highway(70.0);
        s.cycle_count = Tick(301);
        DriverScheduler::enforce_periodic_breaks(&mut s, &params().duty);
        assert!(s.drivers[0].needs_break);
        assert_eq!(s.drivers[0].last_break_tick, Tick(301));

        let mut s = highway(70.0);
        s.cycle_count = Tick(300);
        DriverScheduler::enforce_periodic_breaks(&mut s, &params().duty);
        assert!(!s.drivers[0].needs_break);
    }

    #[test]
    fn accounting_flags_break_at_limit() {
        let mut s = highway(70.0);
        s.drivers[0].active_cycles = 59;
        s.drivers[0].rest_cycles = 4;
        DriverScheduler::account_cycles(&mut s, &params().duty);
        assert_eq!(s.drivers[0].active_cycles, 60);
        assert_eq!(s.drivers[0].rest_cycles, 0);
        assert!(s.drivers[0].needs_break);
    }

    #[test]
    fn accounting_clears_break_after_rest() {
        let mut s = parked();
        s.drivers[1].needs_break = true;
        s.drivers[1].rest_cycles = 28;
        DriverScheduler::account_cycles(&mut s, &params().duty);
        assert!(s.drivers[1].needs_break);
        DriverScheduler::account_cycles(&mut s, &params().duty);
        assert!(!s.drivers[1].needs_break);
        assert_eq!(s.drivers[1].rest_cycles, 30);
    }

    #[test]
    fn driving_roles_follow_speed() {
        let mut s = highway(70.0);
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[0].working_state, WorkingState::Drive);
        assert_eq!(s.drivers[1].working_state, WorkingState::Available);

        let mut s = highway(3.0);
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[0].working_state, WorkingState::Work);
        assert_eq!(s.drivers[1].working_state, WorkingState::Available);
    }

    #[test]
    fn second_driver_takes_over_during_break() {
        let mut s = highway(70.0);
        s.drivers[0].needs_break = true;
        DriverScheduler::override_breaks(&mut s);
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[1].working_state, WorkingState::Drive);

        let mut s = highway(2.0);
        s.drivers[0].needs_break = true;
        DriverScheduler::override_breaks(&mut s);
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[1].working_state, WorkingState::Work);
    }

    #[test]
    fn resting_roles() {
        let mut s = parked();
        s.drivers[0].working_state = WorkingState::Work;
        s.drivers[1].working_state = WorkingState::Available;
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[1].working_state, WorkingState::Rest);

        let mut s = parked();
        s.drivers[1].working_state = WorkingState::Drive;
        DriverScheduler::reconcile_roles(&mut s, &params().duty);
        assert_eq!(s.drivers[1].working_state, WorkingState::Drive);
    }

    #[test]
    fn swap_hands_over_the_wheel() {
        let mut s = highway(70.0);
        s.cycle_count = Tick(42);
        let swap = DriverScheduler::update(&mut s, &params().duty, &mut ReplayRng::constant(0.0));
        assert_eq!(swap, Some(DriverSwap { outgoing: DriverSlot::One, incoming: DriverSlot::Two }));
        assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
        assert_eq!(s.drivers[0].active_cycles, 0);
        assert_eq!(s.drivers[0].last_break_tick, Tick(42));
        assert_eq!(s.drivers[1].working_state, WorkingState::Drive);
    }

    #[test]
    fn swap_refused_when_incoming_on_break() {
        let mut s = highway(70.0);
        s.drivers[1].needs_break = true;
        let swap = DriverScheduler::update(&mut s, &params().duty, &mut ReplayRng::constant(0.0));
        assert_eq!(swap, None);
        assert_eq!(s.drivers[0].working_state, WorkingState::Drive);
        assert_eq!(s.drivers[1].working_state, WorkingState::Rest);
    }

    #[test]
    fn swap_needs_highway_speed() {
        let mut s = highway(15.0);
        let swap = DriverScheduler::update(&mut s, &params().duty, &mut ReplayRng::constant(0.0));
        assert_eq!(swap, None);
    }

    #[test]
    fn swap_roll_drawn_every_tick() {
        let mut s = parked();
        let mut rng = quiet();
        DriverScheduler::update(&mut s, &params().duty, &mut rng);
        assert_eq!(rng.position(), 1);
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use crate::snapshot::{FIELD_NAMES, round_to};
    use crate::{FieldValue, VehicleSnapshot, VehicleState, WorkingState};

    #[test]
    fn display_lists_every_field_in_order() {
        let snap = VehicleSnapshot::of(&VehicleState::default());
        let text = snap.to_string();
        let names: Vec<&str> =
            text.split(' ').filter_map(|pair| pair.split('=').next()).collect();
        assert_eq!(names, FIELD_NAMES.to_vec());
        assert!(text.contains("vehicle_speed=0.0 "), "{text}");
        assert!(text.ends_with("cycle_count=0"), "{text}");
        assert_eq!(snap.get("no_such_field"), None);
    }

    #[test]
    fn rounding_per_field() {
        let mut s = VehicleState::cruising(71.26);
        s.speed.engine_speed = 1868.6;
        s.resources.fuel_level = 79.918;
        s.resources.adblue_level = 89.6;
        s.resources.engine_hours = 1000.000_277_7;
        s.position.point.lat = 48.137_154_4;
        let snap = VehicleSnapshot::of(&s);
        assert_eq!(snap.vehicle_speed, 71.3);
        assert_eq!(snap.engine_speed, 1869);
        assert_eq!(snap.fuel_level, 79.9);
        assert_eq!(snap.adblue_level, 90);
        assert_eq!(snap.engine_hours, 1000.0);
        assert_eq!(snap.latitude, 48.137154);
    }

    #[test]
    fn values_render_for_output() {
        let snap = VehicleSnapshot::of(&VehicleState::default());
        let text = |name| snap.get(name).map(|v| v.to_string());
        assert_eq!(text("working_state_driver1").as_deref(), Some("REST"));
        assert_eq!(text("parking_brake_engaged").as_deref(), Some("True"));
        assert_eq!(text("latitude").as_deref(), Some("48.137154"));
        assert_eq!(text("fuel_level").as_deref(), Some("80.0"));
        assert_eq!(text("traveled_distance").as_deref(), Some("54500000"));
        assert_eq!(text("engine_hours").as_deref(), Some("1000.000"));
        assert_eq!(FieldValue::Bool(false).to_string(), "False");
        assert_eq!(FieldValue::State(WorkingState::Available).to_string(), "AVAILABLE");
    }

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round_to(79.918, 1), 79.9);
        assert_eq!(round_to(-0.25, 0), -0.0);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}

// ── step: scenarios and long-run properties ───────────────────────────────────

#[cfg(test)]
mod step {
    use fms_core::{RecordingRng, ReplayRng, SimRng, Tick};

    use super::helpers::{highway, params, parked, quiet};
    use crate::{
        DriverSlot, Phase, PhaseTransition, RestTrigger, ResumeTrigger, VehicleSnapshot,
        VehicleState, WorkingState, step, step_in_place,
    };

    #[test]
    fn step_is_pure_and_counts_ticks() {
        let start = highway(70.0);
        let copy = start.clone();
        let (next, report) = step(&start, &params(), &mut quiet());
        assert_eq!(start, copy);
        assert_eq!(next.cycle_count, Tick(1));
        assert_eq!(report.tick, Tick(1));

        let mut in_place = start.clone();
        let report2 = step_in_place(&mut in_place, &params(), &mut quiet());
        assert_eq!(in_place, next);
        assert_eq!(report, report2);
    }

    #[test]
    fn sixty_active_ticks_force_a_break() {
        let p = params();
        let mut s = highway(70.0);
        s.resources.fuel_level = 50.0;
        let mut rng = quiet();

        for tick in 1..=59 {
            s = step(&s, &p, &mut rng).0;
            assert!(!s.driver(DriverSlot::One).needs_break, "early break at tick {tick}");
            assert_eq!(s.driver(DriverSlot::One).active_cycles, tick);
        }

        let (next, report) = step(&s, &p, &mut rng);
        s = next;
        let d1 = s.driver(DriverSlot::One);
        assert_eq!(d1.active_cycles, 60);
        assert!(d1.needs_break);
        assert_eq!(d1.working_state, WorkingState::Rest);
        // Driver 2 was AVAILABLE all along and is due on the same tick, so
        // nobody is left to drive: the vehicle pulls over.
        assert!(s.driver(DriverSlot::Two).needs_break);
        assert_eq!(report.phase, Some(PhaseTransition::Stop(RestTrigger::NoDriver)));
        assert_eq!(s.phase.phase, Phase::Resting);

        for tick in 61..=90 {
            let before = s.speed.vehicle_speed;
            s = step(&s, &p, &mut rng).0;
            assert_eq!(s.phase.phase, Phase::Resting, "tick {tick}");
            assert!(s.speed.vehicle_speed <= before, "tick {tick}");
            for slot in DriverSlot::ALL {
                assert_eq!(s.driver(slot).working_state, WorkingState::Rest, "tick {tick}");
            }
        }
        for slot in DriverSlot::ALL {
            assert!(!s.driver(slot).needs_break);
            assert_eq!(s.driver(slot).rest_cycles, 30);
        }

        let (next, report) = step(&s, &p, &mut rng);
        assert_eq!(report.phase, Some(PhaseTransition::Resume(ResumeTrigger::RestExpired)));
        assert!(next.phase.is_driving());
        assert_ne!(next.driver(DriverSlot::One).working_state, WorkingState::Rest);
    }

    #[test]
    fn staggered_breaks_hand_the_wheel_over() {
        let p = params();
        let mut s = highway(70.0);
        s.resources.fuel_level = 50.0;
        s.drivers[0].active_cycles = 30;
        let mut rng = quiet();

        for tick in 1..=29 {
            s = step(&s, &p, &mut rng).0;
            assert_eq!(s.driver(DriverSlot::One).working_state, WorkingState::Drive, "tick {tick}");
        }

        for tick in 30..=59 {
            s = step(&s, &p, &mut rng).0;
            let (d1, d2) = (s.driver(DriverSlot::One), s.driver(DriverSlot::Two));
            assert!(d1.needs_break, "tick {tick}");
            assert_eq!(d1.working_state, WorkingState::Rest, "tick {tick}");
            assert_eq!(d2.working_state, WorkingState::Drive, "tick {tick}");
            assert!(s.phase.is_driving(), "tick {tick}");
        }

        // Driver 1's break clears on the tick driver 2's falls due.
        s = step(&s, &p, &mut rng).0;
        let (d1, d2) = (s.driver(DriverSlot::One), s.driver(DriverSlot::Two));
        assert!(!d1.needs_break);
        assert_eq!(d1.rest_cycles, 30);
        assert_eq!(d1.working_state, WorkingState::Drive);
        assert!(d2.needs_break);
        assert_eq!(d2.working_state, WorkingState::Rest);
        assert!(s.phase.is_driving());
    }

    #[test]
    fn thirty_stationary_ticks_change_nothing_physical() {
        let p = params();
        let start = parked();
        let mut s = start.clone();
        let mut rng = quiet();
        for _ in 0..30 {
            s = step(&s, &p, &mut rng).0;
            assert_eq!(s.phase.phase, Phase::Resting);
            assert_eq!(s.speed.vehicle_speed, 0.0);
            assert!(s.parking_brake_engaged);
            assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
            assert_eq!(s.drivers[1].working_state, WorkingState::Rest);
        }
        assert_eq!(s.resources.traveled_distance, start.resources.traveled_distance);
        assert_eq!(s.resources.fuel_level, start.resources.fuel_level);
        assert_eq!(s.resources.engine_hours, start.resources.engine_hours);
        assert_eq!(s.position, start.position);
    }

    #[test]
    fn recorded_run_replays_bit_identically() {
        let p = params();
        let mut rec = RecordingRng::new(SimRng::new(42));
        let mut s = VehicleState::random(&p, &mut rec);
        let start = s.clone();
        let mut trail = Vec::new();
        for _ in 0..280 {
            s = step(&s, &p, &mut rec).0;
            trail.push(s.clone());
        }

        let mut replay = ReplayRng::new(rec.into_draws());
        let mut again = VehicleState::random(&p, &mut replay);
        assert_eq!(again, start);
        for expected in &trail {
            again = step(&again, &p, &mut replay).0;
            assert_eq!(&again, expected);
        }
    }

    #[test]
    fn random_initial_state_is_consistent() {
        let p = params();
        for seed in 0..200 {
            let s = VehicleState::random(&p, &mut SimRng::new(seed));
            assert_eq!(s.parking_brake_engaged, s.speed.vehicle_speed <= 0.0);
            assert!((0.0..360.0).contains(&s.position.heading));
            assert!((0.0..=100.0).contains(&s.resources.fuel_level));
            assert!(s.resources.traveled_distance >= 54_000_000);
            if s.phase.is_driving() {
                assert!(s.speed.vehicle_speed >= 60.0);
                assert_eq!(s.drivers[0].working_state, WorkingState::Drive);
            } else {
                assert_eq!(s.speed.vehicle_speed, 0.0);
                assert_eq!(s.drivers[0].working_state, WorkingState::Rest);
            }
        }
    }

    /// Long seeded runs never produce contradictory output.
    #[test]
    fn long_runs_hold_invariants() {
        let p = params();
        let d = &p.duty;
        for seed in 0..20 {
            let mut rng = SimRng::new(seed);
            let mut s = VehicleState::random(&p, &mut rng);
            for _ in 0..3_000 {
                let (next, _) = step(&s, &p, &mut rng);
                let snap = VehicleSnapshot::of(&next);

                assert!((0.0..=100.0).contains(&next.resources.fuel_level));
                assert!((0.0..=100.0).contains(&next.resources.adblue_level));
                assert!((0.0..=100.0).contains(&next.speed.vehicle_speed));
                assert!(next.speed.engine_speed >= 0.0);
                assert!((0.0..360.0).contains(&next.position.heading));
                assert!(next.position.point.lat.is_finite());
                assert!(next.resources.traveled_distance >= s.resources.traveled_distance);
                assert!(next.resources.engine_hours >= s.resources.engine_hours);
                assert_eq!(next.parking_brake_engaged, next.speed.vehicle_speed <= 0.0);
                assert_eq!(snap.tick, next.cycle_count);

                if !next.phase.is_driving() && next.speed.vehicle_speed <= 0.0 {
                    assert_eq!(next.drivers[0].working_state, WorkingState::Rest);
                }

                // A driving period never carries on without someone at the wheel.
                if next.phase.is_driving() {
                    let nobody_driving =
                        next.drivers.iter().all(|d| d.working_state == WorkingState::Rest);
                    assert!(next.has_fit_driver(), "seed {seed} tick {}", next.cycle_count);
                    assert!(!nobody_driving, "seed {seed} tick {}", next.cycle_count);
                }

                for slot in DriverSlot::ALL {
                    let (before, after) = (s.driver(slot), next.driver(slot));
                    if after.needs_break {
                        assert_eq!(after.working_state, WorkingState::Rest, "seed {seed}");
                    }
                    assert!(after.active_cycles <= d.drive_ticks_before_break, "seed {seed}");
                    if before.needs_break && !after.needs_break {
                        assert!(after.rest_cycles >= d.break_ticks, "seed {seed}");
                    }
                }
                s = next;
            }
        }
    }

    #[test]
    fn same_seed_same_run() {
        let p = params();
        let run = |seed| {
            let mut rng = SimRng::new(seed);
            let mut s = VehicleState::random(&p, &mut rng);
            for _ in 0..500 {
                s = step(&s, &p, &mut rng).0;
            }
            s
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }
}
