//! The state vector describing the vehicle and both drivers at one instant.

use std::fmt;

use fms_core::geo::wrap_heading;
use fms_core::{GeoPoint, RandomSource, Tick};

use crate::params::{SpeedParams, VehicleParams};

// ── Seed cities ───────────────────────────────────────────────────────────────

/// A named starting location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct City {
    pub name:     &'static str,
    pub location: GeoPoint,
}

/// Central-European cities a run may start near.
pub const SEED_CITIES: [City; 7] = [
    City { name: "Munich",    location: GeoPoint::new(48.137154, 11.576124) },
    City { name: "Berlin",    location: GeoPoint::new(52.520008, 13.404954) },
    City { name: "Vienna",    location: GeoPoint::new(48.208176, 16.373819) },
    City { name: "Prague",    location: GeoPoint::new(50.073658, 14.418540) },
    City { name: "Warsaw",    location: GeoPoint::new(52.229676, 21.012229) },
    City { name: "Frankfurt", location: GeoPoint::new(50.110924, 8.682127) },
    City { name: "Zurich",    location: GeoPoint::new(47.376888, 8.541694) },
];

// ── WorkingState ──────────────────────────────────────────────────────────────

/// Tachograph activity of one driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum WorkingState {
    Rest,
    Drive,
    Work,
    Available,
}

impl WorkingState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkingState::Rest      => "REST",
            WorkingState::Drive     => "DRIVE",
            WorkingState::Work      => "WORK",
            WorkingState::Available => "AVAILABLE",
        }
    }

    /// Anything but `Rest` counts towards the active-cycle budget.
    #[inline]
    pub fn is_active(self) -> bool {
        self != WorkingState::Rest
    }
}

impl fmt::Display for WorkingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Phase ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Driving,
    Resting,
}

/// Speed profile drawn whenever a driving period starts.
///
/// `base_speed` is the launch target the speed model accelerates towards;
/// the remaining fields describe the profile for downstream inspection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedProfile {
    pub base_speed:   f64,
    pub variation:    f64,
    pub period:       f64,
    /// Radians.
    pub phase_offset: f64,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self { base_speed: 0.0, variation: 0.0, period: 50.0, phase_offset: 0.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseState {
    pub phase: Phase,
    /// Ticks since the last phase flip; incremented once per tick.
    pub counter: u32,
    /// Planned length of the current driving period.
    pub driving_duration: u32,
    /// Planned length of the current resting period.
    pub rest_duration: u32,
    pub profile: SpeedProfile,
}

impl PhaseState {
    #[inline]
    pub fn is_driving(&self) -> bool {
        self.phase == Phase::Driving
    }
}

// ── Speed ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedMode {
    Cruising,
    Transitioning,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedState {
    pub mode: SpeedMode,
    /// Smoothed speed without jitter.
    pub current_speed: f64,
    pub target_speed: f64,
    /// Reported speed (km/h): `current_speed` plus jitter, clamped.
    pub vehicle_speed: f64,
    /// Reported engine speed (rpm).
    pub engine_speed: f64,
    pub cruise_counter: u32,
    pub cruise_duration: u32,
    pub transition_counter: u32,
    pub transition_duration: u32,
}

impl SpeedState {
    fn parked(engine_speed: f64, cruise_duration: u32) -> Self {
        Self {
            mode: SpeedMode::Cruising,
            current_speed: 0.0,
            target_speed: 0.0,
            vehicle_speed: 0.0,
            engine_speed,
            cruise_counter: 0,
            cruise_duration,
            transition_counter: 0,
            transition_duration: 0,
        }
    }

    fn cruising(speed: f64, engine_speed: f64, cruise_duration: u32) -> Self {
        Self {
            current_speed: speed,
            target_speed: speed,
            vehicle_speed: speed,
            ..Self::parked(engine_speed, cruise_duration)
        }
    }
}

// ── Resources and position ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    /// Percent.
    pub fuel_level: f64,
    /// Percent.
    pub adblue_level: f64,
    /// Kilograms.
    pub current_weight: f64,
    /// Degrees Celsius.
    pub air_temperature: f64,
    /// Odometer in metres; never decreases.
    pub traveled_distance: u64,
    /// Never decreases.
    pub engine_hours: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub point: GeoPoint,
    /// Degrees in `[0, 360)`; 0 = north, 90 = east.
    pub heading: f64,
}

// ── Drivers ───────────────────────────────────────────────────────────────────

/// Which of the two tachograph slots a driver occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriverSlot {
    One,
    Two,
}

impl DriverSlot {
    pub const ALL: [DriverSlot; 2] = [DriverSlot::One, DriverSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            DriverSlot::One => 0,
            DriverSlot::Two => 1,
        }
    }

    #[inline]
    pub fn other(self) -> DriverSlot {
        match self {
            DriverSlot::One => DriverSlot::Two,
            DriverSlot::Two => DriverSlot::One,
        }
    }
}

impl fmt::Display for DriverSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver{}", self.index() + 1)
    }
}

/// Duty-cycle bookkeeping for one driver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverDuty {
    pub working_state: WorkingState,
    pub is_card_present: bool,
    /// Consecutive ticks spent in a non-REST state.
    pub active_cycles: u32,
    /// Consecutive ticks spent in REST.
    pub rest_cycles: u32,
    pub needs_break: bool,
    pub last_break_tick: Tick,
}

impl DriverDuty {
    pub fn new(working_state: WorkingState, is_card_present: bool) -> Self {
        Self {
            working_state,
            is_card_present,
            active_cycles: 0,
            rest_cycles: 0,
            needs_break: false,
            last_break_tick: Tick::ZERO,
        }
    }
}

// ── VehicleState ──────────────────────────────────────────────────────────────

/// Full state of one simulated vehicle and its two drivers.
///
/// Created once per run, advanced by [`step`][crate::step] once per tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleState {
    /// Global tick counter; incremented at the start of every step.
    pub cycle_count: Tick,
    pub phase: PhaseState,
    pub speed: SpeedState,
    pub resources: Resources,
    pub position: Position,
    pub parking_brake_engaged: bool,
    pub drivers: [DriverDuty; 2],
}

impl VehicleState {
    /// Draw a randomized initial state.
    ///
    /// Draw order: driver states and cards, phase, durations, tank levels,
    /// odometer, temperature, engine hours, weight, speed block, position,
    /// then the optional city snap.
    pub fn random<R: RandomSource>(params: &VehicleParams, rng: &mut R) -> Self {
        let init = &params.init;

        let driver1 = *rng
            .pick(&[WorkingState::Rest, WorkingState::Drive, WorkingState::Work])
            .unwrap_or(&WorkingState::Rest);
        let driver2 = *rng
            .pick(&[WorkingState::Rest, WorkingState::Available])
            .unwrap_or(&WorkingState::Rest);
        let card1 = rng.chance(0.5);
        let card2 = rng.chance(0.5);

        let driving = rng.chance(init.start_driving_chance);
        let driving_duration = init.initial_drive_ticks.draw(rng);
        let rest_duration = init.initial_rest_ticks.draw(rng);

        let low_fuel = rng.chance(init.low_level_chance);
        let low_adblue = rng.chance(init.low_level_chance);
        let fuel_level = if low_fuel { init.low_level.draw(rng) } else { init.fuel_level.draw(rng) };
        let adblue_level =
            if low_adblue { init.low_level.draw(rng) } else { init.adblue_level.draw(rng) };

        let resources = Resources {
            fuel_level,
            adblue_level,
            traveled_distance: u64::from(init.odometer.draw(rng)),
            air_temperature: init.air_temperature.draw(rng),
            engine_hours: init.engine_hours.draw(rng),
            current_weight: init.weight.draw(rng),
        };

        let speed_params = &params.speed;
        let (speed, driver1) = if driving {
            let cruise = init.cruise_speed.draw(rng);
            let engine = speed_params.engine_rpm(cruise);
            let cruise_duration = speed_params.cruise_ticks.draw(rng);
            (SpeedState::cruising(cruise, engine, cruise_duration), WorkingState::Drive)
        } else {
            let engine = if rng.chance(init.engine_off_when_parked_chance) {
                0.0
            } else {
                speed_params.idle_rpm
            };
            (SpeedState::parked(engine, speed_params.cruise_ticks.min), WorkingState::Rest)
        };

        let mut point = GeoPoint::new(init.latitude.draw(rng), init.longitude.draw(rng));
        let heading = wrap_heading(init.heading.draw(rng));
        if rng.chance(init.city_start_chance) {
            if let Some(city) = rng.pick(&SEED_CITIES) {
                let j = init.city_jitter;
                point = city.location.jittered(rng.uniform(-j, j), rng.uniform(-j, j));
            }
        }

        let parking_brake_engaged = speed.vehicle_speed <= 0.0;
        VehicleState {
            cycle_count: Tick::ZERO,
            phase: PhaseState {
                phase: if driving { Phase::Driving } else { Phase::Resting },
                counter: 0,
                driving_duration,
                rest_duration,
                profile: SpeedProfile::default(),
            },
            speed,
            resources,
            position: Position { point, heading },
            parking_brake_engaged,
            drivers: [DriverDuty::new(driver1, card1), DriverDuty::new(driver2, card2)],
        }
    }

    /// A vehicle on the road at a steady `speed_kmh`, driver 1 at the wheel.
    pub fn cruising(speed_kmh: f64) -> Self {
        let base = Self::default();
        let engine = SpeedParams::default().engine_rpm(speed_kmh);
        VehicleState {
            phase: PhaseState {
                phase: Phase::Driving,
                counter: 0,
                driving_duration: 40,
                rest_duration: 20,
                profile: SpeedProfile { base_speed: speed_kmh, ..SpeedProfile::default() },
            },
            speed: SpeedState::cruising(speed_kmh, engine, 20),
            parking_brake_engaged: speed_kmh <= 0.0,
            drivers: [
                DriverDuty::new(WorkingState::Drive, true),
                DriverDuty::new(WorkingState::Available, true),
            ],
            ..base
        }
    }

    #[inline]
    pub fn driver(&self, slot: DriverSlot) -> &DriverDuty {
        &self.drivers[slot.index()]
    }

    #[inline]
    pub fn driver_mut(&mut self, slot: DriverSlot) -> &mut DriverDuty {
        &mut self.drivers[slot.index()]
    }

    /// Put both drivers into the given states.  Drivers on break stay in REST.
    pub fn set_roles(&mut self, driver1: WorkingState, driver2: WorkingState) {
        self.assign(DriverSlot::One, driver1);
        self.assign(DriverSlot::Two, driver2);
    }

    /// Set one driver's state unless that driver is on break.
    pub fn assign(&mut self, slot: DriverSlot, working_state: WorkingState) {
        let driver = self.driver_mut(slot);
        if !driver.needs_break {
            driver.working_state = working_state;
        }
    }

    /// The first driver not on break, if any.
    pub fn wheel_driver(&self) -> Option<DriverSlot> {
        DriverSlot::ALL.into_iter().find(|&slot| !self.driver(slot).needs_break)
    }

    /// At least one driver is not on break.
    #[inline]
    pub fn has_fit_driver(&self) -> bool {
        self.wheel_driver().is_some()
    }
}

impl Default for VehicleState {
    /// Parked in Munich with the engine off and both drivers resting.
    fn default() -> Self {
        VehicleState {
            cycle_count: Tick::ZERO,
            phase: PhaseState {
                phase: Phase::Resting,
                counter: 0,
                driving_duration: 30,
                rest_duration: 20,
                profile: SpeedProfile::default(),
            },
            speed: SpeedState::parked(0.0, 20),
            resources: Resources {
                fuel_level: 80.0,
                adblue_level: 90.0,
                current_weight: 3000.0,
                air_temperature: 15.0,
                traveled_distance: 54_500_000,
                engine_hours: 1000.0,
            },
            position: Position { point: SEED_CITIES[0].location, heading: 0.0 },
            parking_brake_engaged: true,
            drivers: [
                DriverDuty::new(WorkingState::Rest, true),
                DriverDuty::new(WorkingState::Rest, true),
            ],
        }
    }
}
