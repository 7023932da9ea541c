//! Named thresholds for every component of the vehicle model.
//!
//! `VehicleParams::default()` reproduces the reference behaviour.  With the
//! `serde` feature every struct deserializes with `#[serde(default)]`, so a
//! parameter file only needs the keys it overrides.

use fms_core::{FmsError, FmsResult, RandomSource};

// ── Range helpers ─────────────────────────────────────────────────────────────

/// A closed `f64` interval used both for clamping and for uniform draws.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(self, x: f64) -> bool {
        (self.min..=self.max).contains(&x)
    }

    /// One uniform draw from the interval.
    #[inline]
    pub fn draw<R: RandomSource + ?Sized>(self, rng: &mut R) -> f64 {
        rng.uniform(self.min, self.max)
    }
}

/// An inclusive range of tick counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickRange {
    pub min: u32,
    pub max: u32,
}

impl TickRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn draw<R: RandomSource + ?Sized>(self, rng: &mut R) -> u32 {
        rng.int_in(self.min, self.max)
    }
}

// ── PhaseParams ───────────────────────────────────────────────────────────────

/// Driving-period / resting-period switching.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PhaseParams {
    /// Rest length after the planned driving duration runs out.
    pub scheduled_rest_ticks: TickRange,
    /// Per-tick probability of an unplanned stop while driving.
    pub unplanned_rest_chance: f64,
    pub unplanned_rest_ticks: TickRange,
    /// Fuel level (percent) below which refuel stops become possible.
    pub refuel_below_level: f64,
    pub refuel_chance: f64,
    pub refuel_rest_ticks: TickRange,
    /// Fatigue stops only after this many ticks of the current driving period.
    pub fatigue_after_ticks: u32,
    pub fatigue_chance: f64,
    pub fatigue_rest_ticks: TickRange,
    /// Driving length after a rest runs its full course.
    pub scheduled_drive_ticks: TickRange,
    /// Per-tick probability of cutting any rest short.
    pub spontaneous_resume_chance: f64,
    /// Driving length after a spontaneous resumption.
    pub spontaneous_drive_ticks: TickRange,
    /// Speed profile drawn on every resumption.
    pub profile_base_speed: Bounds,
    pub profile_variation: Bounds,
    pub profile_period: Bounds,
}

impl Default for PhaseParams {
    fn default() -> Self {
        Self {
            scheduled_rest_ticks:      TickRange::new(10, 30),
            unplanned_rest_chance:     0.04,
            unplanned_rest_ticks:      TickRange::new(5, 20),
            refuel_below_level:        15.0,
            refuel_chance:             0.10,
            refuel_rest_ticks:         TickRange::new(15, 25),
            fatigue_after_ticks:       15,
            fatigue_chance:            0.02,
            fatigue_rest_ticks:        TickRange::new(5, 15),
            scheduled_drive_ticks:     TickRange::new(20, 45),
            spontaneous_resume_chance: 0.05,
            spontaneous_drive_ticks:   TickRange::new(40, 70),
            profile_base_speed:        Bounds::new(60.0, 85.0),
            profile_variation:         Bounds::new(5.0, 15.0),
            profile_period:            Bounds::new(30.0, 60.0),
        }
    }
}

// ── SpeedParams ───────────────────────────────────────────────────────────────

/// Cruise / transition speed sub-machine and engine speed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SpeedParams {
    /// Legal range of `vehicle_speed` (km/h).
    pub speed_bounds: Bounds,
    /// Range every transition target is clamped into.
    pub target_bounds: Bounds,
    /// Jitter added on top of `current_speed` while cruising.
    pub cruise_jitter: f64,
    /// Jitter added on top of `current_speed` while transitioning.
    pub transition_jitter: f64,
    /// Length of a cruise segment between scheduled speed changes.
    pub cruise_ticks: TickRange,
    /// Per-tick probability of an unscheduled speed change while cruising.
    pub spontaneous_change_chance: f64,
    pub spontaneous_change: Bounds,
    /// Transition length for spontaneous changes: `1 + |Δ| / this`.
    pub spontaneous_kmh_per_tick: f64,
    /// Share of scheduled changes that are large.
    pub large_change_chance: f64,
    pub large_change: Bounds,
    /// Small scheduled changes are uniform in `±small_change`.
    pub small_change: f64,
    /// Transition length for scheduled changes and launches: `1 + |Δ| / this`.
    pub scheduled_kmh_per_tick: f64,
    /// Fraction of the interpolated gap closed per transition tick.
    pub transition_damping: f64,
    /// Deceleration while resting, km/h per tick.
    pub rest_deceleration: f64,
    pub idle_rpm: f64,
    pub rpm_per_kmh: f64,
    pub rpm_jitter: f64,
    /// Per-tick probability that a parked, idling engine winds down a step.
    pub shutdown_chance: f64,
    pub shutdown_step_rpm: f64,
    /// Driver 1 is DRIVE above this speed, WORK at or below it.
    pub drive_above_kmh: f64,
}

impl SpeedParams {
    /// Engine speed for a running vehicle at `speed_kmh`, before jitter.
    #[inline]
    pub fn engine_rpm(&self, speed_kmh: f64) -> f64 {
        self.idle_rpm + speed_kmh * self.rpm_per_kmh
    }
}

impl Default for SpeedParams {
    fn default() -> Self {
        Self {
            speed_bounds:              Bounds::new(0.0, 100.0),
            target_bounds:             Bounds::new(40.0, 95.0),
            cruise_jitter:             0.3,
            transition_jitter:         0.2,
            cruise_ticks:              TickRange::new(10, 30),
            spontaneous_change_chance: 0.05,
            spontaneous_change:        Bounds::new(5.0, 15.0),
            spontaneous_kmh_per_tick:  3.0,
            large_change_chance:       0.4,
            large_change:              Bounds::new(15.0, 25.0),
            small_change:              10.0,
            scheduled_kmh_per_tick:    2.0,
            transition_damping:        0.2,
            rest_deceleration:         2.0,
            idle_rpm:                  800.0,
            rpm_per_kmh:               15.0,
            rpm_jitter:                20.0,
            shutdown_chance:           0.1,
            shutdown_step_rpm:         200.0,
            drive_above_kmh:           5.0,
        }
    }
}

// ── ResourceParams ────────────────────────────────────────────────────────────

/// Fuel, AdBlue, weight, temperature, and tachograph cards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ResourceParams {
    /// Fuel burned per tick with the engine running: `base + speed * per_kmh`.
    pub base_consumption: f64,
    pub consumption_per_kmh: f64,
    /// AdBlue burns at this fraction of the fuel rate.
    pub adblue_ratio: f64,
    /// Range of both tank levels (percent).
    pub level_bounds: Bounds,
    pub temperature_step: f64,
    pub temperature_bounds: Bounds,
    pub weight_change_chance: f64,
    pub weight_step: f64,
    pub weight_bounds: Bounds,
    /// Per-tick, per-driver probability that the card is inserted/removed.
    pub card_flip_chance: f64,
}

impl Default for ResourceParams {
    fn default() -> Self {
        Self {
            base_consumption:     0.01,
            consumption_per_kmh:  0.001,
            adblue_ratio:         0.7,
            level_bounds:         Bounds::new(0.0, 100.0),
            temperature_step:     0.1,
            temperature_bounds:   Bounds::new(-20.0, 40.0),
            weight_change_chance: 0.01,
            weight_step:          30.0,
            weight_bounds:        Bounds::new(1000.0, 5000.0),
            card_flip_chance:     0.01,
        }
    }
}

// ── GeoParams ─────────────────────────────────────────────────────────────────

/// Dead reckoning and stationary GPS noise.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct GeoParams {
    pub heading_change_chance: f64,
    /// Heading perturbations are uniform in `±heading_change` degrees.
    pub heading_change: f64,
    pub stationary_jitter_chance: f64,
    /// Stationary GPS noise, degrees, uniform in `±stationary_jitter`.
    pub stationary_jitter: f64,
}

impl Default for GeoParams {
    fn default() -> Self {
        Self {
            heading_change_chance:    0.05,
            heading_change:           20.0,
            stationary_jitter_chance: 0.01,
            stationary_jitter:        0.000_01,
        }
    }
}

// ── DutyParams ────────────────────────────────────────────────────────────────

/// Driver duty cycle and break rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DutyParams {
    /// Active ticks after which a break becomes mandatory.
    pub drive_ticks_before_break: u32,
    /// Consecutive rest ticks needed to clear a mandatory break.
    pub break_ticks: u32,
    /// A break is forced when more than this many ticks pass without one.
    pub forced_break_interval: u64,
    /// Driver 2 takes the wheel (or driver 1 drives) above this speed.
    pub handover_above_kmh: f64,
    pub swap_chance: f64,
    /// Swaps only happen above this speed.
    pub swap_above_kmh: f64,
}

impl Default for DutyParams {
    fn default() -> Self {
        Self {
            drive_ticks_before_break: 60,
            break_ticks:              30,
            forced_break_interval:    300,
            handover_above_kmh:       5.0,
            swap_chance:              0.01,
            swap_above_kmh:           20.0,
        }
    }
}

// ── InitParams ────────────────────────────────────────────────────────────────

/// Distributions of the randomized initial state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct InitParams {
    pub start_driving_chance: f64,
    pub initial_drive_ticks: TickRange,
    pub initial_rest_ticks: TickRange,
    /// Each tank independently starts low with this probability.
    pub low_level_chance: f64,
    pub low_level: Bounds,
    pub fuel_level: Bounds,
    pub adblue_level: Bounds,
    /// Odometer reading in metres.
    pub odometer: TickRange,
    pub air_temperature: Bounds,
    pub engine_hours: Bounds,
    pub weight: Bounds,
    pub cruise_speed: Bounds,
    /// Probability the engine is off when starting parked.
    pub engine_off_when_parked_chance: f64,
    pub latitude: Bounds,
    pub longitude: Bounds,
    pub heading: Bounds,
    /// Probability of starting near one of the seeded cities.
    pub city_start_chance: f64,
    pub city_jitter: f64,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            start_driving_chance:          0.9,
            initial_drive_ticks:           TickRange::new(20, 45),
            initial_rest_ticks:            TickRange::new(8, 30),
            low_level_chance:              0.5,
            low_level:                     Bounds::new(5.0, 20.0),
            fuel_level:                    Bounds::new(50.0, 100.0),
            adblue_level:                  Bounds::new(70.0, 100.0),
            odometer:                      TickRange::new(54_000_000, 55_000_000),
            air_temperature:               Bounds::new(10.0, 25.0),
            engine_hours:                  Bounds::new(0.0, 2000.0),
            weight:                        Bounds::new(1000.0, 5000.0),
            cruise_speed:                  Bounds::new(60.0, 85.0),
            engine_off_when_parked_chance: 0.7,
            latitude:                      Bounds::new(48.0, 52.0),
            longitude:                     Bounds::new(8.0, 16.0),
            heading:                       Bounds::new(0.0, 359.0),
            city_start_chance:             0.7,
            city_jitter:                   0.01,
        }
    }
}

// ── VehicleParams ─────────────────────────────────────────────────────────────

/// Every tunable constant of the vehicle model, grouped by component.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct VehicleParams {
    pub phase:     PhaseParams,
    pub speed:     SpeedParams,
    pub resources: ResourceParams,
    pub geo:       GeoParams,
    pub duty:      DutyParams,
    pub init:      InitParams,
}

impl VehicleParams {
    /// Reject probabilities outside `[0, 1]`, inverted ranges, and
    /// non-positive divisors.
    pub fn validate(&self) -> FmsResult<()> {
        let p = &self.phase;
        let s = &self.speed;
        let r = &self.resources;
        let g = &self.geo;
        let d = &self.duty;
        let i = &self.init;

        for (name, value) in [
            ("phase.unplanned_rest_chance", p.unplanned_rest_chance),
            ("phase.refuel_chance", p.refuel_chance),
            ("phase.fatigue_chance", p.fatigue_chance),
            ("phase.spontaneous_resume_chance", p.spontaneous_resume_chance),
            ("speed.spontaneous_change_chance", s.spontaneous_change_chance),
            ("speed.large_change_chance", s.large_change_chance),
            ("speed.shutdown_chance", s.shutdown_chance),
            ("speed.transition_damping", s.transition_damping),
            ("resources.weight_change_chance", r.weight_change_chance),
            ("resources.card_flip_chance", r.card_flip_chance),
            ("geo.heading_change_chance", g.heading_change_chance),
            ("geo.stationary_jitter_chance", g.stationary_jitter_chance),
            ("duty.swap_chance", d.swap_chance),
            ("init.start_driving_chance", i.start_driving_chance),
            ("init.low_level_chance", i.low_level_chance),
            ("init.engine_off_when_parked_chance", i.engine_off_when_parked_chance),
            ("init.city_start_chance", i.city_start_chance),
        ] {
            check_probability(name, value)?;
        }

        for (name, range) in [
            ("phase.scheduled_rest_ticks", p.scheduled_rest_ticks),
            ("phase.unplanned_rest_ticks", p.unplanned_rest_ticks),
            ("phase.refuel_rest_ticks", p.refuel_rest_ticks),
            ("phase.fatigue_rest_ticks", p.fatigue_rest_ticks),
            ("phase.scheduled_drive_ticks", p.scheduled_drive_ticks),
            ("phase.spontaneous_drive_ticks", p.spontaneous_drive_ticks),
            ("speed.cruise_ticks", s.cruise_ticks),
            ("init.initial_drive_ticks", i.initial_drive_ticks),
            ("init.initial_rest_ticks", i.initial_rest_ticks),
            ("init.odometer", i.odometer),
        ] {
            if range.min > range.max {
                return Err(FmsError::Config(format!(
                    "{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }

        for (name, bounds) in [
            ("phase.profile_base_speed", p.profile_base_speed),
            ("phase.profile_variation", p.profile_variation),
            ("phase.profile_period", p.profile_period),
            ("speed.speed_bounds", s.speed_bounds),
            ("speed.target_bounds", s.target_bounds),
            ("speed.spontaneous_change", s.spontaneous_change),
            ("speed.large_change", s.large_change),
            ("resources.level_bounds", r.level_bounds),
            ("resources.temperature_bounds", r.temperature_bounds),
            ("resources.weight_bounds", r.weight_bounds),
            ("init.low_level", i.low_level),
            ("init.fuel_level", i.fuel_level),
            ("init.adblue_level", i.adblue_level),
            ("init.air_temperature", i.air_temperature),
            ("init.engine_hours", i.engine_hours),
            ("init.weight", i.weight),
            ("init.cruise_speed", i.cruise_speed),
            ("init.latitude", i.latitude),
            ("init.longitude", i.longitude),
            ("init.heading", i.heading),
        ] {
            if !(bounds.min <= bounds.max) {
                return Err(FmsError::Config(format!(
                    "{name}: min {} exceeds max {}",
                    bounds.min, bounds.max
                )));
            }
        }

        if s.speed_bounds.min < 0.0 {
            return Err(FmsError::Config("speed.speed_bounds: speed cannot be negative".into()));
        }
        if r.level_bounds.min < 0.0 {
            return Err(FmsError::Config("resources.level_bounds: level cannot be negative".into()));
        }
        if i.heading.min < 0.0 || i.heading.max >= 360.0 {
            return Err(FmsError::Config("init.heading: must lie in [0, 360)".into()));
        }
        for (name, divisor) in [
            ("speed.spontaneous_kmh_per_tick", s.spontaneous_kmh_per_tick),
            ("speed.scheduled_kmh_per_tick", s.scheduled_kmh_per_tick),
        ] {
            if !(divisor > 0.0) {
                return Err(FmsError::Config(format!("{name}: must be positive")));
            }
        }
        if d.break_ticks == 0 || d.drive_ticks_before_break == 0 {
            return Err(FmsError::Config("duty: break lengths must be positive".into()));
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> FmsResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FmsError::Config(format!("{name}: probability {value} outside [0, 1]")))
    }
}
