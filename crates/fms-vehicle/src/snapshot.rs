//! Immutable per-tick view of the state, rounded for output.

use std::fmt;

use fms_core::Tick;

use crate::state::{DriverSlot, VehicleState, WorkingState};

/// Value of one snapshot field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldValue {
    State(WorkingState),
    Bool(bool),
    Int(i64),
    /// A rounded decimal rendered with exactly `places` digits.
    Decimal { value: f64, places: usize },
}

impl fmt::Display for FieldValue {
    /// Booleans render as `True`/`False`, the spelling downstream
    /// ingestion expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FieldValue::State(s)                 => f.write_str(s.as_str()),
            FieldValue::Bool(true)               => f.write_str("True"),
            FieldValue::Bool(false)              => f.write_str("False"),
            FieldValue::Int(n)                   => write!(f, "{n}"),
            FieldValue::Decimal { value, places } => write!(f, "{value:.places$}"),
        }
    }
}

/// Every key [`VehicleSnapshot::get`] answers, in display order.
pub const FIELD_NAMES: [&str; 23] = [
    "working_state_driver1",
    "working_state_driver2",
    "is_card_present_driver1",
    "is_card_present_driver2",
    "vehicle_speed",
    "engine_speed",
    "fuel_level",
    "traveled_distance",
    "air_temperature",
    "engine_hours",
    "parking_brake_engaged",
    "adblue_level",
    "current_weight",
    "latitude",
    "longitude",
    "driver1_needs_break",
    "driver2_needs_break",
    "driver1_active_cycles",
    "driver2_active_cycles",
    "driver1_rest_cycles",
    "driver2_rest_cycles",
    "heading",
    "cycle_count",
];

/// Rounded, read-only copy of the reportable state after one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VehicleSnapshot {
    pub tick: Tick,
    pub working_state_driver1: WorkingState,
    pub working_state_driver2: WorkingState,
    pub is_card_present_driver1: bool,
    pub is_card_present_driver2: bool,
    /// One decimal.
    pub vehicle_speed: f64,
    pub engine_speed: i64,
    /// One decimal.
    pub fuel_level: f64,
    pub adblue_level: i64,
    pub traveled_distance: u64,
    /// One decimal.
    pub air_temperature: f64,
    /// Three decimals.
    pub engine_hours: f64,
    pub parking_brake_engaged: bool,
    pub current_weight: i64,
    /// Six decimals.
    pub latitude: f64,
    /// Six decimals.
    pub longitude: f64,
    /// One decimal.
    pub heading: f64,
    pub driver1_needs_break: bool,
    pub driver2_needs_break: bool,
    pub driver1_active_cycles: u32,
    pub driver2_active_cycles: u32,
    pub driver1_rest_cycles: u32,
    pub driver2_rest_cycles: u32,
}

impl VehicleSnapshot {
    pub fn of(state: &VehicleState) -> Self {
        let d1 = state.driver(DriverSlot::One);
        let d2 = state.driver(DriverSlot::Two);
        let res = &state.resources;
        Self {
            tick: state.cycle_count,
            working_state_driver1: d1.working_state,
            working_state_driver2: d2.working_state,
            is_card_present_driver1: d1.is_card_present,
            is_card_present_driver2: d2.is_card_present,
            vehicle_speed: round_to(state.speed.vehicle_speed, 1),
            engine_speed: state.speed.engine_speed.round() as i64,
            fuel_level: round_to(res.fuel_level, 1),
            adblue_level: res.adblue_level.round() as i64,
            traveled_distance: res.traveled_distance,
            air_temperature: round_to(res.air_temperature, 1),
            engine_hours: round_to(res.engine_hours, 3),
            parking_brake_engaged: state.parking_brake_engaged,
            current_weight: res.current_weight.round() as i64,
            latitude: round_to(state.position.point.lat, 6),
            longitude: round_to(state.position.point.lon, 6),
            heading: round_to(state.position.heading, 1),
            driver1_needs_break: d1.needs_break,
            driver2_needs_break: d2.needs_break,
            driver1_active_cycles: d1.active_cycles,
            driver2_active_cycles: d2.active_cycles,
            driver1_rest_cycles: d1.rest_cycles,
            driver2_rest_cycles: d2.rest_cycles,
        }
    }

    /// Look up one field by name.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        use FieldValue::*;
        let value = match name {
            "working_state_driver1"   => State(self.working_state_driver1),
            "working_state_driver2"   => State(self.working_state_driver2),
            "is_card_present_driver1" => Bool(self.is_card_present_driver1),
            "is_card_present_driver2" => Bool(self.is_card_present_driver2),
            "vehicle_speed"           => Decimal { value: self.vehicle_speed, places: 1 },
            "engine_speed"            => Int(self.engine_speed),
            "fuel_level"              => Decimal { value: self.fuel_level, places: 1 },
            "traveled_distance"       => Int(i64::try_from(self.traveled_distance).unwrap_or(i64::MAX)),
            "air_temperature"         => Decimal { value: self.air_temperature, places: 1 },
            "engine_hours"            => Decimal { value: self.engine_hours, places: 3 },
            "parking_brake_engaged"   => Bool(self.parking_brake_engaged),
            "adblue_level"            => Int(self.adblue_level),
            "current_weight"          => Int(self.current_weight),
            "latitude"                => Decimal { value: self.latitude, places: 6 },
            "longitude"               => Decimal { value: self.longitude, places: 6 },
            "heading"                 => Decimal { value: self.heading, places: 1 },
            "driver1_needs_break"     => Bool(self.driver1_needs_break),
            "driver2_needs_break"     => Bool(self.driver2_needs_break),
            "driver1_active_cycles"   => Int(i64::from(self.driver1_active_cycles)),
            "driver2_active_cycles"   => Int(i64::from(self.driver2_active_cycles)),
            "driver1_rest_cycles"     => Int(i64::from(self.driver1_rest_cycles)),
            "driver2_rest_cycles"     => Int(i64::from(self.driver2_rest_cycles)),
            "cycle_count"             => Int(i64::try_from(self.tick.0).unwrap_or(i64::MAX)),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for VehicleSnapshot {
    /// `name=value` pairs in [`FIELD_NAMES`] order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for name in FIELD_NAMES {
            if let Some(value) = self.get(name) {
                write!(f, "{sep}{name}={value}")?;
                sep = " ";
            }
        }
        Ok(())
    }
}

/// Round half away from zero to `places` decimal digits.
#[inline]
pub fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}
