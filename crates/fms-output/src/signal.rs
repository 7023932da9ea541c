//! The catalog of emitted signals, in output order.

/// Where a signal's value comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalSource {
    /// The run's vehicle identification number.
    Vin,
    /// A [`VehicleSnapshot`][fms_vehicle::VehicleSnapshot] field by name.
    Field(&'static str),
}

/// A dotted signal path and the value that fills it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub path:   &'static str,
    pub source: SignalSource,
}

const fn field(path: &'static str, name: &'static str) -> Signal {
    Signal { path, source: SignalSource::Field(name) }
}

const VIN: Signal = Signal {
    path:   "Vehicle.VehicleIdentification.VIN",
    source: SignalSource::Vin,
};

/// VIN plus 19 telemetry signals: 20 rows per tick.
pub const STANDARD_SIGNALS: [Signal; 20] = [
    VIN,
    field("Vehicle.Tachograph.Driver.Driver1.WorkingState", "working_state_driver1"),
    field("Vehicle.Tachograph.Driver.Driver2.WorkingState", "working_state_driver2"),
    field("Vehicle.Tachograph.Driver.Driver1.IsCardPresent", "is_card_present_driver1"),
    field("Vehicle.Tachograph.Driver.Driver2.IsCardPresent", "is_card_present_driver2"),
    field("Vehicle.Tachograph.VehicleSpeed", "vehicle_speed"),
    field("Vehicle.Powertrain.FuelSystem.Tank.First.RelativeLevel", "fuel_level"),
    field("Vehicle.TraveledDistanceHighRes", "traveled_distance"),
    field("Vehicle.Powertrain.CombustionEngine.DieselExhaustFluid.Level", "adblue_level"),
    field("Vehicle.Powertrain.CombustionEngine.Speed", "engine_speed"),
    field("Vehicle.Chassis.ParkingBrake.IsEngaged", "parking_brake_engaged"),
    field("Vehicle.Exterior.AirTemperature", "air_temperature"),
    field("Vehicle.Powertrain.CombustionEngine.EngineHours", "engine_hours"),
    field("Vehicle.CurrentOverallWeight", "current_weight"),
    field("Vehicle.CurrentLocation.Latitude", "latitude"),
    field("Vehicle.CurrentLocation.Longitude", "longitude"),
    field("Vehicle.Tachograph.Driver.Driver1.NeedsBreak", "driver1_needs_break"),
    field("Vehicle.Tachograph.Driver.Driver2.NeedsBreak", "driver2_needs_break"),
    field("Vehicle.Tachograph.Driver.Driver1.ActiveCycles", "driver1_active_cycles"),
    field("Vehicle.Tachograph.Driver.Driver2.ActiveCycles", "driver2_active_cycles"),
];

/// The standard set plus the generic speed and both rest counters.
pub const EXTENDED_SIGNALS: [Signal; 23] = [
    VIN,
    field("Vehicle.Tachograph.Driver.Driver1.WorkingState", "working_state_driver1"),
    field("Vehicle.Tachograph.Driver.Driver2.WorkingState", "working_state_driver2"),
    field("Vehicle.Tachograph.Driver.Driver1.IsCardPresent", "is_card_present_driver1"),
    field("Vehicle.Tachograph.Driver.Driver2.IsCardPresent", "is_card_present_driver2"),
    field("Vehicle.Tachograph.VehicleSpeed", "vehicle_speed"),
    field("Vehicle.Powertrain.FuelSystem.Tank.First.RelativeLevel", "fuel_level"),
    field("Vehicle.TraveledDistanceHighRes", "traveled_distance"),
    field("Vehicle.Powertrain.CombustionEngine.DieselExhaustFluid.Level", "adblue_level"),
    field("Vehicle.Speed", "vehicle_speed"),
    field("Vehicle.Powertrain.CombustionEngine.Speed", "engine_speed"),
    field("Vehicle.Chassis.ParkingBrake.IsEngaged", "parking_brake_engaged"),
    field("Vehicle.Exterior.AirTemperature", "air_temperature"),
    field("Vehicle.Powertrain.CombustionEngine.EngineHours", "engine_hours"),
    field("Vehicle.CurrentOverallWeight", "current_weight"),
    field("Vehicle.CurrentLocation.Latitude", "latitude"),
    field("Vehicle.CurrentLocation.Longitude", "longitude"),
    field("Vehicle.Tachograph.Driver.Driver1.NeedsBreak", "driver1_needs_break"),
    field("Vehicle.Tachograph.Driver.Driver2.NeedsBreak", "driver2_needs_break"),
    field("Vehicle.Tachograph.Driver.Driver1.ActiveCycles", "driver1_active_cycles"),
    field("Vehicle.Tachograph.Driver.Driver2.ActiveCycles", "driver2_active_cycles"),
    field("Vehicle.Tachograph.Driver.Driver1.RestCycles", "driver1_rest_cycles"),
    field("Vehicle.Tachograph.Driver.Driver2.RestCycles", "driver2_rest_cycles"),
];

/// Which catalog a run emits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SignalSet {
    #[default]
    Standard,
    Extended,
}

impl SignalSet {
    pub fn signals(self) -> &'static [Signal] {
        match self {
            SignalSet::Standard => &STANDARD_SIGNALS,
            SignalSet::Extended => &EXTENDED_SIGNALS,
        }
    }

    /// Rows written per tick.
    #[inline]
    pub fn rows_per_tick(self) -> usize {
        self.signals().len()
    }
}
