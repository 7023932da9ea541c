//! Fuel, AdBlue, odometer, engine hours, temperature, weight, and cards.

use fms_core::RandomSource;

use crate::params::ResourceParams;
use crate::state::VehicleState;

/// Kilometres per hour to metres per one-second tick.
pub const KMH_TO_M_PER_TICK: f64 = 1.0 / 3.6;

pub struct ResourceModel;

impl ResourceModel {
    /// Consume and perturb resources for one tick.
    ///
    /// Draw order: temperature step, weight roll (and step when it fires),
    /// card roll for driver 1, card roll for driver 2.
    pub fn update<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &ResourceParams,
        rng:    &mut R,
    ) {
        let speed = state.speed.vehicle_speed;
        let engine_running = state.speed.engine_speed > 0.0;
        let res = &mut state.resources;

        if engine_running {
            let fuel_burn = params.base_consumption + speed * params.consumption_per_kmh;
            res.fuel_level = params.level_bounds.clamp(res.fuel_level - fuel_burn);
            res.adblue_level =
                params.level_bounds.clamp(res.adblue_level - fuel_burn * params.adblue_ratio);
            res.engine_hours += 1.0 / 3600.0;
        }

        if speed > 0.0 {
            res.traveled_distance += (speed * KMH_TO_M_PER_TICK).round() as u64;
        }

        let step = rng.uniform(-params.temperature_step, params.temperature_step);
        res.air_temperature = params.temperature_bounds.clamp(res.air_temperature + step);

        if rng.chance(params.weight_change_chance) {
            let step = rng.uniform(-params.weight_step, params.weight_step);
            res.current_weight = params.weight_bounds.clamp(res.current_weight + step);
        }

        for driver in &mut state.drivers {
            if rng.chance(params.card_flip_chance) {
                driver.is_card_present = !driver.is_card_present;
            }
        }
    }
}
