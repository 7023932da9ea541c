//! Dead reckoning of latitude, longitude, and heading.

use fms_core::RandomSource;
use fms_core::geo::wrap_heading;

use crate::params::GeoParams;
use crate::resources::KMH_TO_M_PER_TICK;
use crate::state::VehicleState;

pub struct GeoTracker;

impl GeoTracker {
    /// Advance the position by one tick of travel at the current speed.
    ///
    /// Moving: heading roll (and perturbation), then the step along the
    /// heading.  Stationary: jitter roll, then latitude and longitude noise.
    pub fn update<R: RandomSource + ?Sized>(
        state:  &mut VehicleState,
        params: &GeoParams,
        rng:    &mut R,
    ) {
        let speed = state.speed.vehicle_speed;
        let pos = &mut state.position;

        if speed > 0.0 {
            if rng.chance(params.heading_change_chance) {
                let turn = rng.uniform(-params.heading_change, params.heading_change);
                pos.heading = wrap_heading(pos.heading + turn);
            }
            pos.point = pos.point.advanced(pos.heading, speed * KMH_TO_M_PER_TICK);
        } else if rng.chance(params.stationary_jitter_chance) {
            let j = params.stationary_jitter;
            let d_lat = rng.uniform(-j, j);
            let d_lon = rng.uniform(-j, j);
            pos.point = pos.point.jittered(d_lat, d_lon);
        }
    }
}
