//! Geographic coordinate type and dead-reckoning helpers.
//!
//! `GeoPoint` uses `f64` latitude/longitude: the per-tick displacement of a
//! truck is a few tens of metres, i.e. around 1e-4 degrees, which `f32`
//! cannot accumulate without visible drift over a long run.

/// Metres per degree of latitude (and of longitude at the equator).
pub const METRES_PER_DEGREE: f64 = 111_000.0;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Move `distance_m` metres along `heading_deg` (0 = north, 90 = east).
    ///
    /// Flat-earth approximation: one degree is [`METRES_PER_DEGREE`], and the
    /// longitude step is widened by `1 / cos(lat)` using the latitude *before*
    /// the move.  Good enough for per-second steps; no projection correction.
    pub fn advanced(self, heading_deg: f64, distance_m: f64) -> GeoPoint {
        let heading = heading_deg.to_radians();
        let d_lat = distance_m * heading.cos() / METRES_PER_DEGREE;
        let d_lon =
            distance_m * heading.sin() / (METRES_PER_DEGREE * self.lat.to_radians().cos());
        GeoPoint::new(self.lat + d_lat, self.lon + d_lon)
    }

    /// Shift both coordinates by raw degree offsets.
    #[inline]
    pub fn jittered(self, d_lat: f64, d_lon: f64) -> GeoPoint {
        GeoPoint::new(self.lat + d_lat, self.lon + d_lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Wrap a heading in degrees into `[0, 360)`.
///
/// `rem_euclid` alone can return exactly `360.0` for tiny negative inputs,
/// so the upper edge is folded back explicitly.
#[inline]
pub fn wrap_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    if h >= 360.0 { 0.0 } else { h }
}
