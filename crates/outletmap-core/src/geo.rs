//! Great-circle distance and coverage-radius checks.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius
//! [`EARTH_RADIUS_M`]. Coverage areas are circles of [`COVERAGE_RADIUS_M`]
//! around each outlet.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Coverage radius drawn around every outlet, in metres.
pub const COVERAGE_RADIUS_M: f64 = 5_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from optional degrees.
    ///
    /// Returns `None` when either component is absent or non-finite. Zero is a
    /// valid value (equator / prime meridian).
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Self::new(lat, lon))
            }
            _ => None,
        }
    }
}

/// Haversine great-circle distance between two coordinates, in metres.
#[must_use]
pub fn haversine_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h just above 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// `true` iff the great-circle distance between `a` and `b` is at most `radius_m`.
#[must_use]
pub fn within_radius(a: Coordinate, b: Coordinate, radius_m: f64) -> bool {
    haversine_distance_m(a, b) <= radius_m
}

/// Whether two points lie within [`COVERAGE_RADIUS_M`] of each other.
///
/// Missing or non-finite coordinates yield `false` rather than an error.
#[must_use]
pub fn is_intersecting(
    lat_a: Option<f64>,
    lon_a: Option<f64>,
    lat_b: Option<f64>,
    lon_b: Option<f64>,
) -> bool {
    match (
        Coordinate::from_parts(lat_a, lon_a),
        Coordinate::from_parts(lat_b, lon_b),
    ) {
        (Some(a), Some(b)) => within_radius(a, b, COVERAGE_RADIUS_M),
        _ => false,
    }
}

/// Variant of [`is_intersecting`] that also treats `0.0` as a missing value.
///
/// Matches the behaviour of the first map front end, where a falsy check on
/// each coordinate excluded the equator and the prime meridian. Kept so the
/// old results can be reproduced; new callers want [`is_intersecting`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_intersecting_legacy(
    lat_a: Option<f64>,
    lon_a: Option<f64>,
    lat_b: Option<f64>,
    lon_b: Option<f64>,
) -> bool {
    let non_zero = |v: Option<f64>| v.filter(|x| *x != 0.0);
    is_intersecting(non_zero(lat_a), non_zero(lon_a), non_zero(lat_b), non_zero(lon_b))
}
