//! Spherical geometry helpers: coordinate validation, the haversine sort key,
//! and distance-derived bounding rectangles.
//!
//! Distance sorting never computes true great-circle meters on its hot path.
//! It works on a *sort key*, a monotonic function of haversine distance that
//! skips the final `asin` and radius multiply, and converts to meters only
//! when a value is surfaced to a caller or a competitive rectangle has to be
//! derived.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};

/// Minimum legal latitude in degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Maximum legal latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Minimum legal longitude in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Maximum legal longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Mean earth radius in meters (IUGG).
pub const EARTH_MEAN_RADIUS_METERS: f64 = 6_371_008.771_4;

const MIN_LAT_RADIANS: f64 = -FRAC_PI_2;
const MAX_LAT_RADIANS: f64 = FRAC_PI_2;
const MIN_LON_RADIANS: f64 = -PI;
const MAX_LON_RADIANS: f64 = PI;

/// Validates that a latitude is within the standard +/-90 bounds.
///
/// NaN and out-of-range values fail with [`GeoError::InvalidLatitude`]; there
/// is no silent clamping anywhere in this crate.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        return Err(GeoError::InvalidLatitude(latitude));
    }
    Ok(())
}

/// Validates that a longitude is within the standard +/-180 bounds.
pub fn check_longitude(longitude: f64) -> Result<()> {
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        return Err(GeoError::InvalidLongitude(longitude));
    }
    Ok(())
}

/// Cheap, monotonic proxy for the haversine distance between two points.
///
/// The key orders any pair of points exactly as their true haversine distance
/// would, but costs three `cos` calls instead of the full formula. Convert
/// with [`haversin_meters`] when an actual distance is needed.
pub fn haversin_sort_key(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let x1 = lat1.to_radians();
    let x2 = lat2.to_radians();
    let h1 = 1.0 - (x1 - x2).cos();
    let h2 = 1.0 - ((lon1 - lon2).to_radians()).cos();
    h1 + x1.cos() * x2.cos() * h2
}

/// Converts a [`haversin_sort_key`] value into great-circle meters.
///
/// Infinite keys (documents with no stored values) map to infinite distance.
pub fn haversin_meters(sort_key: f64) -> f64 {
    if sort_key.is_infinite() {
        return sort_key;
    }
    EARTH_MEAN_RADIUS_METERS * 2.0 * (sort_key * 0.5).sqrt().min(1.0).asin()
}

/// A latitude/longitude rectangle in degrees.
///
/// `min_lon > max_lon` means the rectangle crosses the antimeridian and
/// denotes two disjoint longitude ranges, `[min_lon, 180]` and
/// `[-180, max_lon]`. Latitude never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl Rectangle {
    /// Smallest rectangle enclosing a circle of `radius_meters` around the
    /// given center.
    ///
    /// The center must already be validated. A circle that reaches a pole
    /// constrains latitude only, so the rectangle expands to the full
    /// longitude span. The radius gets 7 cm of slack so that quantizing the
    /// rectangle corners can never shave off a point sitting exactly on the
    /// boundary.
    pub fn from_point_distance(latitude: f64, longitude: f64, radius_meters: f64) -> Rectangle {
        debug_assert!(check_latitude(latitude).is_ok());
        debug_assert!(check_longitude(longitude).is_ok());

        let rad_lat = latitude.to_radians();
        let rad_lon = longitude.to_radians();
        let rad_distance = (radius_meters + 7e-2) / EARTH_MEAN_RADIUS_METERS;

        let mut min_lat = rad_lat - rad_distance;
        let mut max_lat = rad_lat + rad_distance;
        let min_lon;
        let max_lon;

        if min_lat > MIN_LAT_RADIANS && max_lat < MAX_LAT_RADIANS {
            let delta_lon = (rad_distance.sin() / rad_lat.cos()).asin();
            let mut lon_west = rad_lon - delta_lon;
            if lon_west < MIN_LON_RADIANS {
                lon_west += 2.0 * PI;
            }
            let mut lon_east = rad_lon + delta_lon;
            if lon_east > MAX_LON_RADIANS {
                lon_east -= 2.0 * PI;
            }
            min_lon = lon_west;
            max_lon = lon_east;
        } else {
            // a pole is within the radius
            min_lat = min_lat.max(MIN_LAT_RADIANS);
            max_lat = max_lat.min(MAX_LAT_RADIANS);
            min_lon = MIN_LON_RADIANS;
            max_lon = MAX_LON_RADIANS;
        }

        Rectangle {
            min_lat: min_lat.to_degrees(),
            max_lat: max_lat.to_degrees(),
            min_lon: min_lon.to_degrees(),
            max_lon: max_lon.to_degrees(),
        }
    }

    /// True if the rectangle wraps across the +/-180 meridian.
    pub fn crosses_dateline(&self) -> bool {
        self.max_lon < self.min_lon
    }
}
