//! Bounding-box predicates over the sortable point encoding.
//!
//! A [`BoxQuery`] turns a lat/lon rectangle into one or two inclusive
//! byte-range clauses the external point index can walk directly. A box whose
//! maximum longitude is numerically below its minimum crosses the
//! antimeridian and is rewritten into an OR of two boxes, one per side of the
//! dateline, rather than a single inverted range.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::codec::{
    encode_latitude, encode_latitude_ceil, encode_longitude, encode_longitude_ceil,
    int_to_sortable_bytes, EncodedPoint,
};
use crate::error::{GeoError, Result};

/// Number of indexed dimensions per point (latitude, longitude).
pub const POINT_DIMENSIONS: usize = 2;
/// Bytes per indexed dimension.
pub const BYTES_PER_DIMENSION: usize = 4;

/// An inclusive per-dimension byte range over packed points: latitude bytes
/// in dimension 0, longitude bytes in dimension 1.
///
/// This is the predicate shape the external point-index engine consumes; the
/// bytes use the big-endian sortable encoding, so byte-wise and numeric
/// comparison agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRange {
    lower: [u8; 8],
    upper: [u8; 8],
}

impl PointRange {
    fn new(lower: [u8; 8], upper: [u8; 8]) -> PointRange {
        PointRange { lower, upper }
    }

    /// Inclusive lower corner, one sortable int per dimension.
    pub fn lower(&self) -> &[u8; 8] {
        &self.lower
    }

    /// Inclusive upper corner.
    pub fn upper(&self) -> &[u8; 8] {
        &self.upper
    }

    /// Byte-wise containment test, per dimension, both bounds inclusive.
    pub fn matches(&self, point: EncodedPoint) -> bool {
        let bytes = point.to_sortable_bytes();
        for dim in 0..POINT_DIMENSIONS {
            let offset = dim * BYTES_PER_DIMENSION;
            let value = &bytes[offset..offset + BYTES_PER_DIMENSION];
            if value < &self.lower[offset..offset + BYTES_PER_DIMENSION]
                || value > &self.upper[offset..offset + BYTES_PER_DIMENSION]
            {
                return false;
            }
        }
        true
    }
}

/// A bounding-box predicate: one or two OR-composed [`PointRange`] clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxQuery {
    field: String,
    ranges: SmallVec<[PointRange; 2]>,
    constant_score: bool,
}

impl BoxQuery {
    /// Builds a box predicate for the named point field.
    ///
    /// The box lower corner is ceil-encoded and the upper corner
    /// floor-encoded, so a stored point can never be excluded by quantization
    /// (false positives of at most one step are possible instead). If
    /// `max_longitude < min_longitude` the box crosses the dateline and is
    /// split into two clauses sharing the latitude bounds, with scoring
    /// weighting disabled so a multi-valued document cannot be boosted for
    /// matching both halves.
    ///
    /// # Errors
    ///
    /// Fails if the field name is empty, a coordinate is out of bounds, or
    /// the latitude range is inverted.
    pub fn new(
        field: &str,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Result<BoxQuery> {
        if field.is_empty() {
            return Err(GeoError::InvalidInput(
                "field name must not be empty".to_string(),
            ));
        }
        if min_latitude > max_latitude {
            return Err(GeoError::InvalidInput(format!(
                "min_latitude ({min_latitude}) must be <= max_latitude ({max_latitude})"
            )));
        }

        let lower = encode_corner_ceil(min_latitude, min_longitude)?;
        let upper = encode_corner_floor(max_latitude, max_longitude)?;

        let mut ranges = SmallVec::new();
        let constant_score;
        if max_longitude < min_longitude {
            log::debug!(
                "box on \"{field}\" crosses the dateline, splitting: \
                 lon [{min_longitude}, 180] OR [-180, {max_longitude}]"
            );
            // western half: longitude left open down to the axis minimum
            let mut left_open = lower;
            left_open[BYTES_PER_DIMENSION..].copy_from_slice(&int_to_sortable_bytes(i32::MIN));
            ranges.push(PointRange::new(left_open, upper));

            // eastern half: longitude right open up to the axis maximum
            let mut right_open = upper;
            right_open[BYTES_PER_DIMENSION..].copy_from_slice(&int_to_sortable_bytes(i32::MAX));
            ranges.push(PointRange::new(lower, right_open));

            // a point cannot sit in both halves, but keep scoring flat anyway
            constant_score = true;
        } else {
            ranges.push(PointRange::new(lower, upper));
            constant_score = false;
        }

        Ok(BoxQuery {
            field: field.to_string(),
            ranges,
            constant_score,
        })
    }

    /// The point field this predicate runs against.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The OR-composed range clauses; two when the box crosses the dateline.
    pub fn ranges(&self) -> &[PointRange] {
        &self.ranges
    }

    /// True when per-clause score weighting is disabled (dateline split).
    pub fn constant_score(&self) -> bool {
        self.constant_score
    }

    /// True if any clause contains the point.
    pub fn matches(&self, point: EncodedPoint) -> bool {
        self.ranges.iter().any(|range| range.matches(point))
    }
}

fn encode_corner_ceil(latitude: f64, longitude: f64) -> Result<[u8; 8]> {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&int_to_sortable_bytes(encode_latitude_ceil(latitude)?));
    bytes[4..].copy_from_slice(&int_to_sortable_bytes(encode_longitude_ceil(longitude)?));
    Ok(bytes)
}

fn encode_corner_floor(latitude: f64, longitude: f64) -> Result<[u8; 8]> {
    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&int_to_sortable_bytes(encode_latitude(latitude)?));
    bytes[4..].copy_from_slice(&int_to_sortable_bytes(encode_longitude(longitude)?));
    Ok(bytes)
}
