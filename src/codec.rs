//! Quantized, sortable lat/lon encoding.
//!
//! Each axis is quantized into `2^32` evenly spaced buckets over its legal
//! range, giving an order-preserving 32-bit integer per axis. Encoding is
//! lossy: a round trip can move a coordinate by up to one quantization step
//! (about 1e-7 degrees). Floor rounding is used for stored values and query
//! upper bounds; ceiling rounding for query lower bounds, so range queries
//! over the encoding can produce false positives of at most one step but
//! never false negatives.
//!
//! The packed 64-bit [`EncodedPoint`] and its big-endian sortable byte layout
//! are the on-disk representation of a point field; byte-wise comparison of
//! the layout agrees with numeric comparison of the original coordinates up
//! to quantization.

use std::fmt;

use geo::Point;

use crate::error::Result;
use crate::geometry::{check_latitude, check_longitude, MAX_LATITUDE, MAX_LONGITUDE};

/// Bits per encoded axis.
const BITS: u32 = 32;

/// Degrees of longitude per quantization bucket.
pub const LONGITUDE_STEP: f64 = 360.0 / (1u64 << BITS) as f64;
/// Degrees of latitude per quantization bucket.
pub const LATITUDE_STEP: f64 = 180.0 / (1u64 << BITS) as f64;

/// Quantizes a latitude into 32 bits, rounding down (towards -90).
///
/// Fails with [`GeoError::InvalidLatitude`](crate::GeoError::InvalidLatitude)
/// if the value is out of bounds.
pub fn encode_latitude(latitude: f64) -> Result<i32> {
    check_latitude(latitude)?;
    Ok(encode_latitude_unchecked(latitude))
}

/// Quantizes a latitude into 32 bits, rounding up (towards +90).
pub fn encode_latitude_ceil(latitude: f64) -> Result<i32> {
    check_latitude(latitude)?;
    Ok(encode_latitude_ceil_unchecked(latitude))
}

/// Quantizes a longitude into 32 bits, rounding down (towards -180).
///
/// Fails with [`GeoError::InvalidLongitude`](crate::GeoError::InvalidLongitude)
/// if the value is out of bounds.
pub fn encode_longitude(longitude: f64) -> Result<i32> {
    check_longitude(longitude)?;
    Ok(encode_longitude_unchecked(longitude))
}

/// Quantizes a longitude into 32 bits, rounding up (towards +180).
pub fn encode_longitude_ceil(longitude: f64) -> Result<i32> {
    check_longitude(longitude)?;
    Ok(encode_longitude_ceil_unchecked(longitude))
}

pub(crate) fn encode_latitude_unchecked(mut latitude: f64) -> i32 {
    // the exact maximum has no bucket of its own and would overflow
    if latitude == MAX_LATITUDE {
        latitude = latitude.next_down();
    }
    (latitude / LATITUDE_STEP).floor() as i32
}

pub(crate) fn encode_latitude_ceil_unchecked(mut latitude: f64) -> i32 {
    if latitude == MAX_LATITUDE {
        latitude = latitude.next_down();
    }
    (latitude / LATITUDE_STEP).ceil() as i32
}

pub(crate) fn encode_longitude_unchecked(mut longitude: f64) -> i32 {
    if longitude == MAX_LONGITUDE {
        longitude = longitude.next_down();
    }
    (longitude / LONGITUDE_STEP).floor() as i32
}

pub(crate) fn encode_longitude_ceil_unchecked(mut longitude: f64) -> i32 {
    if longitude == MAX_LONGITUDE {
        longitude = longitude.next_down();
    }
    (longitude / LONGITUDE_STEP).ceil() as i32
}

/// Turns a quantized latitude back into degrees.
///
/// The result always lies within the legal latitude range; a violation would
/// be a codec bug, checked in debug builds only.
pub fn decode_latitude(encoded: i32) -> f64 {
    let result = encoded as f64 * LATITUDE_STEP;
    debug_assert!((-MAX_LATITUDE..=MAX_LATITUDE).contains(&result));
    result
}

/// Turns a quantized longitude back into degrees.
pub fn decode_longitude(encoded: i32) -> f64 {
    let result = encoded as f64 * LONGITUDE_STEP;
    debug_assert!((-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&result));
    result
}

/// Encodes a signed 32-bit value as 4 big-endian bytes whose byte-wise order
/// matches the numeric order (sign bit flipped).
pub fn int_to_sortable_bytes(value: i32) -> [u8; 4] {
    ((value as u32) ^ 0x8000_0000).to_be_bytes()
}

/// Inverse of [`int_to_sortable_bytes`].
pub fn sortable_bytes_to_int(bytes: [u8; 4]) -> i32 {
    (u32::from_be_bytes(bytes) ^ 0x8000_0000) as i32
}

/// A lat/lon pair quantized and packed into 64 bits: encoded latitude in the
/// high 32 bits, encoded longitude in the low 32.
///
/// This is the per-document stored representation of a point field. The
/// packing and the byte layout produced by [`to_sortable_bytes`] are index
/// compatibility and must not change.
///
/// [`to_sortable_bytes`]: EncodedPoint::to_sortable_bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedPoint(i64);

impl EncodedPoint {
    /// Quantizes and packs a coordinate pair, rounding both axes down.
    pub fn new(latitude: f64, longitude: f64) -> Result<EncodedPoint> {
        Ok(EncodedPoint::from_bits(
            encode_latitude(latitude)?,
            encode_longitude(longitude)?,
        ))
    }

    /// Quantizes and packs a [`geo::Point`] (x = longitude, y = latitude).
    pub fn from_point(point: &Point) -> Result<EncodedPoint> {
        EncodedPoint::new(point.y(), point.x())
    }

    /// Packs two already-encoded axis values.
    pub fn from_bits(latitude_bits: i32, longitude_bits: i32) -> EncodedPoint {
        EncodedPoint(((latitude_bits as i64) << 32) | (longitude_bits as i64 & 0xFFFF_FFFF))
    }

    /// Reinterprets a packed 64-bit value, e.g. one read from doc values.
    pub fn from_packed(packed: i64) -> EncodedPoint {
        EncodedPoint(packed)
    }

    /// The packed 64-bit value.
    pub fn packed(self) -> i64 {
        self.0
    }

    /// Encoded latitude (high 32 bits).
    pub fn latitude_bits(self) -> i32 {
        (self.0 >> 32) as i32
    }

    /// Encoded longitude (low 32 bits).
    pub fn longitude_bits(self) -> i32 {
        self.0 as i32
    }

    /// Decoded latitude in degrees.
    pub fn latitude(self) -> f64 {
        decode_latitude(self.latitude_bits())
    }

    /// Decoded longitude in degrees.
    pub fn longitude(self) -> f64 {
        decode_longitude(self.longitude_bits())
    }

    /// Decoded coordinate as a [`geo::Point`] (x = longitude, y = latitude).
    pub fn to_point(self) -> Point {
        Point::new(self.longitude(), self.latitude())
    }

    /// Index byte layout: two big-endian sortable ints, latitude first.
    pub fn to_sortable_bytes(self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&int_to_sortable_bytes(self.latitude_bits()));
        bytes[4..].copy_from_slice(&int_to_sortable_bytes(self.longitude_bits()));
        bytes
    }

    /// Inverse of [`to_sortable_bytes`](EncodedPoint::to_sortable_bytes).
    pub fn from_sortable_bytes(bytes: [u8; 8]) -> EncodedPoint {
        let lat = sortable_bytes_to_int([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let lon = sortable_bytes_to_int([bytes[4], bytes[5], bytes[6], bytes[7]]);
        EncodedPoint::from_bits(lat, lon)
    }
}

impl fmt::Display for EncodedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.latitude(), self.longitude())
    }
}
