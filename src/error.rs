//! Error types for geopoint.

use thiserror::Error;

/// Errors raised by coordinate encoding, query construction, and sorting.
///
/// All operations in this crate are deterministic, so none of these errors is
/// retryable; they indicate bad input or a field whose on-disk layout does not
/// match the lat/lon point format.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Latitude outside the standard +/-90 bounds (or NaN).
    #[error("invalid latitude: {0}; must be within [-90.0, 90.0]")]
    InvalidLatitude(f64),

    /// Longitude outside the standard +/-180 bounds (or NaN).
    #[error("invalid longitude: {0}; must be within [-180.0, 180.0]")]
    InvalidLongitude(f64),

    /// Malformed caller input, e.g. an empty field name or an inverted
    /// latitude range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The named field was indexed with a layout other than the fixed
    /// 2-dimension, 4-bytes-per-dimension, sorted-numeric point format.
    #[error("field \"{field}\" is not a lat/lon point field: {reason}")]
    IncompatibleField {
        /// Name of the offending field.
        field: String,
        /// Which schema property disagreed, and how.
        reason: String,
    },
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoError>;
