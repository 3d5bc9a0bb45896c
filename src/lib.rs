//! Sortable geo-point encoding, bounding-box queries, and distance sorting
//! for search indexes.
//!
//! Latitude/longitude pairs are quantized into an order-preserving 32-bit
//! encoding per axis (lossy, up to ~1e-7 degrees) and packed into 64-bit
//! [`EncodedPoint`] values. On top of the encoding sit [`BoxQuery`], which
//! emits byte-range predicates for an external point index (splitting boxes
//! that cross the antimeridian), and [`DistanceSort`], whose comparator
//! orders top-N results by distance while rejecting most candidates with a
//! pre-encoded competitive rectangle instead of trigonometry.
//!
//! ```rust
//! use geopoint::{BoxQuery, DistanceSort, EncodedPoint, MemoryPointValues};
//!
//! let mut store = MemoryPointValues::new("location");
//! store.insert(0, 40.7128, -74.0060)?; // doc 0: NYC
//! store.insert(1, 34.0522, -118.2437)?; // doc 1: LA
//!
//! // Bounding-box predicate for the external point index.
//! let query = BoxQuery::new("location", 40.0, 41.0, -75.0, -73.0)?;
//! assert!(query.matches(EncodedPoint::new(40.7128, -74.0060)?));
//!
//! // Distance sort, driven by the collection framework.
//! let sort = DistanceSort::new("location", 40.7128, -74.0060)?;
//! let mut comparator = sort.comparator(10);
//! let mut leaf = comparator.leaf_comparator(&store)?;
//! leaf.copy(0, 0);
//! leaf.copy(1, 1);
//! assert!(leaf.value(0) < leaf.value(1));
//! # Ok::<(), geopoint::GeoError>(())
//! ```

pub mod codec;
pub mod error;
pub mod geometry;
pub mod query;
pub mod sort;
pub mod values;

pub use codec::{
    decode_latitude, decode_longitude, encode_latitude, encode_latitude_ceil, encode_longitude,
    encode_longitude_ceil, int_to_sortable_bytes, sortable_bytes_to_int, EncodedPoint,
    LATITUDE_STEP, LONGITUDE_STEP,
};
pub use error::{GeoError, Result};
pub use geometry::{
    check_latitude, check_longitude, haversin_meters, haversin_sort_key, Rectangle,
    EARTH_MEAN_RADIUS_METERS,
};
pub use query::{BoxQuery, PointRange, BYTES_PER_DIMENSION, POINT_DIMENSIONS};
pub use sort::{
    DistanceComparator, DistanceSort, LeafDistanceComparator, EXACT_REBUILD_LIMIT,
    REBUILD_SAMPLING_MASK,
};
pub use values::{DocId, DocValuesKind, FieldSchema, MemoryPointValues, PointValueSource};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
