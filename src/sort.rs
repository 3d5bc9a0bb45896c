//! Distance sorting with competitive-bound pruning.
//!
//! A [`DistanceSort`] orders documents by ascending distance from an origin
//! point. The collection framework drives one [`DistanceComparator`] per
//! logical top-N and one [`LeafDistanceComparator`] per segment, strictly
//! sequentially; instances are never shared between queries.
//!
//! Whenever the least competitive retained hit changes
//! ([`LeafDistanceComparator::set_bottom`]), the comparator recomputes a
//! rectangle circumscribing the competitive radius around the origin and
//! pre-encodes its edges. [`LeafDistanceComparator::compare_bottom`] can then
//! throw away most candidates with four integer comparisons, paying the
//! trigonometric sort-key cost only for points inside the rectangle.

use std::cmp::Ordering;

use crate::codec::{
    decode_latitude, decode_longitude, encode_latitude_unchecked, encode_longitude_unchecked,
};
use crate::error::{GeoError, Result};
use crate::geometry::{
    check_latitude, check_longitude, haversin_meters, haversin_sort_key, Rectangle,
};
use crate::values::{DocId, PointValueSource};

/// Number of `set_bottom` calls that rebuild the competitive rectangle
/// unconditionally. Tuned; changing it changes worst-case cost guarantees,
/// not correctness.
pub const EXACT_REBUILD_LIMIT: u32 = 1024;

/// Past [`EXACT_REBUILD_LIMIT`], the rectangle is only rebuilt when
/// `counter & MASK == MASK`, i.e. one call in 64. A stale rectangle is merely
/// looser, never wrong: it was derived from an older, larger bottom.
pub const REBUILD_SAMPLING_MASK: u32 = 0x3F;

/// Sort specification: orders documents by ascending distance from a fixed
/// origin, with per-hit values reported in meters.
///
/// Documents missing the field sort last; multi-valued documents sort by
/// their closest stored point.
#[derive(Debug, Clone)]
pub struct DistanceSort {
    field: String,
    latitude: f64,
    longitude: f64,
}

impl DistanceSort {
    /// Creates a distance sort over the named point field.
    ///
    /// # Errors
    ///
    /// Fails if the field name is empty or the origin is out of bounds.
    pub fn new(field: impl Into<String>, latitude: f64, longitude: f64) -> Result<DistanceSort> {
        let field = field.into();
        if field.is_empty() {
            return Err(GeoError::InvalidInput(
                "field name must not be empty".to_string(),
            ));
        }
        check_latitude(latitude)?;
        check_longitude(longitude)?;
        Ok(DistanceSort {
            field,
            latitude,
            longitude,
        })
    }

    /// The sorted point field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Origin latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Origin longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Creates a comparator for one query execution collecting up to
    /// `num_hits` results.
    pub fn comparator(&self, num_hits: usize) -> DistanceComparator {
        DistanceComparator::new(self.field.clone(), self.latitude, self.longitude, num_hits)
    }
}

/// Stateful comparator for one top-N collection pass.
///
/// Holds one sort-key slot per retained hit, the competitive `bottom`, and
/// the pre-encoded competitive rectangle. All mutation happens through the
/// per-segment [`LeafDistanceComparator`]; this type owns the state so it
/// survives across segments.
pub struct DistanceComparator {
    field: String,
    latitude: f64,
    longitude: f64,

    /// Sort key per slot; meters conversion is deferred to [`value`].
    ///
    /// [`value`]: DistanceComparator::value
    values: Box<[f64]>,
    bottom: f64,
    top_value: f64,

    // competitive rectangle for the current bottom, pre-encoded so that
    // uncompetitive hits are rejected without decoding to doubles
    min_lat: i32,
    max_lat: i32,
    min_lon: i32,
    max_lon: i32,
    // lower bound of the second longitude range (dateline crossing);
    // i32::MAX disables it
    min_lon2: i32,

    set_bottom_counter: u32,
}

impl DistanceComparator {
    fn new(field: String, latitude: f64, longitude: f64, num_hits: usize) -> DistanceComparator {
        DistanceComparator {
            field,
            latitude,
            longitude,
            values: vec![0.0; num_hits].into_boxed_slice(),
            bottom: 0.0,
            top_value: 0.0,
            min_lat: i32::MIN,
            max_lat: i32::MAX,
            min_lon: i32::MIN,
            max_lon: i32::MAX,
            min_lon2: i32::MAX,
            set_bottom_counter: 0,
        }
    }

    /// Compares the sort keys of two filled slots.
    pub fn compare(&self, slot1: usize, slot2: usize) -> Ordering {
        self.values[slot1].total_cmp(&self.values[slot2])
    }

    /// Sets the threshold for resuming a paginated sort; consumed by
    /// [`LeafDistanceComparator::compare_top`]. The value is meters, as
    /// previously surfaced by [`value`](DistanceComparator::value).
    pub fn set_top_value(&mut self, value: f64) {
        self.top_value = value;
    }

    /// The retained distance for a slot, in meters. Infinite sort keys
    /// (missing field) surface as infinite distance.
    pub fn value(&self, slot: usize) -> f64 {
        haversin_meters(self.values[slot])
    }

    /// Binds this comparator to one segment, validating the field schema
    /// when the segment has one.
    ///
    /// # Errors
    ///
    /// Fails with [`GeoError::IncompatibleField`] if the segment indexed the
    /// field with a different point layout.
    pub fn leaf_comparator<'a, S: PointValueSource>(
        &'a mut self,
        segment: &'a S,
    ) -> Result<LeafDistanceComparator<'a, S>> {
        if let Some(schema) = segment.field_schema(&self.field) {
            schema.check_compatible(&self.field)?;
        }
        Ok(LeafDistanceComparator {
            parent: self,
            segment,
        })
    }
}

/// Per-segment view of a [`DistanceComparator`].
///
/// The collection framework calls [`copy`] to fill a slot, [`set_bottom`]
/// when the least competitive retained hit changes, and [`compare_bottom`]
/// once per candidate.
///
/// [`copy`]: LeafDistanceComparator::copy
/// [`set_bottom`]: LeafDistanceComparator::set_bottom
/// [`compare_bottom`]: LeafDistanceComparator::compare_bottom
pub struct LeafDistanceComparator<'a, S> {
    parent: &'a mut DistanceComparator,
    segment: &'a S,
}

impl<'a, S: PointValueSource> LeafDistanceComparator<'a, S> {
    /// Records that `slot` now holds the least competitive retained hit and
    /// refreshes the competitive rectangle from its sort key.
    ///
    /// Rebuilding costs a trigonometric call, so after
    /// [`EXACT_REBUILD_LIMIT`] invocations only one call in 64 rebuilds: a
    /// pathological input order (e.g. hits arriving in descending distance)
    /// would otherwise rebuild on every single comparison.
    pub fn set_bottom(&mut self, slot: usize) {
        let cmp = &mut *self.parent;
        cmp.bottom = cmp.values[slot];
        if cmp.set_bottom_counter < EXACT_REBUILD_LIMIT
            || (cmp.set_bottom_counter & REBUILD_SAMPLING_MASK) == REBUILD_SAMPLING_MASK
        {
            let radius = haversin_meters(cmp.bottom);
            let rect = Rectangle::from_point_distance(cmp.latitude, cmp.longitude, radius);
            cmp.min_lat = encode_latitude_unchecked(rect.min_lat);
            cmp.max_lat = encode_latitude_unchecked(rect.max_lat);
            if rect.crosses_dateline() {
                // two ranges: [-180, max_lon] plus [min_lon2, 180]
                cmp.min_lon = i32::MIN;
                cmp.max_lon = encode_longitude_unchecked(rect.max_lon);
                cmp.min_lon2 = encode_longitude_unchecked(rect.min_lon);
            } else {
                cmp.min_lon = encode_longitude_unchecked(rect.min_lon);
                cmp.max_lon = encode_longitude_unchecked(rect.max_lon);
                // disable the second range
                cmp.min_lon2 = i32::MAX;
            }
            log::trace!(
                "competitive rectangle rebuilt at radius {radius} m (call {})",
                cmp.set_bottom_counter
            );
        }
        cmp.set_bottom_counter += 1;
    }

    /// Compares the current bottom against the document's best stored value.
    ///
    /// Returns `Greater` when the document beats the bottom (it belongs in
    /// the top-N). Stored values outside the competitive rectangle are
    /// rejected on encoded integers alone; the two-range longitude test
    /// handles dateline wrap without decoding. Evaluation stops at the first
    /// value that wins, because a further, closer value could only win again.
    pub fn compare_bottom(&self, doc: DocId) -> Ordering {
        let cmp = &*self.parent;
        let values = self.segment.point_values(&cmp.field, doc);
        if values.is_empty() {
            return cmp.bottom.total_cmp(&f64::INFINITY);
        }

        let mut result = Ordering::Less;
        for value in values {
            let latitude_bits = value.latitude_bits();
            if latitude_bits < cmp.min_lat || latitude_bits > cmp.max_lat {
                continue;
            }
            let longitude_bits = value.longitude_bits();
            if (longitude_bits < cmp.min_lon || longitude_bits > cmp.max_lon)
                && longitude_bits < cmp.min_lon2
            {
                continue;
            }

            // inside the competitive rectangle: pay for the real sort key
            let doc_latitude = decode_latitude(latitude_bits);
            let doc_longitude = decode_longitude(longitude_bits);
            let key = haversin_sort_key(cmp.latitude, cmp.longitude, doc_latitude, doc_longitude);
            result = result.max(cmp.bottom.total_cmp(&key));
            if result == Ordering::Greater {
                return result;
            }
        }
        result
    }

    /// Compares the externally supplied top value (meters) against the
    /// document's distance; used when resuming a paginated sort, so it takes
    /// the plain decode-and-compute path without the rectangle fast path.
    pub fn compare_top(&self, doc: DocId) -> Ordering {
        self.parent
            .top_value
            .total_cmp(&haversin_meters(self.sort_key(doc)))
    }

    /// Computes the document's sort key and stores it in `slot`.
    pub fn copy(&mut self, slot: usize, doc: DocId) {
        self.parent.values[slot] = self.sort_key(doc);
    }

    /// The document's sort key: minimum over all stored values, positive
    /// infinity when it has none.
    pub fn sort_key(&self, doc: DocId) -> f64 {
        let cmp = &*self.parent;
        let mut min_key = f64::INFINITY;
        for value in self.segment.point_values(&cmp.field, doc) {
            let key = haversin_sort_key(
                cmp.latitude,
                cmp.longitude,
                value.latitude(),
                value.longitude(),
            );
            min_key = min_key.min(key);
        }
        min_key
    }

    /// Delegates to [`DistanceComparator::compare`]; convenience for
    /// single-segment collection loops.
    pub fn compare(&self, slot1: usize, slot2: usize) -> Ordering {
        self.parent.compare(slot1, slot2)
    }

    /// Delegates to [`DistanceComparator::value`].
    pub fn value(&self, slot: usize) -> f64 {
        self.parent.value(slot)
    }
}
