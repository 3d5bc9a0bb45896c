//! Per-document stored point values.
//!
//! The index engine keeps zero or more packed [`EncodedPoint`] values per
//! document and field; distance sorting reads them through the
//! [`PointValueSource`] trait. The on-disk reader lives outside this crate;
//! [`MemoryPointValues`] is an in-memory implementation for embedding and
//! tests.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::codec::EncodedPoint;
use crate::error::{GeoError, Result};

/// Identifier of a document within one index segment.
pub type DocId = u32;

/// How per-document values for a field are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocValuesKind {
    /// No doc values recorded for the field.
    None,
    /// A single 64-bit integer per document.
    Numeric,
    /// Multi-valued sorted 64-bit integers; the kind lat/lon points use.
    SortedNumeric,
    /// Opaque per-document byte payloads.
    Binary,
}

/// On-disk schema of an indexed point field.
///
/// Queries and sorts check the schema of the field they run against so that a
/// field indexed with a different layout fails loudly instead of silently
/// matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Number of indexed point dimensions; 0 when the field has none.
    pub point_dimension_count: usize,
    /// Bytes per indexed dimension; 0 when the field has none.
    pub bytes_per_dimension: usize,
    /// Storage kind of the per-document values.
    pub doc_values: DocValuesKind,
}

impl FieldSchema {
    /// The fixed lat/lon point layout: 2 dimensions of 4 bytes each, packed
    /// into sorted-numeric doc values.
    pub const LAT_LON: FieldSchema = FieldSchema {
        point_dimension_count: 2,
        bytes_per_dimension: 4,
        doc_values: DocValuesKind::SortedNumeric,
    };

    /// Fails with [`GeoError::IncompatibleField`] if this schema disagrees
    /// with the lat/lon point layout.
    ///
    /// Zero dimensions or [`DocValuesKind::None`] mean the property was never
    /// set for the segment (e.g. only stored fields used the name) and remain
    /// compatible.
    pub fn check_compatible(&self, field: &str) -> Result<()> {
        let expected = FieldSchema::LAT_LON;
        if self.point_dimension_count != 0
            && self.point_dimension_count != expected.point_dimension_count
        {
            return Err(GeoError::IncompatibleField {
                field: field.to_string(),
                reason: format!(
                    "indexed with {} dimensions but lat/lon points have {}",
                    self.point_dimension_count, expected.point_dimension_count
                ),
            });
        }
        if self.bytes_per_dimension != 0
            && self.bytes_per_dimension != expected.bytes_per_dimension
        {
            return Err(GeoError::IncompatibleField {
                field: field.to_string(),
                reason: format!(
                    "indexed with {} bytes per dimension but lat/lon points have {}",
                    self.bytes_per_dimension, expected.bytes_per_dimension
                ),
            });
        }
        if self.doc_values != DocValuesKind::None && self.doc_values != expected.doc_values {
            return Err(GeoError::IncompatibleField {
                field: field.to_string(),
                reason: format!(
                    "indexed with {:?} doc values but lat/lon points use {:?}",
                    self.doc_values, expected.doc_values
                ),
            });
        }
        Ok(())
    }
}

/// Read access to the stored points of one index segment.
///
/// Iteration order of a document's values is unspecified and duplicates are
/// allowed; distance sorting treats the closest value as representative.
pub trait PointValueSource {
    /// Schema recorded for `field`, or `None` if the segment has no such
    /// field.
    fn field_schema(&self, field: &str) -> Option<FieldSchema>;

    /// All stored points for `doc` under `field`; empty when the document has
    /// none.
    fn point_values(&self, field: &str, doc: DocId) -> &[EncodedPoint];
}

/// In-memory [`PointValueSource`] holding one multi-valued point field.
#[derive(Debug, Clone)]
pub struct MemoryPointValues {
    field: String,
    docs: FxHashMap<DocId, Vec<EncodedPoint>>,
}

impl MemoryPointValues {
    /// Creates an empty store for the named field.
    pub fn new(field: impl Into<String>) -> MemoryPointValues {
        MemoryPointValues {
            field: field.into(),
            docs: FxHashMap::default(),
        }
    }

    /// Quantizes a coordinate pair and appends it to the document's values.
    pub fn insert(&mut self, doc: DocId, latitude: f64, longitude: f64) -> Result<()> {
        let point = EncodedPoint::new(latitude, longitude)?;
        self.insert_encoded(doc, point);
        Ok(())
    }

    /// Appends an already-encoded point to the document's values.
    pub fn insert_encoded(&mut self, doc: DocId, point: EncodedPoint) {
        self.docs.entry(doc).or_default().push(point);
    }

    /// Number of documents with at least one stored point.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }
}

impl PointValueSource for MemoryPointValues {
    fn field_schema(&self, field: &str) -> Option<FieldSchema> {
        (field == self.field).then_some(FieldSchema::LAT_LON)
    }

    fn point_values(&self, field: &str, doc: DocId) -> &[EncodedPoint] {
        if field != self.field {
            return &[];
        }
        self.docs.get(&doc).map(Vec::as_slice).unwrap_or(&[])
    }
}
