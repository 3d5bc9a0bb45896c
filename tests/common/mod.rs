//! Shared helpers: a top-N collection harness driving the comparator
//! protocol the way the external collection framework would, a brute-force
//! reference implementation, and a deterministic coordinate generator.

#![allow(dead_code)]

use std::cmp::Ordering;

use geopoint::{haversin_meters, DistanceSort, DocId, LeafDistanceComparator, PointValueSource};

/// Collects the top `n` documents by ascending distance using the
/// competitive-rectangle fast path. Returns `(doc, meters)` pairs ordered by
/// distance, doc id as tiebreak.
pub fn collect_top_n<S: PointValueSource>(
    sort: &DistanceSort,
    segment: &S,
    docs: &[DocId],
    n: usize,
) -> Vec<(DocId, f64)> {
    let mut comparator = sort.comparator(n);
    let mut slots: Vec<DocId> = Vec::new();
    {
        let mut leaf = comparator.leaf_comparator(segment).unwrap();
        let mut bottom_slot = 0usize;
        for &doc in docs {
            if slots.len() < n {
                let slot = slots.len();
                leaf.copy(slot, doc);
                slots.push(doc);
                if slots.len() == n {
                    bottom_slot = worst_slot(&leaf, slots.len());
                    leaf.set_bottom(bottom_slot);
                }
            } else if leaf.compare_bottom(doc) == Ordering::Greater {
                leaf.copy(bottom_slot, doc);
                slots[bottom_slot] = doc;
                bottom_slot = worst_slot(&leaf, slots.len());
                leaf.set_bottom(bottom_slot);
            }
        }
    }

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| comparator.compare(a, b).then(slots[a].cmp(&slots[b])));
    order
        .into_iter()
        .map(|slot| (slots[slot], comparator.value(slot)))
        .collect()
}

fn worst_slot<S: PointValueSource>(leaf: &LeafDistanceComparator<'_, S>, len: usize) -> usize {
    let mut worst = 0;
    for slot in 1..len {
        if leaf.compare(slot, worst) == Ordering::Greater {
            worst = slot;
        }
    }
    worst
}

/// Reference implementation: computes every document's sort key, no pruning.
pub fn brute_force_top_n<S: PointValueSource>(
    sort: &DistanceSort,
    segment: &S,
    docs: &[DocId],
    n: usize,
) -> Vec<(DocId, f64)> {
    let mut comparator = sort.comparator(1);
    let leaf = comparator.leaf_comparator(segment).unwrap();
    let mut scored: Vec<(DocId, f64)> = docs.iter().map(|&doc| (doc, leaf.sort_key(doc))).collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    scored.truncate(n);
    scored
        .into_iter()
        .map(|(doc, key)| (doc, haversin_meters(key)))
        .collect()
}

pub fn assert_same_results(pruned: &[(DocId, f64)], reference: &[(DocId, f64)]) {
    let pruned_docs: Vec<DocId> = pruned.iter().map(|r| r.0).collect();
    let reference_docs: Vec<DocId> = reference.iter().map(|r| r.0).collect();
    assert_eq!(pruned_docs, reference_docs);
    for (a, b) in pruned.iter().zip(reference) {
        assert!(
            a.1 == b.1 || (a.1 - b.1).abs() < 1e-6,
            "distance mismatch for doc {}: {} vs {}",
            a.0,
            a.1,
            b.1
        );
    }
}

/// Small deterministic PRNG so tests do not depend on an external crate.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Lcg {
        Lcg(seed)
    }

    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn latitude(&mut self) -> f64 {
        self.next_f64() * 180.0 - 90.0
    }

    pub fn longitude(&mut self) -> f64 {
        self.next_f64() * 360.0 - 180.0
    }
}
