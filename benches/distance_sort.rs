use std::cmp::Ordering;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geopoint::{
    haversin_meters, BoxQuery, DistanceSort, DocId, EncodedPoint, MemoryPointValues,
    PointValueSource,
};

struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn build_store(count: u32) -> MemoryPointValues {
    let mut rng = Lcg(0x5EED_CAFE);
    let mut store = MemoryPointValues::new("location");
    for doc in 0..count {
        let lat = rng.next_f64() * 180.0 - 90.0;
        let lon = rng.next_f64() * 360.0 - 180.0;
        store.insert(doc, lat, lon).unwrap();
    }
    store
}

/// Top-N collection using the competitive-rectangle fast path.
fn collect_pruned(sort: &DistanceSort, store: &MemoryPointValues, count: u32, n: usize) -> f64 {
    let mut comparator = sort.comparator(n);
    let mut filled = 0usize;
    let mut bottom_slot = 0usize;
    {
        let mut leaf = comparator.leaf_comparator(store).unwrap();
        for doc in 0..count {
            if filled < n {
                leaf.copy(filled, doc);
                filled += 1;
                if filled == n {
                    bottom_slot = worst_slot(&leaf, filled);
                    leaf.set_bottom(bottom_slot);
                }
            } else if leaf.compare_bottom(doc) == Ordering::Greater {
                leaf.copy(bottom_slot, doc);
                bottom_slot = worst_slot(&leaf, filled);
                leaf.set_bottom(bottom_slot);
            }
        }
    }
    comparator.value(bottom_slot)
}

fn worst_slot<S: PointValueSource>(
    leaf: &geopoint::LeafDistanceComparator<'_, S>,
    len: usize,
) -> usize {
    let mut worst = 0;
    for slot in 1..len {
        if leaf.compare(slot, worst) == Ordering::Greater {
            worst = slot;
        }
    }
    worst
}

/// Reference: full sort-key computation for every document.
fn collect_brute(sort: &DistanceSort, store: &MemoryPointValues, count: u32, n: usize) -> f64 {
    let mut comparator = sort.comparator(1);
    let leaf = comparator.leaf_comparator(store).unwrap();
    let mut keys: Vec<(f64, DocId)> = (0..count).map(|doc| (leaf.sort_key(doc), doc)).collect();
    keys.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    haversin_meters(keys[n - 1].0)
}

fn bench_top_n(c: &mut Criterion) {
    let count = 10_000u32;
    let store = build_store(count);
    let sort = DistanceSort::new("location", 40.7128, -74.0060).unwrap();

    let mut group = c.benchmark_group("distance_top_n");
    for &n in &[10usize, 100] {
        group.bench_with_input(BenchmarkId::new("pruned", n), &n, |b, &n| {
            b.iter(|| collect_pruned(black_box(&sort), &store, count, n))
        });
        group.bench_with_input(BenchmarkId::new("brute_force", n), &n, |b, &n| {
            b.iter(|| collect_brute(black_box(&sort), &store, count, n))
        });
    }
    group.finish();
}

fn bench_box_query(c: &mut Criterion) {
    let count = 10_000u32;
    let store = build_store(count);
    let query = BoxQuery::new("location", 30.0, 50.0, -90.0, -60.0).unwrap();

    c.bench_function("box_query_scan_10k", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for doc in 0..count {
                for &point in store.point_values("location", doc) {
                    if query.matches(point) {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_point", |b| {
        b.iter(|| EncodedPoint::new(black_box(40.7128), black_box(-74.0060)).unwrap())
    });
}

criterion_group!(benches, bench_top_n, bench_box_query, bench_encode);
criterion_main!(benches);
