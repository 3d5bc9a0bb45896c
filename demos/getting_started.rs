use std::cmp::Ordering;

use geopoint::{BoxQuery, DistanceSort, GeoError, MemoryPointValues, PointValueSource};

fn main() -> Result<(), GeoError> {
    env_logger::init();

    let mut store = MemoryPointValues::new("location");
    store.insert(0, 40.7128, -74.0060)?; // New York
    store.insert(1, 34.0522, -118.2437)?; // Los Angeles
    store.insert(2, 41.8781, -87.6298)?; // Chicago
    store.insert(3, 29.7604, -95.3698)?; // Houston
    store.insert(4, 39.9526, -75.1652)?; // Philadelphia

    // Everything in a box around the northeast corridor.
    let query = BoxQuery::new("location", 38.0, 43.0, -80.0, -70.0)?;
    let candidates: Vec<u32> = (0..5)
        .filter(|&doc| {
            store
                .point_values("location", doc)
                .iter()
                .any(|&point| query.matches(point))
        })
        .collect();
    println!("in box: {candidates:?}");

    // Nearest three to Newark airport.
    let sort = DistanceSort::new("location", 40.6895, -74.1745)?;
    let mut comparator = sort.comparator(3);
    let mut slots: Vec<u32> = Vec::new();
    {
        let mut leaf = comparator.leaf_comparator(&store)?;
        let mut bottom = 0usize;
        for doc in 0..5u32 {
            if slots.len() < 3 {
                leaf.copy(slots.len(), doc);
                slots.push(doc);
                if slots.len() == 3 {
                    bottom = (0..3).max_by(|&a, &b| leaf.compare(a, b)).unwrap_or(0);
                    leaf.set_bottom(bottom);
                }
            } else if leaf.compare_bottom(doc) == Ordering::Greater {
                leaf.copy(bottom, doc);
                slots[bottom] = doc;
                bottom = (0..3).max_by(|&a, &b| leaf.compare(a, b)).unwrap_or(0);
                leaf.set_bottom(bottom);
            }
        }
    }

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| comparator.compare(a, b));
    for slot in order {
        println!(
            "doc {} at {:.1} km",
            slots[slot],
            comparator.value(slot) / 1000.0
        );
    }
    Ok(())
}
