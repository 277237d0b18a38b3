//! Outage-schedule constraint aggregation.
//!
//! Folds medium-term capacity records into one bucket per facility. Capacity
//! is a ceiling, not additive: `total_capacity` takes the maximum across
//! records. Each record's TJ/day amount lands in exactly one bucket by
//! substring priority Maintenance -> Construction -> Normal.

use std::collections::BTreeMap;

use crate::domain::{CapacityRow, ConstraintBucket};
use crate::registry::FacilityRegistry;

pub fn aggregate_constraints(
    rows: &[CapacityRow],
    registry: &FacilityRegistry,
) -> BTreeMap<String, ConstraintBucket> {
    let mut buckets: BTreeMap<String, ConstraintBucket> = BTreeMap::new();

    for row in rows {
        let facility = registry.resolve(&row.facility_name).to_string();
        let bucket = buckets
            .entry(facility.clone())
            .or_insert_with(|| ConstraintBucket::new(facility));

        bucket.total_capacity = bucket.total_capacity.max(row.capacity);

        // First match wins: a record cannot land in two buckets.
        if row.capacity_type.contains("Maintenance") {
            bucket.maintenance_tj += row.capacity;
        } else if row.capacity_type.contains("Construction") {
            bucket.construction_tj += row.capacity;
        } else {
            bucket.normal_tj += row.capacity;
        }
    }

    buckets
}
