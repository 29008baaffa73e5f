//! Incremental merge for time-ordered, append-only collections.

use std::collections::HashSet;

use crate::cache::Snapshot;
use crate::model::{Identified, Timestamped};

/// Lower bound for the next incremental fetch: the maximum timestamp in the
/// snapshot, falling back to the stored mark, then to the configured start.
pub fn high_water_mark<T: Timestamped>(snapshot: &Snapshot<T>, start_timestamp: i64) -> i64 {
    max_timestamp(&snapshot.records)
        .or(snapshot.high_water_mark)
        .unwrap_or(start_timestamp)
}

pub fn max_timestamp<T: Timestamped>(records: &[T]) -> Option<i64> {
    records.iter().map(|record| record.timestamp()).max()
}

/// Append records whose ids are not already present, preserving ingestion
/// order. Returns `None` when the delta contains nothing new, so the caller
/// can leave the existing snapshot untouched.
///
/// The dedup pass is required: the incremental fetch filters on
/// `timestamp >= high_water_mark`, which re-returns records sitting exactly
/// on the boundary timestamp.
pub fn merge_new<T: Identified + Clone>(existing: &[T], incoming: Vec<T>) -> Option<Vec<T>> {
    let seen: HashSet<&str> = existing.iter().map(|record| record.record_id()).collect();

    let fresh: Vec<T> = incoming
        .into_iter()
        .filter(|record| !seen.contains(record.record_id()))
        .collect();

    if fresh.is_empty() {
        return None;
    }

    let mut merged = existing.to_vec();
    merged.extend(fresh);
    Some(merged)
}
