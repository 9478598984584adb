//! Pure aggregation over stored session records. Nothing here touches
//! storage or draws anything; the functions reduce the per-day record
//! map that [read_interval](crate::storage::log_store::LogStore::read_interval)
//! returns into the numbers a renderer needs.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::storage::log_store::RecordsByDate;

/// Total seconds spent per activity across every day of the input.
/// Activities that never occur are absent from the result.
pub fn total_secs_per_activity(records: &RecordsByDate) -> HashMap<usize, u64> {
    let mut totals = HashMap::new();
    for daily_records in records.values() {
        for record in daily_records {
            *totals.entry(record.activity).or_insert(0) += record.duration_secs;
        }
    }
    totals
}

/// Same totals restricted to a single day. A day present with no rows
/// and a day absent from the input both reduce to an empty map, there
/// is nothing recorded either way.
pub fn daily_totals_per_activity(
    records: &RecordsByDate,
    date: NaiveDate,
) -> HashMap<usize, u64> {
    let mut totals = HashMap::new();
    for record in records.get(&date).into_iter().flatten() {
        *totals.entry(record.activity).or_insert(0) += record.duration_secs;
    }
    totals
}

/// Resolves one day's records into absolute `(start, end)` pairs
/// anchored at `base_midnight`, grouped by activity. Within an activity
/// the pairs keep the append order of the underlying records.
pub fn intervals_per_activity(
    records: &RecordsByDate,
    date: NaiveDate,
    base_midnight: NaiveDateTime,
) -> HashMap<usize, Vec<(NaiveDateTime, NaiveDateTime)>> {
    let mut intervals: HashMap<usize, Vec<(NaiveDateTime, NaiveDateTime)>> = HashMap::new();
    for record in records.get(&date).into_iter().flatten() {
        let start = base_midnight + Duration::seconds(record.offset_secs as i64);
        let end = start + Duration::seconds(record.duration_secs as i64);
        intervals.entry(record.activity).or_default().push((start, end));
    }
    intervals
}
