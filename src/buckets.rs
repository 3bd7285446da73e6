//! Day bucketing
//!
//! This module partitions a spot's slot list into calendar days and into
//! fixed-width hour buckets covering `[0, 24)`.

use crate::types::ForecastSlot;
use serde::Serialize;
use std::collections::HashMap;

/// Default bucket width in hours
pub const DEFAULT_BUCKET_SIZE_HOURS: u32 = 3;

/// One fixed-width time partition of a day's slots
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// Inclusive start hour
    pub start_hour: u32,
    /// Exclusive end hour
    pub end_hour: u32,
    /// Zero-padded start-hour label ("00:00", "03:00", ...)
    pub label: String,
    /// Slots assigned to this bucket, in input order
    pub slots: Vec<ForecastSlot>,
}

/// A calendar day's slots, in input order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub day_key: String,
    pub slots: Vec<ForecastSlot>,
}

/// Partition slots into calendar days, in first-appearance order.
pub fn group_slots_by_day(slots: &[ForecastSlot]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for slot in slots {
        match index_by_key.get(&slot.day_key) {
            Some(&idx) => groups[idx].slots.push(slot.clone()),
            None => {
                index_by_key.insert(slot.day_key.clone(), groups.len());
                groups.push(DayGroup {
                    day_key: slot.day_key.clone(),
                    slots: vec![slot.clone()],
                });
            }
        }
    }

    groups
}

/// Partition a day's slots into fixed-width hour buckets.
///
/// Produces `ceil(24 / bucket_size_hours)` buckets covering `[0, 24)`
/// contiguously and exhaustively. Each slot lands in the bucket containing its
/// hour of day, clamped to the last bucket if the index would overshoot.
pub fn build_day_buckets(slots: &[ForecastSlot], bucket_size_hours: u32) -> Vec<DayBucket> {
    let size = bucket_size_hours.max(1);
    let count = 24_u32.div_ceil(size) as usize;

    let mut buckets: Vec<DayBucket> = (0..count)
        .map(|i| {
            let start = i as u32 * size;
            DayBucket {
                start_hour: start,
                end_hour: (start + size).min(24),
                label: format!("{start:02}:00"),
                slots: Vec::new(),
            }
        })
        .collect();

    for slot in slots {
        let index = ((slot.hour_of_day() / size) as usize).min(count - 1);
        buckets[index].slots.push(slot.clone());
    }

    buckets
}
