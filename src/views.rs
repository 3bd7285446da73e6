//! Cross-spot presentation views
//!
//! Heatmap rows (best slot per spot per day-part), timeline rows (one spot,
//! one day, hard-filtered), and the ranked multi-spot overview.

use crate::scorer::SlotScorer;
use crate::types::{DayPart, ForecastSlot, SlotQuality, SpotForecast};
use serde::Serialize;
use std::cmp::Ordering;

/// Default number of entries in a multi-spot overview
pub const DEFAULT_OVERVIEW_LIMIT: usize = 5;

/// Day-part order used by heatmaps unless a caller supplies its own
pub const DEFAULT_DAY_PARTS: [DayPart; 3] = [DayPart::Morning, DayPart::Afternoon, DayPart::Evening];

/// One populated heatmap cell: the best slot for a spot in one day-part
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub day_part: DayPart,
    pub score: f64,
    pub quality: SlotQuality,
}

/// One heatmap row per spot; cells align positionally with the requested
/// day-part order, absent where the spot has no scored slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub spot_id: String,
    pub spot_name: String,
    pub cells: Vec<Option<HeatmapCell>>,
}

/// One timeline row: a surviving slot mapped for presentation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    /// Caller-supplied stable slot key
    pub key: String,
    pub label: String,
    pub day_part: DayPart,
    pub score: f64,
    pub quality: SlotQuality,
}

/// One ranked overview entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotOverviewEntry {
    pub spot_id: String,
    pub spot_name: String,
    pub score: f64,
}

/// Build the day-part heatmap for one day across many spots.
///
/// For each spot and day-part the single highest-scoring slot wins; among
/// equal maxima the earliest in input order is kept. Rows with zero populated
/// cells are dropped entirely.
pub fn build_daypart_heatmap(
    day_key: &str,
    spots: &[SpotForecast],
    day_parts: &[DayPart],
    scorer: &dyn SlotScorer,
) -> Vec<HeatmapRow> {
    spots
        .iter()
        .filter_map(|spot| {
            let cells: Vec<Option<HeatmapCell>> = day_parts
                .iter()
                .map(|&part| best_cell_for_part(spot, day_key, part, scorer))
                .collect();

            if cells.iter().all(Option::is_none) {
                None
            } else {
                Some(HeatmapRow {
                    spot_id: spot.spot_id.clone(),
                    spot_name: spot.name.clone(),
                    cells,
                })
            }
        })
        .collect()
}

fn best_cell_for_part(
    spot: &SpotForecast,
    day_key: &str,
    part: DayPart,
    scorer: &dyn SlotScorer,
) -> Option<HeatmapCell> {
    let mut best: Option<HeatmapCell> = None;
    for slot in &spot.slots {
        if slot.day_key != day_key || slot.day_part != part {
            continue;
        }
        let quality = scorer.score_slot(slot);
        // Strictly greater keeps the first of equal maxima
        if best.as_ref().map_or(true, |b| quality.score > b.score) {
            best = Some(HeatmapCell {
                day_part: part,
                score: quality.score,
                quality,
            });
        }
    }
    best
}

/// Build timeline rows for one spot and one day.
///
/// Slots failing the caller's hard-condition predicate are dropped; survivors
/// are ordered by offset and mapped with the caller's stable key function.
pub fn build_timeline_rows<P, K>(
    spot: &SpotForecast,
    day_key: &str,
    predicate: P,
    scorer: &dyn SlotScorer,
    key_fn: K,
) -> Vec<TimelineRow>
where
    P: Fn(&ForecastSlot) -> bool,
    K: Fn(&ForecastSlot) -> String,
{
    let mut slots: Vec<&ForecastSlot> = spot
        .slots
        .iter()
        .filter(|slot| slot.day_key == day_key && predicate(slot))
        .collect();
    slots.sort_by_key(|s| s.offset_hours);

    slots
        .into_iter()
        .map(|slot| {
            let quality = scorer.score_slot(slot);
            TimelineRow {
                key: key_fn(slot),
                label: slot
                    .time_label
                    .clone()
                    .unwrap_or_else(|| format!("{:02}:00", slot.hour_of_day())),
                day_part: slot.day_part,
                score: quality.score,
                quality,
            }
        })
        .collect()
}

/// Rank spots for one day by an externally supplied day scorer.
///
/// Spots with no slots for the day, or a null score, are dropped; survivors
/// sort descending by score (stable) and truncate to `limit`.
pub fn build_multi_spot_overview<F>(
    day_key: &str,
    spots: &[SpotForecast],
    day_scorer: F,
    limit: usize,
) -> Vec<SpotOverviewEntry>
where
    F: Fn(&[ForecastSlot]) -> Option<f64>,
{
    let mut entries: Vec<SpotOverviewEntry> = spots
        .iter()
        .filter_map(|spot| {
            let day_slots: Vec<ForecastSlot> = spot
                .slots
                .iter()
                .filter(|s| s.day_key == day_key)
                .cloned()
                .collect();
            if day_slots.is_empty() {
                return None;
            }
            day_scorer(&day_slots).map(|score| SpotOverviewEntry {
                spot_id: spot.spot_id.clone(),
                spot_name: spot.name.clone(),
                score,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(limit);
    entries
}
