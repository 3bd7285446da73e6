//! Day summaries and strip blocks
//!
//! Per-slot presentation blocks, the narrative day-summary selector, and the
//! day summary aggregate (narrative key + day score + rating).

use crate::scorer::SlotScorer;
use crate::trend::analyse_day_trends;
use crate::types::{
    mean, surface_quality_of, DayTrends, ForecastSlot, RatingBucket, ScoreClass, SurfaceQuality,
    TrendDirection,
};
use serde::{Deserialize, Serialize};

/// One presentation-ready block per slot, ordered by offset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripBlock {
    /// Slot offset from forecast origin
    pub hour: i64,
    /// Wall-clock label ("HH:00" fallback when the slot carries none)
    pub label: String,
    pub score: f64,
    pub score_class: ScoreClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave_height_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_kmh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction_deg: Option<f64>,
    /// Swell bearing, falling back to the wind bearing when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swell_direction_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceQuality>,
}

/// The ten mutually exclusive narrative categories a day can summarise to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DaySummaryKey {
    Flat,
    EpicAllDay,
    Deteriorating,
    Improving,
    Poor,
    BestMorning,
    BestAfternoon,
    BestEvening,
    SolidAllDay,
    SteadyDecent,
}

/// Day summary: narrative key plus day-average score and rating
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day_key: String,
    pub key: DaySummaryKey,
    pub score: f64,
    pub rating: RatingBucket,
    pub slot_count: usize,
}

/// Map each slot to a strip block, ordered by offset. No aggregation.
pub fn build_strip_blocks(slots: &[ForecastSlot], scorer: &dyn SlotScorer) -> Vec<StripBlock> {
    let mut sorted: Vec<&ForecastSlot> = slots.iter().collect();
    sorted.sort_by_key(|s| s.offset_hours);

    sorted
        .into_iter()
        .map(|slot| {
            let quality = scorer.score_slot(slot);
            StripBlock {
                hour: slot.offset_hours,
                label: slot
                    .time_label
                    .clone()
                    .unwrap_or_else(|| format!("{:02}:00", slot.hour_of_day())),
                score: quality.score,
                score_class: ScoreClass::from_score(quality.score),
                wave_height_m: slot.wave_height_m,
                wind_speed_kmh: slot.wind_speed_kmh,
                wind_direction_deg: slot.wind_direction_deg,
                swell_direction_deg: slot.swell_direction_deg.or(slot.wind_direction_deg),
                surface: surface_quality_of(slot),
            }
        })
        .collect()
}

/// Select the narrative category for a day from its strip blocks and trends.
///
/// Priority order, each check short-circuiting:
/// 1. no blocks: flat
/// 2. every block at 7+ and day average 7+: epic all day
/// 3. swell falling, wind rising, day average under 5: deteriorating
/// 4. swell rising, surface rising, day average 4+: improving
/// 5. all thirds under 2: flat; day average under 3: poor
/// 6. a strictly-best third beating its baseline by over a point: best
///    morning / evening / afternoon (morning and evening compare against the
///    middle third; the afternoon compares against the morning third -
///    preserve these exact three comparisons)
/// 7. every block at 4.5+ and day average 5.5+: solid all day
/// 8. otherwise steady decent
pub fn pick_day_summary_key(blocks: &[StripBlock], trends: &DayTrends) -> DaySummaryKey {
    if blocks.is_empty() {
        return DaySummaryKey::Flat;
    }

    let scores: Vec<f64> = blocks.iter().map(|b| b.score).collect();
    let day_avg = mean(&scores);

    if scores.iter().all(|&s| s >= 7.0) && day_avg >= 7.0 {
        return DaySummaryKey::EpicAllDay;
    }

    let third = (scores.len() / 3).max(1);
    let morning = mean(&scores[..third.min(scores.len())]);
    let mid_end = (third * 2).min(scores.len());
    let afternoon = mean(&scores[third.min(scores.len())..mid_end]);
    let evening = mean(&scores[mid_end..]);

    if trends.swell == TrendDirection::Falling
        && trends.wind == TrendDirection::Rising
        && day_avg < 5.0
    {
        return DaySummaryKey::Deteriorating;
    }
    if trends.swell == TrendDirection::Rising
        && trends.surface == TrendDirection::Rising
        && day_avg >= 4.0
    {
        return DaySummaryKey::Improving;
    }

    if morning.max(afternoon).max(evening) < 2.0 {
        return DaySummaryKey::Flat;
    }
    if day_avg < 3.0 {
        return DaySummaryKey::Poor;
    }

    if morning > afternoon && morning > evening && morning - afternoon > 1.0 {
        return DaySummaryKey::BestMorning;
    }
    if evening > morning && evening > afternoon && evening - afternoon > 1.0 {
        return DaySummaryKey::BestEvening;
    }
    if afternoon > morning && afternoon > evening && afternoon - morning > 1.0 {
        return DaySummaryKey::BestAfternoon;
    }

    if scores.iter().all(|&s| s >= 4.5) && day_avg >= 5.5 {
        return DaySummaryKey::SolidAllDay;
    }
    DaySummaryKey::SteadyDecent
}

/// Build the full day summary for one day's slots.
pub fn build_day_summary(
    day_key: &str,
    slots: &[ForecastSlot],
    scorer: &dyn SlotScorer,
) -> DaySummary {
    let blocks = build_strip_blocks(slots, scorer);
    let trends = analyse_day_trends(slots);
    let score = mean(&blocks.iter().map(|b| b.score).collect::<Vec<f64>>());

    DaySummary {
        day_key: day_key.to_string(),
        key: pick_day_summary_key(&blocks, &trends),
        score,
        rating: RatingBucket::from_score(score),
        slot_count: blocks.len(),
    }
}
