//! Surf window building
//!
//! Filters slots by score threshold, merges temporally-adjacent qualifying
//! slots into windows, and ranks the windows by average score. A short list of
//! genuinely standout time blocks, not a padded one: the score floor is high
//! and the gap limit tight.

use crate::scorer::SlotScorer;
use crate::types::{mean_opt, ConditionTag, ForecastSlot, ScoreClass};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Display span of a single slot in hours; a window's end extends this far
/// past its last slot.
const SLOT_SPAN_HOURS: i64 = 4;

/// Tuning for window construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
    /// Slots scoring below this are discarded before grouping
    pub min_score: f64,
    /// Groups with fewer slots than this are dropped
    pub min_slots: usize,
    /// A time gap larger than this starts a new group
    pub max_gap_hours: i64,
    /// The ranked output is truncated to this many windows
    pub max_windows: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            min_score: 6.5,
            min_slots: 2,
            max_gap_hours: 4,
            max_windows: 6,
        }
    }
}

/// A contiguous run of high-scoring slots presented as one recommended block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfWindow {
    pub spot_id: String,
    pub day_key: String,
    /// First slot's offset
    pub start_hour: i64,
    /// Last slot's offset plus the display span
    pub end_hour: i64,
    pub start_label: String,
    pub end_label: String,
    pub avg_score: f64,
    pub peak_score: f64,
    pub slot_count: usize,
    /// Averaged wave height over the window's slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_wave_height_m: Option<f64>,
    /// Plain arithmetic mean of wind bearings; no wraparound correction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_wind_direction_deg: Option<f64>,
    /// Dominant condition tag over the window's slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionTag>,
    pub score_class: ScoreClass,
}

/// Build ranked surf windows from a spot's slot list.
///
/// Slots are scored, filtered by `min_score`, sorted by offset, and greedily
/// grouped: a new group starts whenever the time gap to the previous included
/// slot exceeds `max_gap_hours`. Gaps left by discarded low-scoring slots
/// count toward that time gap but do not break a window on their own. Groups
/// smaller than `min_slots` are dropped, survivors are aggregated and ranked
/// by average score (ties break by earliest start), and the list is truncated
/// to `max_windows`.
///
/// Empty input or no qualifying slots yields an empty list.
pub fn build_surf_windows(
    slots: &[ForecastSlot],
    spot_id: &str,
    scorer: &dyn SlotScorer,
    options: &WindowOptions,
) -> Vec<SurfWindow> {
    let mut qualifying: Vec<(&ForecastSlot, f64)> = slots
        .iter()
        .map(|slot| (slot, scorer.score_slot(slot).score))
        .filter(|(_, score)| *score >= options.min_score)
        .collect();
    qualifying.sort_by_key(|(slot, _)| slot.offset_hours);

    let mut groups: Vec<Vec<(&ForecastSlot, f64)>> = Vec::new();
    for (slot, score) in qualifying {
        match groups.last_mut() {
            Some(group)
                if slot.offset_hours - group.last().unwrap().0.offset_hours
                    <= options.max_gap_hours =>
            {
                group.push((slot, score));
            }
            _ => groups.push(vec![(slot, score)]),
        }
    }

    let mut windows: Vec<SurfWindow> = groups
        .into_iter()
        .filter(|group| group.len() >= options.min_slots)
        .map(|group| build_window(&group, spot_id))
        .collect();

    windows.sort_by(|a, b| {
        b.avg_score
            .partial_cmp(&a.avg_score)
            .unwrap_or(Ordering::Equal)
            .then(a.start_hour.cmp(&b.start_hour))
    });
    windows.truncate(options.max_windows);
    windows
}

/// Pick the best ranked window overlapping a day's occupied offset span.
///
/// The default stand-in for a caller-supplied window lookup: the first window
/// (in ranked order) whose `[start, end)` intersects
/// `[min_offset, max_offset + span)` of the day's slots.
pub fn best_window_for_day<'a>(
    windows: &'a [SurfWindow],
    day_slots: &[ForecastSlot],
) -> Option<&'a SurfWindow> {
    let day_start = day_slots.iter().map(|s| s.offset_hours).min()?;
    let day_end = day_slots.iter().map(|s| s.offset_hours).max()? + SLOT_SPAN_HOURS;

    windows
        .iter()
        .find(|w| w.start_hour < day_end && w.end_hour > day_start)
}

fn build_window(group: &[(&ForecastSlot, f64)], spot_id: &str) -> SurfWindow {
    let scores: Vec<f64> = group.iter().map(|(_, score)| *score).collect();
    let avg_score = scores.iter().sum::<f64>() / scores.len() as f64;
    let peak_score = scores.iter().cloned().fold(f64::MIN, f64::max);

    let start_hour = group.first().map(|(s, _)| s.offset_hours).unwrap_or(0);
    let end_hour = group.last().map(|(s, _)| s.offset_hours).unwrap_or(0) + SLOT_SPAN_HOURS;

    let wave_heights: Vec<f64> = group.iter().filter_map(|(s, _)| s.wave_height_m).collect();
    let wind_directions: Vec<f64> = group
        .iter()
        .filter_map(|(s, _)| s.wind_direction_deg)
        .collect();

    SurfWindow {
        spot_id: spot_id.to_string(),
        day_key: group
            .first()
            .map(|(s, _)| s.day_key.clone())
            .unwrap_or_default(),
        start_hour,
        end_hour,
        start_label: hour_label(start_hour),
        end_label: hour_label(end_hour),
        avg_score,
        peak_score,
        slot_count: group.len(),
        avg_wave_height_m: mean_opt(&wave_heights),
        avg_wind_direction_deg: mean_opt(&wind_directions),
        condition: dominant_condition(group),
        score_class: ScoreClass::from_score(avg_score),
    }
}

/// Pick the dominant condition by priority clean > mixed > choppy; the first
/// tag achieving the highest priority wins.
fn dominant_condition(group: &[(&ForecastSlot, f64)]) -> Option<ConditionTag> {
    let mut tags: Vec<ConditionTag> = group.iter().filter_map(|(s, _)| s.condition).collect();
    tags.sort_by_key(|tag| std::cmp::Reverse(tag.priority()));
    tags.first().copied()
}

fn hour_label(hour: i64) -> String {
    format!("{:02}:00", hour.rem_euclid(24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::SlotScorer;
    use crate::types::{RatingBucket, SlotQuality};

    fn make_slot(offset_hours: i64) -> ForecastSlot {
        ForecastSlot {
            day_key: "2025-06-01".to_string(),
            offset_hours,
            ..Default::default()
        }
    }

    /// Scorer that reads the score straight from the slot's wave height
    fn height_scorer() -> impl SlotScorer {
        |slot: &ForecastSlot| {
            let score = slot.wave_height_m.unwrap_or(0.0);
            SlotQuality {
                score,
                rating: RatingBucket::from_score(score),
                size_band: None,
                wind_comfort: None,
                surface: None,
            }
        }
    }

    fn scored_slot(offset_hours: i64, score: f64) -> ForecastSlot {
        ForecastSlot {
            wave_height_m: Some(score),
            ..make_slot(offset_hours)
        }
    }

    #[test]
    fn test_two_adjacent_slots_form_one_window() {
        let slots = vec![scored_slot(0, 8.0), scored_slot(3, 8.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());

        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.start_hour, 0);
        assert_eq!(w.end_hour, 7);
        assert_eq!(w.slot_count, 2);
        assert!((w.avg_score - 8.0).abs() < 0.001);
        assert_eq!(w.score_class, ScoreClass::High);
        assert_eq!(w.start_label, "00:00");
        assert_eq!(w.end_label, "07:00");
    }

    #[test]
    fn test_slot_below_threshold_kills_the_window() {
        let slots = vec![scored_slot(0, 8.0), scored_slot(3, 6.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert!(windows.is_empty());
    }

    #[test]
    fn test_gap_splits_groups() {
        // Offsets 0 and 6 with max gap 4: two single-slot groups, both dropped
        // by the min_slots floor.
        let slots = vec![scored_slot(0, 8.0), scored_slot(6, 8.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert!(windows.is_empty());

        let single = WindowOptions {
            min_slots: 1,
            ..Default::default()
        };
        let windows = build_surf_windows(&slots, "reef", &height_scorer(), &single);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].slot_count, 1);
    }

    #[test]
    fn test_gap_equal_to_max_stays_in_one_window() {
        // A gap of exactly max_gap_hours does not split; only a larger one does
        let slots = vec![scored_slot(0, 8.0), scored_slot(4, 8.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].slot_count, 2);

        let slots = vec![scored_slot(0, 8.0), scored_slot(5, 8.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert!(windows.is_empty());
    }

    #[test]
    fn test_discarded_slots_do_not_break_a_window() {
        // The low-scoring slot at offset 2 vanishes, but 0 -> 4 is still
        // inside the gap limit, so one window survives.
        let slots = vec![scored_slot(0, 8.0), scored_slot(2, 1.0), scored_slot(4, 7.0)];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].slot_count, 2);
        assert_eq!(windows[0].end_hour, 8);
    }

    #[test]
    fn test_windows_ranked_by_average_then_start() {
        let slots = vec![
            scored_slot(0, 7.0),
            scored_slot(2, 7.0),
            scored_slot(20, 9.0),
            scored_slot(22, 9.0),
        ];
        let windows =
            build_surf_windows(&slots, "reef", &height_scorer(), &WindowOptions::default());
        assert_eq!(windows.len(), 2);
        assert!((windows[0].avg_score - 9.0).abs() < 0.001);
        assert_eq!(windows[0].start_hour, 20);
        assert_eq!(windows[1].start_hour, 0);
    }

    #[test]
    fn test_truncated_to_max_windows() {
        let mut slots = Vec::new();
        for day in 0..5 {
            slots.push(scored_slot(day * 24, 7.0 + day as f64 * 0.2));
            slots.push(scored_slot(day * 24 + 3, 7.0 + day as f64 * 0.2));
        }
        let options = WindowOptions {
            max_windows: 3,
            ..Default::default()
        };
        let windows = build_surf_windows(&slots, "reef", &height_scorer(), &options);
        assert_eq!(windows.len(), 3);
        // Best averages first
        assert!(windows[0].avg_score >= windows[1].avg_score);
        assert!(windows[1].avg_score >= windows[2].avg_score);
    }

    #[test]
    fn test_peak_and_averages() {
        let mut first = scored_slot(0, 7.0);
        first.wind_direction_deg = Some(350.0);
        let mut second = scored_slot(3, 9.0);
        second.wind_direction_deg = Some(10.0);

        let windows = build_surf_windows(
            &[first, second],
            "reef",
            &height_scorer(),
            &WindowOptions::default(),
        );
        let w = &windows[0];
        assert!((w.avg_score - 8.0).abs() < 0.001);
        assert!((w.peak_score - 9.0).abs() < 0.001);
        assert!((w.avg_wave_height_m.unwrap() - 8.0).abs() < 0.001);
        // Plain arithmetic mean of bearings, wraparound and all
        assert!((w.avg_wind_direction_deg.unwrap() - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_dominant_condition_priority() {
        let mut first = scored_slot(0, 8.0);
        first.condition = Some(ConditionTag::Choppy);
        let mut second = scored_slot(3, 8.0);
        second.condition = Some(ConditionTag::Clean);
        let mut third = scored_slot(6, 8.0);
        third.condition = Some(ConditionTag::Clean);

        let windows = build_surf_windows(
            &[first, second, third],
            "reef",
            &height_scorer(),
            &WindowOptions::default(),
        );
        assert_eq!(windows[0].condition, Some(ConditionTag::Clean));
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let windows =
            build_surf_windows(&[], "reef", &height_scorer(), &WindowOptions::default());
        assert!(windows.is_empty());
    }

    #[test]
    fn test_best_window_for_day_overlap() {
        let day_one: Vec<ForecastSlot> = vec![scored_slot(0, 8.0), scored_slot(3, 8.0)];
        let mut day_two: Vec<ForecastSlot> = vec![scored_slot(24, 9.0), scored_slot(27, 9.0)];
        for slot in &mut day_two {
            slot.day_key = "2025-06-02".to_string();
        }

        let mut all = day_one.clone();
        all.extend(day_two.iter().cloned());
        let windows =
            build_surf_windows(&all, "reef", &height_scorer(), &WindowOptions::default());
        assert_eq!(windows.len(), 2);

        let best = best_window_for_day(&windows, &day_one).unwrap();
        assert_eq!(best.start_hour, 0);
        let best = best_window_for_day(&windows, &day_two).unwrap();
        assert_eq!(best.start_hour, 24);
        assert!(best_window_for_day(&windows, &[]).is_none());
    }
}
