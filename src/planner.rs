//! Multi-spot ranking: discover, compare, and trip planning
//!
//! One shared per-(spot, day) step feeds three call sites that vary only in
//! filter criteria and output shape: the discover feed (best day per spot
//! across everything), the compare view (fixed spot list, one day, positional
//! columns), and the trip planner (date range, reason-tagged options).

use crate::alerts::{match_day_alert, AlertProfile};
use crate::buckets::group_slots_by_day;
use crate::scorer::SlotScorer;
use crate::summary::{build_day_summary, DaySummary};
use crate::types::{ConditionTag, ForecastSlot, RatingBucket, SizeBand, SlotQuality, SpotForecast};
use crate::windows::{best_window_for_day, build_surf_windows, SurfWindow, WindowOptions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of entries in the discover feed
pub const DEFAULT_DISCOVER_LIMIT: usize = 12;

/// Default number of trip-planner options
pub const DEFAULT_TRIP_LIMIT: usize = 20;

/// Trip-planner days averaging below this score are discarded
const TRIP_SCORE_FLOOR: f64 = 2.0;

/// One (spot, day) highlight: the shared unit the rankers operate on
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHighlight {
    pub spot_id: String,
    pub spot_name: String,
    pub day_key: String,
    pub summary: DaySummary,
    /// Quality of the day's best-scoring slot, as a condition snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SlotQuality>,
    /// The day's best surf window, when one overlaps it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_window: Option<SurfWindow>,
    pub alert_matched: bool,
}

/// One compare-view column; positional with the requested spot-id list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareColumn {
    pub spot_id: String,
    pub spot_name: String,
    pub day_key: String,
    pub score: f64,
    pub rating: RatingBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SlotQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<SurfWindow>,
}

/// The single reason tag attached to a trip option, by fixed priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripReason {
    EpicOffshore,
    CleanSwellOffshore,
    SolidScore,
    LightWind,
    BigSwell,
    GoodWindow,
    DecentCombo,
}

/// One ranked trip-planner option
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOption {
    pub spot_id: String,
    pub spot_name: String,
    pub day_key: String,
    pub score: f64,
    pub rating: RatingBucket,
    pub reason: TripReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<SurfWindow>,
}

/// Build one highlight per forecast day of a spot.
///
/// The alert flag is evaluated against the optional profile; without one it
/// stays false.
pub fn build_spot_highlights(
    spot: &SpotForecast,
    scorer: &dyn SlotScorer,
    options: &WindowOptions,
    profile: Option<&AlertProfile>,
) -> Vec<DayHighlight> {
    let windows = build_surf_windows(&spot.slots, &spot.spot_id, scorer, options);

    group_slots_by_day(&spot.slots)
        .into_iter()
        .map(|group| {
            let summary = build_day_summary(&group.day_key, &group.slots, scorer);
            let qualities: Vec<SlotQuality> =
                group.slots.iter().map(|s| scorer.score_slot(s)).collect();
            let alert_matched = profile
                .map(|p| match_day_alert(p, summary.rating, &qualities))
                .unwrap_or(false);
            let snapshot = best_quality(&qualities);

            DayHighlight {
                spot_id: spot.spot_id.clone(),
                spot_name: spot.name.clone(),
                day_key: group.day_key,
                summary,
                snapshot,
                best_window: best_window_for_day(&windows, &group.slots).cloned(),
                alert_matched,
            }
        })
        .collect()
}

/// Rank (spot, day) highlights across all spots: alert-matched days first,
/// then descending score; deduplicated to the single best day per spot and
/// truncated to `limit`.
pub fn build_discover_feed<L>(
    spots: &[SpotForecast],
    scorer: &dyn SlotScorer,
    options: &WindowOptions,
    alert_lookup: L,
    limit: usize,
) -> Vec<DayHighlight>
where
    L: Fn(&str) -> Option<AlertProfile>,
{
    let mut highlights: Vec<DayHighlight> = Vec::new();
    for spot in spots {
        let profile = alert_lookup(&spot.spot_id);
        highlights.extend(build_spot_highlights(spot, scorer, options, profile.as_ref()));
    }

    // Stable: ties keep (spot, day) enumeration order
    highlights.sort_by(|a, b| {
        b.alert_matched.cmp(&a.alert_matched).then(
            b.summary
                .score
                .partial_cmp(&a.summary.score)
                .unwrap_or(Ordering::Equal),
        )
    });

    let mut seen: Vec<String> = Vec::new();
    let mut feed: Vec<DayHighlight> = Vec::new();
    for highlight in highlights {
        if seen.contains(&highlight.spot_id) {
            continue;
        }
        seen.push(highlight.spot_id.clone());
        feed.push(highlight);
        if feed.len() == limit {
            break;
        }
    }
    feed
}

/// Build one column per requested spot id for a fixed day, in input order.
///
/// Missing spots or empty days yield a zeroed placeholder column rather than
/// an omission, preserving positional alignment for the caller.
pub fn build_compare_columns(
    spot_ids: &[String],
    spots: &[SpotForecast],
    day_key: &str,
    scorer: &dyn SlotScorer,
    options: &WindowOptions,
) -> Vec<CompareColumn> {
    spot_ids
        .iter()
        .map(|spot_id| {
            let spot = spots.iter().find(|s| &s.spot_id == spot_id);
            let day_slots: Vec<ForecastSlot> = spot
                .map(|s| {
                    s.slots
                        .iter()
                        .filter(|slot| slot.day_key == day_key)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            if day_slots.is_empty() {
                return CompareColumn {
                    spot_id: spot_id.clone(),
                    spot_name: spot.map(|s| s.name.clone()).unwrap_or_else(|| spot_id.clone()),
                    day_key: day_key.to_string(),
                    score: 0.0,
                    rating: RatingBucket::Poor,
                    snapshot: None,
                    window: None,
                };
            }

            let spot = spot.expect("non-empty day slots imply a matching spot");
            let summary = build_day_summary(day_key, &day_slots, scorer);
            let qualities: Vec<SlotQuality> =
                day_slots.iter().map(|s| scorer.score_slot(s)).collect();
            let windows = build_surf_windows(&spot.slots, &spot.spot_id, scorer, options);

            CompareColumn {
                spot_id: spot.spot_id.clone(),
                spot_name: spot.name.clone(),
                day_key: day_key.to_string(),
                score: summary.score,
                rating: summary.rating,
                snapshot: best_quality(&qualities),
                window: best_window_for_day(&windows, &day_slots).cloned(),
            }
        })
        .collect()
}

/// Enumerate (spot, day) options inside an inclusive date range, tag each with
/// a single reason, and rank by score descending then date ascending.
///
/// An unparseable range endpoint yields an empty plan; unparseable day keys
/// are skipped. Days averaging below 2 are discarded. An empty `spot_filter`
/// means all spots.
pub fn build_trip_plan(
    spots: &[SpotForecast],
    start_day: &str,
    end_day: &str,
    spot_filter: &[String],
    scorer: &dyn SlotScorer,
    options: &WindowOptions,
    limit: usize,
) -> Vec<TripOption> {
    let (Ok(start), Ok(end)) = (parse_day_key(start_day), parse_day_key(end_day)) else {
        return Vec::new();
    };

    let mut trip_options: Vec<TripOption> = Vec::new();

    for spot in spots {
        if !spot_filter.is_empty() && !spot_filter.contains(&spot.spot_id) {
            continue;
        }
        let windows = build_surf_windows(&spot.slots, &spot.spot_id, scorer, options);

        for group in group_slots_by_day(&spot.slots) {
            let Ok(date) = parse_day_key(&group.day_key) else {
                continue;
            };
            if date < start || date > end {
                continue;
            }

            let summary = build_day_summary(&group.day_key, &group.slots, scorer);
            if summary.score < TRIP_SCORE_FLOOR {
                continue;
            }

            let best = best_slot(&group.slots, scorer);
            let window = best_window_for_day(&windows, &group.slots).cloned();
            let reason = pick_trip_reason(
                summary.rating,
                best.as_ref(),
                window.is_some(),
            );

            trip_options.push(TripOption {
                spot_id: spot.spot_id.clone(),
                spot_name: spot.name.clone(),
                day_key: group.day_key,
                score: summary.score,
                rating: summary.rating,
                reason,
                window,
            });
        }
    }

    trip_options.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.day_key.cmp(&b.day_key))
    });
    trip_options.truncate(limit);
    trip_options
}

/// First matching reason wins:
/// epic rating + favorable wind, then clean swell + favorable wind, then a
/// solid rating alone, then favorable wind alone, then overhead-plus size,
/// then the existence of a good window, then the default.
fn pick_trip_reason(
    rating: RatingBucket,
    best: Option<&(ForecastSlot, SlotQuality)>,
    has_window: bool,
) -> TripReason {
    let favorable = best
        .and_then(|(_, q)| q.wind_comfort)
        .map(|c| c.is_favorable())
        .unwrap_or(false);
    let clean = best
        .map(|(slot, _)| slot.condition == Some(ConditionTag::Clean))
        .unwrap_or(false);
    let big = best
        .and_then(|(_, q)| q.size_band)
        .map(|band| matches!(band, SizeBand::Overhead | SizeBand::DoubleOverhead))
        .unwrap_or(false);

    if rating.index() >= 6 && favorable {
        TripReason::EpicOffshore
    } else if rating.index() >= 5 && clean && favorable {
        TripReason::CleanSwellOffshore
    } else if rating.index() >= 5 {
        TripReason::SolidScore
    } else if favorable {
        TripReason::LightWind
    } else if big {
        TripReason::BigSwell
    } else if has_window {
        TripReason::GoodWindow
    } else {
        TripReason::DecentCombo
    }
}

fn parse_day_key(day_key: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(day_key, "%Y-%m-%d")
}

/// The day's best-scoring slot with its quality; first of equal maxima
fn best_slot(
    slots: &[ForecastSlot],
    scorer: &dyn SlotScorer,
) -> Option<(ForecastSlot, SlotQuality)> {
    let mut best: Option<(ForecastSlot, SlotQuality)> = None;
    for slot in slots {
        let quality = scorer.score_slot(slot);
        if best.as_ref().map_or(true, |(_, b)| quality.score > b.score) {
            best = Some((slot.clone(), quality));
        }
    }
    best
}

fn best_quality(qualities: &[SlotQuality]) -> Option<SlotQuality> {
    let mut best: Option<&SlotQuality> = None;
    for quality in qualities {
        if best.map_or(true, |b| quality.score > b.score) {
            best = Some(quality);
        }
    }
    best.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WindComfort;
    use pretty_assertions::assert_eq;

    /// Scorer for tests: score from wave height, size band from swell height,
    /// offshore wind below 45 degrees.
    fn test_scorer() -> impl SlotScorer {
        |slot: &ForecastSlot| {
            let score = slot.wave_height_m.unwrap_or(0.0);
            SlotQuality {
                score,
                rating: RatingBucket::from_score(score),
                size_band: slot.swell_height_m.map(SizeBand::from_wave_height),
                wind_comfort: slot.wind_direction_deg.map(|d| {
                    if d < 45.0 {
                        WindComfort::Offshore
                    } else {
                        WindComfort::Onshore
                    }
                }),
                surface: None,
            }
        }
    }

    fn make_slot(day: &str, offset: i64, wave: f64) -> ForecastSlot {
        ForecastSlot {
            day_key: day.to_string(),
            offset_hours: offset,
            wave_height_m: Some(wave),
            ..Default::default()
        }
    }

    fn make_spot(spot_id: &str, slots: Vec<ForecastSlot>) -> SpotForecast {
        SpotForecast {
            spot_id: spot_id.to_string(),
            name: spot_id.to_string(),
            slots,
        }
    }

    fn day_of(spot_id: &str, day: &str, scores: &[f64]) -> SpotForecast {
        let slots = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| make_slot(day, i as i64 * 3, s))
            .collect();
        make_spot(spot_id, slots)
    }

    #[test]
    fn test_spot_highlights_one_per_day() {
        let mut slots = vec![
            make_slot("2025-06-01", 0, 8.0),
            make_slot("2025-06-01", 3, 8.0),
            make_slot("2025-06-02", 24, 3.0),
        ];
        slots[2].wave_height_m = Some(3.0);
        let spot = make_spot("reef", slots);

        let highlights =
            build_spot_highlights(&spot, &test_scorer(), &WindowOptions::default(), None);
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].day_key, "2025-06-01");
        assert!((highlights[0].summary.score - 8.0).abs() < 0.001);
        assert!(highlights[0].best_window.is_some());
        assert!(highlights[1].best_window.is_none());
        assert!(!highlights[0].alert_matched);
    }

    #[test]
    fn test_discover_alert_matched_days_rank_first() {
        let spots = vec![
            day_of("big", "2025-06-01", &[9.0, 9.0]),
            day_of("matched", "2025-06-01", &[7.0, 7.0]),
            day_of("mid", "2025-06-01", &[8.0, 8.0]),
        ];
        let lookup = |spot_id: &str| {
            (spot_id == "matched").then(|| AlertProfile {
                spot_id: spot_id.to_string(),
                min_rating_bucket: RatingBucket::Good,
                min_size_band: None,
                max_size_band: None,
                prefer_offshore: false,
            })
        };

        let feed = build_discover_feed(
            &spots,
            &test_scorer(),
            &WindowOptions::default(),
            lookup,
            DEFAULT_DISCOVER_LIMIT,
        );
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].spot_id, "matched");
        assert!(feed[0].alert_matched);
        assert_eq!(feed[1].spot_id, "big");
        assert_eq!(feed[2].spot_id, "mid");
    }

    #[test]
    fn test_discover_dedupes_to_best_day_per_spot() {
        let mut spot = day_of("reef", "2025-06-01", &[5.0, 5.0]);
        spot.slots.extend(vec![
            make_slot("2025-06-02", 24, 9.0),
            make_slot("2025-06-02", 27, 9.0),
        ]);

        let feed = build_discover_feed(
            &[spot],
            &test_scorer(),
            &WindowOptions::default(),
            |_| None,
            DEFAULT_DISCOVER_LIMIT,
        );
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].day_key, "2025-06-02");
    }

    #[test]
    fn test_discover_respects_limit() {
        let spots: Vec<SpotForecast> = (0..5)
            .map(|i| day_of(&format!("spot-{i}"), "2025-06-01", &[5.0 + i as f64 * 0.5]))
            .collect();
        let feed = build_discover_feed(
            &spots,
            &test_scorer(),
            &WindowOptions::default(),
            |_| None,
            3,
        );
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].spot_id, "spot-4");
    }

    #[test]
    fn test_compare_synthesizes_placeholder_columns() {
        let spots = vec![day_of("reef", "2025-06-01", &[6.0, 7.0])];
        let ids = vec![
            "reef".to_string(),
            "unknown".to_string(),
        ];
        let columns = build_compare_columns(
            &ids,
            &spots,
            "2025-06-01",
            &test_scorer(),
            &WindowOptions::default(),
        );

        assert_eq!(columns.len(), 2);
        assert!((columns[0].score - 6.5).abs() < 0.001);
        assert!(columns[0].snapshot.is_some());

        // Placeholder keeps the position, zeroed
        assert_eq!(columns[1].spot_id, "unknown");
        assert_eq!(columns[1].score, 0.0);
        assert_eq!(columns[1].rating, RatingBucket::Poor);
        assert!(columns[1].snapshot.is_none());
        assert!(columns[1].window.is_none());
    }

    #[test]
    fn test_trip_reason_cascade() {
        let epic = (
            ForecastSlot {
                wind_direction_deg: Some(0.0),
                ..Default::default()
            },
            SlotQuality {
                score: 9.0,
                rating: RatingBucket::Epic,
                size_band: None,
                wind_comfort: Some(WindComfort::Offshore),
                surface: None,
            },
        );
        assert_eq!(
            pick_trip_reason(RatingBucket::Epic, Some(&epic), true),
            TripReason::EpicOffshore
        );

        let clean_offshore = (
            ForecastSlot {
                condition: Some(ConditionTag::Clean),
                ..Default::default()
            },
            SlotQuality {
                score: 7.5,
                rating: RatingBucket::VeryGood,
                size_band: None,
                wind_comfort: Some(WindComfort::CrossOff),
                surface: None,
            },
        );
        assert_eq!(
            pick_trip_reason(RatingBucket::VeryGood, Some(&clean_offshore), false),
            TripReason::CleanSwellOffshore
        );
        // Without favorable wind the same rating falls through to solid score
        let mut solid = clean_offshore.clone();
        solid.1.wind_comfort = Some(WindComfort::Onshore);
        assert_eq!(
            pick_trip_reason(RatingBucket::VeryGood, Some(&solid), false),
            TripReason::SolidScore
        );

        let light = (
            ForecastSlot::default(),
            SlotQuality {
                score: 4.0,
                rating: RatingBucket::Fair,
                size_band: None,
                wind_comfort: Some(WindComfort::Offshore),
                surface: None,
            },
        );
        assert_eq!(
            pick_trip_reason(RatingBucket::Fair, Some(&light), false),
            TripReason::LightWind
        );

        let big = (
            ForecastSlot::default(),
            SlotQuality {
                score: 3.0,
                rating: RatingBucket::Fair,
                size_band: Some(SizeBand::Overhead),
                wind_comfort: None,
                surface: None,
            },
        );
        assert_eq!(
            pick_trip_reason(RatingBucket::Fair, Some(&big), false),
            TripReason::BigSwell
        );

        assert_eq!(
            pick_trip_reason(RatingBucket::Fair, None, true),
            TripReason::GoodWindow
        );
        assert_eq!(
            pick_trip_reason(RatingBucket::Fair, None, false),
            TripReason::DecentCombo
        );
    }

    #[test]
    fn test_trip_plan_range_floor_and_order() {
        let mut reef = day_of("reef", "2025-06-01", &[7.0, 7.0]);
        reef.slots.extend(vec![
            make_slot("2025-06-02", 24, 1.5), // below the score floor
            make_slot("2025-06-03", 48, 4.0),
            make_slot("2025-06-10", 216, 9.0), // outside the range
        ]);
        let point = day_of("point", "2025-06-03", &[5.0, 5.0]);

        let plan = build_trip_plan(
            &[reef, point],
            "2025-06-01",
            "2025-06-05",
            &[],
            &test_scorer(),
            &WindowOptions::default(),
            DEFAULT_TRIP_LIMIT,
        );

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].spot_id, "reef");
        assert_eq!(plan[0].day_key, "2025-06-01");
        assert_eq!(plan[1].spot_id, "point");
        assert_eq!(plan[2].day_key, "2025-06-03");
        assert_eq!(plan[2].spot_id, "reef");
    }

    #[test]
    fn test_trip_plan_spot_filter_and_bad_range() {
        let spots = vec![
            day_of("reef", "2025-06-01", &[7.0, 7.0]),
            day_of("point", "2025-06-01", &[8.0, 8.0]),
        ];

        let plan = build_trip_plan(
            &spots,
            "2025-06-01",
            "2025-06-02",
            &["reef".to_string()],
            &test_scorer(),
            &WindowOptions::default(),
            DEFAULT_TRIP_LIMIT,
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].spot_id, "reef");

        let empty = build_trip_plan(
            &spots,
            "not-a-date",
            "2025-06-02",
            &[],
            &test_scorer(),
            &WindowOptions::default(),
            DEFAULT_TRIP_LIMIT,
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_trip_plan_tags_good_window() {
        // Two qualifying slots form a window, but the day rating stays under
        // the solid-score threshold.
        let spot = day_of("reef", "2025-06-01", &[6.6, 6.6]);
        let plan = build_trip_plan(
            &[spot],
            "2025-06-01",
            "2025-06-01",
            &[],
            &test_scorer(),
            &WindowOptions::default(),
            DEFAULT_TRIP_LIMIT,
        );
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].reason, TripReason::GoodWindow);
        assert!(plan[0].window.is_some());
    }
}
