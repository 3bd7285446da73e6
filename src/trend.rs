//! Day trend analysis
//!
//! Compares first-half vs second-half averages of swell height, wind speed,
//! and derived surface quality to produce a three-way directional verdict for
//! each metric.

use crate::types::{surface_quality_of, DayTrends, ForecastSlot, TrendDirection};

/// Relative change beyond which a series counts as rising or falling
const TREND_THRESHOLD: f64 = 0.12;

/// Denominator floor; avoids divide-by-near-zero blowing up the percentage
const MEAN_FLOOR: f64 = 0.1;

/// Classify a numeric series by comparing the means of its two halves.
///
/// Fewer than two values is `steady`. The series splits at `floor(n / 2)`;
/// the relative change `(second - first) / max(first, 0.1)` classifies as
/// rising above 0.12, falling below -0.12, steady otherwise.
pub fn half_trend(values: &[f64]) -> TrendDirection {
    if values.len() < 2 {
        return TrendDirection::Steady;
    }

    let mid = values.len() / 2;
    let first = values[..mid].iter().sum::<f64>() / mid as f64;
    let second = values[mid..].iter().sum::<f64>() / (values.len() - mid) as f64;
    let change = (second - first) / first.max(MEAN_FLOOR);

    if change > TREND_THRESHOLD {
        TrendDirection::Rising
    } else if change < -TREND_THRESHOLD {
        TrendDirection::Falling
    } else {
        TrendDirection::Steady
    }
}

/// Analyse a day's slots into swell, wind, and surface trends.
///
/// Slots are ordered by `offset_hours` first; nulls are discarded per series.
/// A rising surface trend means the water is getting cleaner.
pub fn analyse_day_trends(day_slots: &[ForecastSlot]) -> DayTrends {
    let mut slots: Vec<&ForecastSlot> = day_slots.iter().collect();
    slots.sort_by_key(|s| s.offset_hours);

    let swell: Vec<f64> = slots
        .iter()
        .filter_map(|s| s.swell_height_m.or(s.wave_height_m))
        .collect();
    let wind: Vec<f64> = slots.iter().filter_map(|s| s.wind_speed_kmh).collect();
    let surface: Vec<f64> = slots
        .iter()
        .filter_map(|s| surface_quality_of(s).map(|q| q.rank()))
        .collect();

    DayTrends {
        swell: half_trend(&swell),
        wind: half_trend(&wind),
        surface: half_trend(&surface),
    }
}
