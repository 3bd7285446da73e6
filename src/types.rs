//! Core types for the surfcast analytics pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: forecast slots, derived slot qualities, day trends, and the ordered
//! enumerations used for threshold comparisons.

use serde::{Deserialize, Serialize};

/// Coarse period-of-day tag, precomputed by the forecast adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
        }
    }
}

/// Tide suitability tag supplied with a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideSuitability {
    Good,
    Fair,
}

/// Surface condition tag supplied with a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTag {
    Clean,
    Mixed,
    Choppy,
}

impl ConditionTag {
    /// Display priority when picking a dominant tag for a window
    pub fn priority(&self) -> u8 {
        match self {
            ConditionTag::Clean => 3,
            ConditionTag::Mixed => 2,
            ConditionTag::Choppy => 1,
        }
    }
}

/// Wind comfort relative to the spot's seaward facing, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindComfort {
    Offshore,
    CrossOff,
    Cross,
    CrossOn,
    Onshore,
}

impl WindComfort {
    /// Offshore and cross-off are the two comfort values treated as favorable
    /// by the trip planner and the alert matcher.
    pub fn is_favorable(&self) -> bool {
        matches!(self, WindComfort::Offshore | WindComfort::CrossOff)
    }
}

/// Surface quality derived from wind speed or the condition tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceQuality {
    Glassy,
    Clean,
    Bumpy,
    Messy,
}

impl SurfaceQuality {
    /// Numeric rank used by the trend analyzer (higher = cleaner)
    pub fn rank(&self) -> f64 {
        match self {
            SurfaceQuality::Glassy => 4.0,
            SurfaceQuality::Clean => 3.0,
            SurfaceQuality::Bumpy => 2.0,
            SurfaceQuality::Messy => 1.0,
        }
    }
}

/// Seven ordered quality tiers, worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RatingBucket {
    Poor,
    PoorToFair,
    Fair,
    FairToGood,
    Good,
    VeryGood,
    Epic,
}

impl RatingBucket {
    /// Index in the worst-to-best order (0-6), used for threshold comparisons
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coerce a wire label to a valid bucket, defaulting to the worst value.
    ///
    /// Shared by every consumer so invalid labels degrade identically everywhere.
    pub fn from_label(label: &str) -> Self {
        match label {
            "poorToFair" => RatingBucket::PoorToFair,
            "fair" => RatingBucket::Fair,
            "fairToGood" => RatingBucket::FairToGood,
            "good" => RatingBucket::Good,
            "veryGood" => RatingBucket::VeryGood,
            "epic" => RatingBucket::Epic,
            _ => RatingBucket::Poor,
        }
    }

    /// Map a 0-10 quality score to a rating tier
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            RatingBucket::Epic
        } else if score >= 7.0 {
            RatingBucket::VeryGood
        } else if score >= 6.0 {
            RatingBucket::Good
        } else if score >= 5.0 {
            RatingBucket::FairToGood
        } else if score >= 3.5 {
            RatingBucket::Fair
        } else if score >= 2.0 {
            RatingBucket::PoorToFair
        } else {
            RatingBucket::Poor
        }
    }
}

/// Eight ordered wave-height tiers, smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeBand {
    Tiny,
    Knee,
    Waist,
    Chest,
    Shoulder,
    Head,
    Overhead,
    DoubleOverhead,
}

impl SizeBand {
    /// Index in the smallest-to-largest order (0-7)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coerce a wire label to a valid band, defaulting to the smallest value
    pub fn from_label(label: &str) -> Self {
        match label {
            "knee" => SizeBand::Knee,
            "waist" => SizeBand::Waist,
            "chest" => SizeBand::Chest,
            "shoulder" => SizeBand::Shoulder,
            "head" => SizeBand::Head,
            "overhead" => SizeBand::Overhead,
            "doubleOverhead" => SizeBand::DoubleOverhead,
            _ => SizeBand::Tiny,
        }
    }

    /// Classify a wave height in meters into a band
    pub fn from_wave_height(height_m: f64) -> Self {
        if height_m < 0.3 {
            SizeBand::Tiny
        } else if height_m < 0.6 {
            SizeBand::Knee
        } else if height_m < 0.9 {
            SizeBand::Waist
        } else if height_m < 1.2 {
            SizeBand::Chest
        } else if height_m < 1.5 {
            SizeBand::Shoulder
        } else if height_m < 1.8 {
            SizeBand::Head
        } else if height_m < 2.5 {
            SizeBand::Overhead
        } else {
            SizeBand::DoubleOverhead
        }
    }
}

/// Presentation class for a score or score average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreClass {
    High,
    Medium,
    Low,
}

impl ScoreClass {
    /// High at 7 and above, medium at 4.5 and above, low otherwise
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            ScoreClass::High
        } else if score >= 4.5 {
            ScoreClass::Medium
        } else {
            ScoreClass::Low
        }
    }
}

/// Three-way verdict for a metric's half-day-over-half-day change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Steady,
}

/// One hourly (or sub-daily) forecast observation for one spot.
///
/// Immutable once produced by the forecast adapter; the pipeline consumes it
/// read-only. Any numeric field may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSlot {
    /// Calendar-day identifier (YYYY-MM-DD)
    pub day_key: String,
    /// Hour offset from forecast origin; may exceed 24 to span multiple days
    pub offset_hours: i64,
    /// Wall-clock "HH:MM" label when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_label: Option<String>,
    /// Period-of-day tag, precomputed by the adapter
    pub day_part: DayPart,
    /// Significant wave height (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_height_m: Option<f64>,
    /// Wave period (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_period_s: Option<f64>,
    /// Wind speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_kmh: Option<f64>,
    /// Wind source bearing (degrees, 0-360)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_deg: Option<f64>,
    /// Primary swell height (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_height_m: Option<f64>,
    /// Primary swell period (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_period_s: Option<f64>,
    /// Primary swell source bearing (degrees, 0-360)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_direction_deg: Option<f64>,
    /// Air temperature (celsius)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    /// Tide suitability tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tide: Option<TideSuitability>,
    /// Surface condition tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionTag>,
}

impl Default for ForecastSlot {
    fn default() -> Self {
        Self {
            day_key: String::new(),
            offset_hours: 0,
            time_label: None,
            day_part: DayPart::Morning,
            wave_height_m: None,
            wave_period_s: None,
            wind_speed_kmh: None,
            wind_direction_deg: None,
            swell_height_m: None,
            swell_period_s: None,
            swell_direction_deg: None,
            temperature_c: None,
            tide: None,
            condition: None,
        }
    }
}

impl ForecastSlot {
    /// Hour of day for bucketing: the parsed "HH:MM" label is preferred,
    /// falling back to `offset_hours` wrapped into a day.
    pub fn hour_of_day(&self) -> u32 {
        if let Some(label) = &self.time_label {
            if let Some(hour) = label.split(':').next().and_then(|h| h.parse::<u32>().ok()) {
                if hour < 24 {
                    return hour;
                }
            }
        }
        self.offset_hours.rem_euclid(24) as u32
    }
}

/// Derived quality for one slot: score plus descriptive tags.
///
/// A pure function of slot + preferences; identical inputs always yield
/// identical quality. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuality {
    /// Surfability score, 0-10
    pub score: f64,
    /// Rating tier derived from the score
    pub rating: RatingBucket,
    /// Wave size band, when a wave height is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_band: Option<SizeBand>,
    /// Wind comfort, when both a wind bearing and a spot facing are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_comfort: Option<WindComfort>,
    /// Surface quality, when derivable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceQuality>,
}

/// Per-day directional trends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTrends {
    /// Swell (or wave) height trend
    pub swell: TrendDirection,
    /// Wind speed trend
    pub wind: TrendDirection,
    /// Surface quality trend; rising means getting cleaner
    pub surface: TrendDirection,
}

/// A spot and its full slot sequence, the unit multi-spot functions operate on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotForecast {
    pub spot_id: String,
    pub name: String,
    pub slots: Vec<ForecastSlot>,
}

/// Derive surface quality from wind speed, falling back to the condition tag.
///
/// Wind bands: below 6 km/h glassy, below 14 clean, below 25 bumpy, else messy.
pub fn surface_quality_of(slot: &ForecastSlot) -> Option<SurfaceQuality> {
    if let Some(speed) = slot.wind_speed_kmh {
        return Some(if speed < 6.0 {
            SurfaceQuality::Glassy
        } else if speed < 14.0 {
            SurfaceQuality::Clean
        } else if speed < 25.0 {
            SurfaceQuality::Bumpy
        } else {
            SurfaceQuality::Messy
        });
    }
    slot.condition.map(|tag| match tag {
        ConditionTag::Clean => SurfaceQuality::Clean,
        ConditionTag::Mixed => SurfaceQuality::Bumpy,
        ConditionTag::Choppy => SurfaceQuality::Messy,
    })
}

/// Arithmetic mean; 0 for an empty series
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Arithmetic mean; absent for an empty series
pub(crate) fn mean_opt(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bucket_order_and_index() {
        assert!(RatingBucket::Poor < RatingBucket::Epic);
        assert_eq!(RatingBucket::Poor.index(), 0);
        assert_eq!(RatingBucket::Epic.index(), 6);
    }

    #[test]
    fn test_rating_bucket_from_label_defaults_to_worst() {
        assert_eq!(RatingBucket::from_label("veryGood"), RatingBucket::VeryGood);
        assert_eq!(RatingBucket::from_label("amazing"), RatingBucket::Poor);
        assert_eq!(RatingBucket::from_label(""), RatingBucket::Poor);
    }

    #[test]
    fn test_rating_bucket_from_score() {
        assert_eq!(RatingBucket::from_score(9.0), RatingBucket::Epic);
        assert_eq!(RatingBucket::from_score(7.0), RatingBucket::VeryGood);
        assert_eq!(RatingBucket::from_score(4.0), RatingBucket::Fair);
        assert_eq!(RatingBucket::from_score(0.5), RatingBucket::Poor);
    }

    #[test]
    fn test_size_band_from_wave_height() {
        assert_eq!(SizeBand::from_wave_height(0.1), SizeBand::Tiny);
        assert_eq!(SizeBand::from_wave_height(1.0), SizeBand::Chest);
        assert_eq!(SizeBand::from_wave_height(2.0), SizeBand::Overhead);
        assert_eq!(SizeBand::from_wave_height(3.5), SizeBand::DoubleOverhead);
    }

    #[test]
    fn test_size_band_from_label_defaults_to_smallest() {
        assert_eq!(SizeBand::from_label("doubleOverhead"), SizeBand::DoubleOverhead);
        assert_eq!(SizeBand::from_label("enormous"), SizeBand::Tiny);
    }

    #[test]
    fn test_score_class_cut_points() {
        assert_eq!(ScoreClass::from_score(7.0), ScoreClass::High);
        assert_eq!(ScoreClass::from_score(6.99), ScoreClass::Medium);
        assert_eq!(ScoreClass::from_score(4.5), ScoreClass::Medium);
        assert_eq!(ScoreClass::from_score(4.49), ScoreClass::Low);
    }

    #[test]
    fn test_hour_of_day_prefers_time_label() {
        let slot = ForecastSlot {
            offset_hours: 30,
            time_label: Some("09:00".to_string()),
            ..Default::default()
        };
        assert_eq!(slot.hour_of_day(), 9);
    }

    #[test]
    fn test_hour_of_day_falls_back_to_offset() {
        let slot = ForecastSlot {
            offset_hours: 30,
            ..Default::default()
        };
        assert_eq!(slot.hour_of_day(), 6);

        let bad_label = ForecastSlot {
            offset_hours: 5,
            time_label: Some("not a time".to_string()),
            ..Default::default()
        };
        assert_eq!(bad_label.hour_of_day(), 5);
    }

    #[test]
    fn test_surface_quality_wind_bands() {
        let slot = |speed: f64| ForecastSlot {
            wind_speed_kmh: Some(speed),
            ..Default::default()
        };
        assert_eq!(surface_quality_of(&slot(3.0)), Some(SurfaceQuality::Glassy));
        assert_eq!(surface_quality_of(&slot(10.0)), Some(SurfaceQuality::Clean));
        assert_eq!(surface_quality_of(&slot(20.0)), Some(SurfaceQuality::Bumpy));
        assert_eq!(surface_quality_of(&slot(30.0)), Some(SurfaceQuality::Messy));
    }

    #[test]
    fn test_surface_quality_condition_fallback() {
        let slot = ForecastSlot {
            condition: Some(ConditionTag::Choppy),
            ..Default::default()
        };
        assert_eq!(surface_quality_of(&slot), Some(SurfaceQuality::Messy));

        let bare = ForecastSlot::default();
        assert_eq!(surface_quality_of(&bare), None);
    }

    #[test]
    fn test_wind_comfort_favorable() {
        assert!(WindComfort::Offshore.is_favorable());
        assert!(WindComfort::CrossOff.is_favorable());
        assert!(!WindComfort::Cross.is_favorable());
        assert!(!WindComfort::Onshore.is_favorable());
    }

    #[test]
    fn test_slot_serde_camel_case() {
        let slot = ForecastSlot {
            day_key: "2025-06-01".to_string(),
            offset_hours: 9,
            wave_height_m: Some(1.2),
            ..Default::default()
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["dayKey"], "2025-06-01");
        assert_eq!(json["offsetHours"], 9);
        assert_eq!(json["waveHeightM"], 1.2);
        assert!(json.get("windSpeedKmh").is_none());
    }
}
