//! Slot quality scoring
//!
//! This module defines the scoring seam consumed by every builder in the
//! pipeline (`SlotScorer`) and the concrete preference-driven implementation
//! (`PreferenceScorer`): a weighted blend of size, wind, swell-period, and
//! surface components, with a small tide bonus applied after the blend.

use crate::types::{
    surface_quality_of, ForecastSlot, RatingBucket, SizeBand, SlotQuality, SurfaceQuality,
    TideSuitability, WindComfort,
};
use serde::{Deserialize, Serialize};

/// Component weights; absent components are excluded from the blend, not zeroed
const SIZE_WEIGHT: f64 = 0.35;
const WIND_WEIGHT: f64 = 0.30;
const PERIOD_WEIGHT: f64 = 0.20;
const SURFACE_WEIGHT: f64 = 0.15;

/// Scoring seam: given a slot, produce a score and descriptive tags.
///
/// Every builder takes this as a black box, so callers can substitute their
/// own scoring (closures implement it directly).
pub trait SlotScorer {
    fn score_slot(&self, slot: &ForecastSlot) -> SlotQuality;
}

impl<F> SlotScorer for F
where
    F: Fn(&ForecastSlot) -> SlotQuality,
{
    fn score_slot(&self, slot: &ForecastSlot) -> SlotQuality {
        self(slot)
    }
}

/// User preferences driving the concrete scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfPreferences {
    /// Preferred wave-height band lower bound (meters)
    pub min_wave_height_m: f64,
    /// Preferred wave-height band upper bound (meters)
    pub max_wave_height_m: f64,
    /// Wind-speed ceiling; the wind component reaches 0 here (km/h)
    pub max_wind_speed_kmh: f64,
    /// Seaward facing bearing of the spot, used to classify wind comfort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spot_facing_deg: Option<f64>,
}

impl Default for SurfPreferences {
    fn default() -> Self {
        Self {
            min_wave_height_m: 0.6,
            max_wave_height_m: 1.8,
            max_wind_speed_kmh: 30.0,
            spot_facing_deg: None,
        }
    }
}

/// Preference-driven slot scorer.
///
/// Deterministic: the same slot and preferences always produce the same
/// quality.
#[derive(Debug, Clone, Default)]
pub struct PreferenceScorer {
    prefs: SurfPreferences,
}

impl PreferenceScorer {
    pub fn new(prefs: SurfPreferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &SurfPreferences {
        &self.prefs
    }

    /// Size component: 10 inside the preferred band, linear falloff below,
    /// 4 points per meter penalty above.
    fn size_score(&self, height_m: f64) -> f64 {
        let min = self.prefs.min_wave_height_m;
        let max = self.prefs.max_wave_height_m;
        if height_m < min {
            if min <= 0.0 {
                10.0
            } else {
                (height_m / min * 10.0).clamp(0.0, 10.0)
            }
        } else if height_m <= max {
            10.0
        } else {
            (10.0 - 4.0 * (height_m - max)).max(0.0)
        }
    }

    /// Wind component: 10 up to 5 km/h, linear to 0 at the ceiling, then
    /// scaled by the comfort factor.
    fn wind_score(&self, speed_kmh: f64, comfort: Option<WindComfort>) -> f64 {
        let ceiling = self.prefs.max_wind_speed_kmh;
        let base = if speed_kmh <= 5.0 {
            10.0
        } else if ceiling <= 5.0 || speed_kmh >= ceiling {
            0.0
        } else {
            10.0 * (1.0 - (speed_kmh - 5.0) / (ceiling - 5.0))
        };
        let factor = match comfort {
            Some(WindComfort::Offshore) => 1.0,
            Some(WindComfort::CrossOff) => 0.9,
            Some(WindComfort::Cross) => 0.75,
            Some(WindComfort::CrossOn) => 0.6,
            Some(WindComfort::Onshore) => 0.5,
            None => 0.85,
        };
        base * factor
    }

    /// Classify wind comfort from the angular difference between the wind's
    /// source bearing and the landward side of the spot.
    fn wind_comfort(&self, slot: &ForecastSlot) -> Option<WindComfort> {
        let facing = self.prefs.spot_facing_deg?;
        let wind_from = slot.wind_direction_deg?;
        let landward = (facing + 180.0).rem_euclid(360.0);
        let diff = angular_difference(wind_from, landward);
        Some(if diff <= 45.0 {
            WindComfort::Offshore
        } else if diff <= 80.0 {
            WindComfort::CrossOff
        } else if diff <= 100.0 {
            WindComfort::Cross
        } else if diff <= 135.0 {
            WindComfort::CrossOn
        } else {
            WindComfort::Onshore
        })
    }
}

impl SlotScorer for PreferenceScorer {
    fn score_slot(&self, slot: &ForecastSlot) -> SlotQuality {
        let wind_comfort = self.wind_comfort(slot);
        let surface = surface_quality_of(slot);

        let size = slot.wave_height_m.map(|h| self.size_score(h));
        let wind = slot
            .wind_speed_kmh
            .map(|s| self.wind_score(s, wind_comfort));
        let period = slot
            .swell_period_s
            .or(slot.wave_period_s)
            .map(period_score);
        let surface_component = surface.map(|s| match s {
            SurfaceQuality::Glassy => 10.0,
            SurfaceQuality::Clean => 8.0,
            SurfaceQuality::Bumpy => 4.5,
            SurfaceQuality::Messy => 2.0,
        });

        let components = [
            (size, SIZE_WEIGHT),
            (wind, WIND_WEIGHT),
            (period, PERIOD_WEIGHT),
            (surface_component, SURFACE_WEIGHT),
        ];

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (value, weight) in components {
            if let Some(v) = value {
                weighted_sum += v * weight;
                weight_total += weight;
            }
        }

        let mut score = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        };

        score += match slot.tide {
            Some(TideSuitability::Good) => 0.4,
            Some(TideSuitability::Fair) => 0.1,
            None => 0.0,
        };
        let score = score.clamp(0.0, 10.0);

        SlotQuality {
            score,
            rating: RatingBucket::from_score(score),
            size_band: slot.wave_height_m.map(SizeBand::from_wave_height),
            wind_comfort,
            surface,
        }
    }
}

/// Swell-period ladder: longer period swell scores higher
fn period_score(period_s: f64) -> f64 {
    if period_s >= 14.0 {
        10.0
    } else if period_s >= 10.0 {
        8.0
    } else if period_s >= 7.0 {
        6.0
    } else if period_s >= 5.0 {
        4.0
    } else {
        2.0
    }
}

/// Smallest angle between two bearings, in degrees (0-180)
fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DayPart;

    fn make_slot() -> ForecastSlot {
        ForecastSlot {
            day_key: "2025-06-01".to_string(),
            offset_hours: 9,
            day_part: DayPart::Morning,
            wave_height_m: Some(1.2),
            wind_speed_kmh: Some(10.0),
            swell_period_s: Some(12.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_blend_over_present_components() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let quality = scorer.score_slot(&make_slot());

        // size 10, wind 8 * 0.85 = 6.8, period 8, surface (clean) 8
        let expected = 10.0 * 0.35 + 6.8 * 0.30 + 8.0 * 0.20 + 8.0 * 0.15;
        assert!((quality.score - expected).abs() < 0.001);
        assert_eq!(quality.rating, RatingBucket::VeryGood);
        assert_eq!(quality.size_band, Some(SizeBand::Shoulder));
        assert_eq!(quality.surface, Some(SurfaceQuality::Clean));
        assert_eq!(quality.wind_comfort, None);
    }

    #[test]
    fn test_absent_components_excluded_not_zeroed() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let slot = ForecastSlot {
            wave_height_m: Some(1.2),
            ..Default::default()
        };
        let quality = scorer.score_slot(&slot);
        // Only the size component is present; it scores 10 inside the band.
        assert!((quality.score - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_no_components_scores_zero() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let quality = scorer.score_slot(&ForecastSlot::default());
        assert_eq!(quality.score, 0.0);
        assert_eq!(quality.rating, RatingBucket::Poor);
    }

    #[test]
    fn test_tide_bonus_applied_after_blend() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let mut slot = make_slot();
        let without = scorer.score_slot(&slot).score;

        slot.tide = Some(TideSuitability::Good);
        let with = scorer.score_slot(&slot);
        assert!((with.score - (without + 0.4)).abs() < 0.001);
        assert_eq!(with.rating, RatingBucket::Epic);
    }

    #[test]
    fn test_size_penalty_above_band() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        // 1 meter over the 1.8 m ceiling costs 4 points
        assert!((scorer.size_score(2.8) - 6.0).abs() < 0.001);
        // Falloff below the band
        assert!((scorer.size_score(0.3) - 5.0).abs() < 0.001);
        assert!(scorer.size_score(10.0) >= 0.0);
    }

    #[test]
    fn test_wind_comfort_classification() {
        let scorer = PreferenceScorer::new(SurfPreferences {
            spot_facing_deg: Some(270.0),
            ..Default::default()
        });
        let wind_from = |deg: f64| ForecastSlot {
            wind_direction_deg: Some(deg),
            ..Default::default()
        };
        // West-facing spot: land lies to the east (90 degrees)
        assert_eq!(
            scorer.wind_comfort(&wind_from(90.0)),
            Some(WindComfort::Offshore)
        );
        assert_eq!(
            scorer.wind_comfort(&wind_from(160.0)),
            Some(WindComfort::CrossOff)
        );
        assert_eq!(
            scorer.wind_comfort(&wind_from(185.0)),
            Some(WindComfort::Cross)
        );
        assert_eq!(
            scorer.wind_comfort(&wind_from(210.0)),
            Some(WindComfort::CrossOn)
        );
        assert_eq!(
            scorer.wind_comfort(&wind_from(270.0)),
            Some(WindComfort::Onshore)
        );
    }

    #[test]
    fn test_wind_comfort_requires_facing() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let slot = ForecastSlot {
            wind_direction_deg: Some(90.0),
            ..Default::default()
        };
        assert_eq!(scorer.wind_comfort(&slot), None);
    }

    #[test]
    fn test_determinism() {
        let scorer = PreferenceScorer::new(SurfPreferences::default());
        let slot = make_slot();
        assert_eq!(scorer.score_slot(&slot), scorer.score_slot(&slot));
    }

    #[test]
    fn test_closures_implement_slot_scorer() {
        let fixed = |_slot: &ForecastSlot| SlotQuality {
            score: 5.0,
            rating: RatingBucket::FairToGood,
            size_band: None,
            wind_comfort: None,
            surface: None,
        };
        let quality = fixed.score_slot(&make_slot());
        assert_eq!(quality.score, 5.0);
    }
}
