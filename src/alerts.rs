//! Alert profile matching
//!
//! A user-authored alert profile is a set of threshold gates; a forecast day
//! matches only when every configured gate passes. Profiles are persisted by
//! the caller; this module only reads them.

use crate::buckets::group_slots_by_day;
use crate::scorer::SlotScorer;
use crate::types::{mean, RatingBucket, SizeBand, SlotQuality, SpotForecast};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-defined threshold configuration used to flag matching forecast days
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProfile {
    pub spot_id: String,
    /// Minimum day rating; always enforced
    pub min_rating_bucket: RatingBucket,
    /// Lower size-band bound; the size gate activates when either bound is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size_band: Option<SizeBand>,
    /// Upper size-band bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_band: Option<SizeBand>,
    /// When set, at least one slot must have offshore or cross-off wind
    #[serde(default)]
    pub prefer_offshore: bool,
}

/// Evaluate a day against a profile. All configured gates must pass:
///
/// 1. Rating gate (always): day rating index at or above the profile minimum.
/// 2. Size gate (when a bound is set): at least one slot's size band inside
///    `[min, max]`; a missing bound defaults to the end of the range. Slots
///    without a size band never satisfy it.
/// 3. Offshore gate (when `prefer_offshore`): at least one slot with
///    offshore or cross-off wind.
pub fn match_day_alert(
    profile: &AlertProfile,
    day_rating: RatingBucket,
    day_qualities: &[SlotQuality],
) -> bool {
    if day_rating.index() < profile.min_rating_bucket.index() {
        return false;
    }

    if profile.min_size_band.is_some() || profile.max_size_band.is_some() {
        let min_index = profile.min_size_band.map(SizeBand::index).unwrap_or(0);
        let max_index = profile
            .max_size_band
            .map(SizeBand::index)
            .unwrap_or(SizeBand::DoubleOverhead.index());
        let any_in_band = day_qualities.iter().any(|q| {
            q.size_band
                .map(|band| (min_index..=max_index).contains(&band.index()))
                .unwrap_or(false)
        });
        if !any_in_band {
            return false;
        }
    }

    if profile.prefer_offshore {
        let any_favorable = day_qualities
            .iter()
            .any(|q| q.wind_comfort.map(|c| c.is_favorable()).unwrap_or(false));
        if !any_favorable {
            return false;
        }
    }

    true
}

/// Evaluate a profile for every day of a spot's forecast.
///
/// Returns day key to match flag; a missing profile yields an empty map.
pub fn build_alert_map(
    profile: Option<&AlertProfile>,
    spot: &SpotForecast,
    scorer: &dyn SlotScorer,
) -> BTreeMap<String, bool> {
    let Some(profile) = profile else {
        return BTreeMap::new();
    };

    group_slots_by_day(&spot.slots)
        .into_iter()
        .map(|group| {
            let qualities: Vec<SlotQuality> =
                group.slots.iter().map(|s| scorer.score_slot(s)).collect();
            let scores: Vec<f64> = qualities.iter().map(|q| q.score).collect();
            let rating = RatingBucket::from_score(mean(&scores));
            let matched = match_day_alert(profile, rating, &qualities);
            (group.day_key, matched)
        })
        .collect()
}
