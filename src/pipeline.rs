//! Report assembly
//!
//! This module provides the public analysis API: it orchestrates the full
//! pipeline per spot (day grouping, summaries, trends, strips, windows, alert
//! map) and encodes the result as a versioned surf.report.v1 payload.

use crate::alerts::{build_alert_map, AlertProfile};
use crate::buckets::group_slots_by_day;
use crate::error::ForecastError;
use crate::scorer::{PreferenceScorer, SurfPreferences};
use crate::schema::SpotForecastDocument;
use crate::summary::{build_day_summary, build_strip_blocks, DaySummary, StripBlock};
use crate::trend::analyse_day_trends;
use crate::types::{DayTrends, SpotForecast};
use crate::windows::{best_window_for_day, build_surf_windows, SurfWindow, WindowOptions};
use crate::{PRODUCER_NAME, SURFCAST_VERSION};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "surf.report.v1";

/// Report producer metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Everything the presentation layer needs for one forecast day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub day_key: String,
    pub summary: DaySummary,
    pub trends: DayTrends,
    pub strip: Vec<StripBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_window: Option<SurfWindow>,
}

/// Complete per-spot report (surf.report.v1)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub spot_id: String,
    pub spot_name: String,
    pub days: Vec<DayReport>,
    /// All ranked windows across the forecast span
    pub windows: Vec<SurfWindow>,
    /// Day key to alert-match flag; empty without a profile
    pub alerts: BTreeMap<String, bool>,
}

impl SpotReport {
    /// Encode as pretty-printed JSON for the CLI/FFI boundary
    pub fn to_json(&self) -> Result<String, ForecastError> {
        serde_json::to_string_pretty(self).map_err(ForecastError::JsonError)
    }
}

/// Analyzer for producing spot reports.
///
/// The builders underneath are pure; the analyzer only adds the report
/// envelope (producer identity, timestamp) at the boundary.
pub struct SurfAnalyzer {
    scorer: PreferenceScorer,
    options: WindowOptions,
    instance_id: String,
}

impl Default for SurfAnalyzer {
    fn default() -> Self {
        Self::new(SurfPreferences::default())
    }
}

impl SurfAnalyzer {
    /// Create an analyzer with a unique instance ID
    pub fn new(prefs: SurfPreferences) -> Self {
        Self {
            scorer: PreferenceScorer::new(prefs),
            options: WindowOptions::default(),
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an analyzer with a specific instance ID
    pub fn with_instance_id(prefs: SurfPreferences, instance_id: String) -> Self {
        Self {
            scorer: PreferenceScorer::new(prefs),
            options: WindowOptions::default(),
            instance_id,
        }
    }

    /// Override the window tuning
    pub fn with_window_options(mut self, options: WindowOptions) -> Self {
        self.options = options;
        self
    }

    /// Analyze a spot forecast into a report
    pub fn analyze(&self, forecast: &SpotForecast, profile: Option<&AlertProfile>) -> SpotReport {
        let windows = build_surf_windows(
            &forecast.slots,
            &forecast.spot_id,
            &self.scorer,
            &self.options,
        );

        let days: Vec<DayReport> = group_slots_by_day(&forecast.slots)
            .into_iter()
            .map(|group| DayReport {
                summary: build_day_summary(&group.day_key, &group.slots, &self.scorer),
                trends: analyse_day_trends(&group.slots),
                strip: build_strip_blocks(&group.slots, &self.scorer),
                best_window: best_window_for_day(&windows, &group.slots).cloned(),
                day_key: group.day_key,
            })
            .collect();

        SpotReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: SURFCAST_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            spot_id: forecast.spot_id.clone(),
            spot_name: forecast.name.clone(),
            days,
            windows,
            alerts: build_alert_map(profile, forecast, &self.scorer),
        }
    }

    /// Parse a surf.spot_forecast.v1 document, analyze it, and encode the
    /// report as pretty JSON.
    pub fn analyze_json(&self, json: &str) -> Result<String, ForecastError> {
        let doc = SpotForecastDocument::parse_json(json)?;
        let report = self.analyze(&doc.into_forecast(), None);
        report.to_json()
    }
}
