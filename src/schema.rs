//! surf.spot_forecast.v1 schema definition
//!
//! The input document boundary: a versioned spot-forecast document with slot
//! array, parse helpers for single / array / NDJSON forms, and field
//! validation producing indexed issues for the CLI's validate command.

use crate::error::ForecastError;
use crate::types::{ForecastSlot, SpotForecast};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Current input schema version
pub const SCHEMA_VERSION: &str = "surf.spot_forecast.v1";

/// A spot-forecast document as delivered by the forecast-fetch layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotForecastDocument {
    /// Must equal "surf.spot_forecast.v1"
    pub schema_version: String,
    pub spot_id: String,
    pub name: String,
    /// IANA timezone of the spot, informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// When the forecast was generated upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub slots: Vec<ForecastSlot>,
}

/// One validation finding, indexed into the document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Offending slot index; absent for document-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_index: Option<usize>,
    pub field: String,
    pub message: String,
}

impl SpotForecastDocument {
    /// Parse a single document from JSON
    pub fn parse_json(json: &str) -> Result<Self, ForecastError> {
        let doc: SpotForecastDocument = serde_json::from_str(json)?;
        Ok(doc)
    }

    /// Parse a JSON array of documents
    pub fn parse_array(json: &str) -> Result<Vec<Self>, ForecastError> {
        let docs: Vec<SpotForecastDocument> = serde_json::from_str(json)?;
        Ok(docs)
    }

    /// Parse NDJSON (newline-delimited JSON), one document per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Self>, ForecastError> {
        let mut docs = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<SpotForecastDocument>(trimmed) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    return Err(ForecastError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(docs)
    }

    /// Validate document fields; an empty result means the document is clean.
    ///
    /// Validation never interrupts the pipeline (missing fields are absence,
    /// not failure); it exists so callers can surface malformed feeds.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.schema_version != SCHEMA_VERSION {
            issues.push(ValidationIssue {
                slot_index: None,
                field: "schemaVersion".to_string(),
                message: format!(
                    "expected {SCHEMA_VERSION}, got {}",
                    self.schema_version
                ),
            });
        }
        if self.spot_id.trim().is_empty() {
            issues.push(ValidationIssue {
                slot_index: None,
                field: "spotId".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        for (index, slot) in self.slots.iter().enumerate() {
            validate_slot(slot, index, &mut issues);
        }

        issues
    }

    /// Strip the envelope down to the forecast the pipeline consumes
    pub fn into_forecast(self) -> SpotForecast {
        SpotForecast {
            spot_id: self.spot_id,
            name: self.name,
            slots: self.slots,
        }
    }
}

fn validate_slot(slot: &ForecastSlot, index: usize, issues: &mut Vec<ValidationIssue>) {
    let mut push = |field: &str, message: String| {
        issues.push(ValidationIssue {
            slot_index: Some(index),
            field: field.to_string(),
            message,
        });
    };

    if NaiveDate::parse_from_str(&slot.day_key, "%Y-%m-%d").is_err() {
        push("dayKey", format!("not a YYYY-MM-DD date: {}", slot.day_key));
    }
    if let Some(label) = &slot.time_label {
        if NaiveTime::parse_from_str(label, "%H:%M").is_err() {
            push("timeLabel", format!("not an HH:MM label: {label}"));
        }
    }

    let bearings = [
        ("windDirectionDeg", slot.wind_direction_deg),
        ("swellDirectionDeg", slot.swell_direction_deg),
    ];
    for (field, value) in bearings {
        if let Some(deg) = value {
            if !(0.0..=360.0).contains(&deg) {
                push(field, format!("bearing out of range 0-360: {deg}"));
            }
        }
    }

    let non_negative = [
        ("waveHeightM", slot.wave_height_m),
        ("wavePeriodS", slot.wave_period_s),
        ("windSpeedKmh", slot.wind_speed_kmh),
        ("swellHeightM", slot.swell_height_m),
        ("swellPeriodS", slot.swell_period_s),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if v < 0.0 {
                push(field, format!("must be non-negative: {v}"));
            }
        }
    }
}
