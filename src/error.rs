//! Error types for surfcast
//!
//! The builder functions themselves never fail: missing or malformed fields
//! are treated as absence and empty results are valid outputs. These errors
//! cover the crate's boundaries only (JSON parsing, schema validation, CLI I/O).

use thiserror::Error;

/// Errors that can occur at the crate's boundaries
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to parse forecast document: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid day key: {0}")]
    InvalidDayKey(String),

    #[error("Schema validation failed: {0}")]
    ValidationError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
