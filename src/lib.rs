//! Surfcast - Deterministic surf-forecast analytics
//!
//! Surfcast transforms spot-forecast documents into surf reports through a
//! deterministic pipeline: slot scoring → day bucketing → trend analysis →
//! surf windows → day summaries → report encoding. Cross-spot views (heatmap,
//! discover feed, compare columns, trip planning) and alert-profile matching
//! build on the same scoring seam.
//!
//! ## Modules
//!
//! - **scorer**: the `SlotScorer` seam and the preference-driven scorer
//! - **buckets / trend / windows / summary**: per-day analysis builders
//! - **views / planner / alerts**: cross-spot ranking and alert matching
//! - **schema / pipeline**: document parsing and report assembly

pub mod alerts;
pub mod buckets;
pub mod error;
pub mod pipeline;
pub mod planner;
pub mod schema;
pub mod scorer;
pub mod summary;
pub mod trend;
pub mod types;
pub mod views;
pub mod windows;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::ForecastError;
pub use pipeline::{SpotReport, SurfAnalyzer, REPORT_VERSION};
pub use scorer::{PreferenceScorer, SlotScorer, SurfPreferences};

// Schema exports
pub use schema::{SpotForecastDocument, SCHEMA_VERSION};

// Core type exports
pub use types::{ForecastSlot, RatingBucket, SizeBand, SlotQuality, SpotForecast};

/// Surfcast version embedded in all report payloads
pub const SURFCAST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "surfcast";
