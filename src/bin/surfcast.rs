//! Surfcast CLI - Command-line interface for Surfcast
//!
//! Commands:
//! - analyze: Produce full surf.report.v1 reports for forecast documents
//! - windows: Extract ranked surf windows from forecast documents
//! - plan: Rank (spot, day) trip options across a date range
//! - validate: Validate forecast document schema
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use surfcast::alerts::AlertProfile;
use surfcast::error::ForecastError;
use surfcast::pipeline::{SurfAnalyzer, REPORT_VERSION};
use surfcast::planner::{build_trip_plan, TripOption};
use surfcast::schema::{SpotForecastDocument, SCHEMA_VERSION};
use surfcast::scorer::{PreferenceScorer, SurfPreferences};
use surfcast::types::{RatingBucket, SpotForecast};
use surfcast::windows::{build_surf_windows, SurfWindow, WindowOptions};
use surfcast::SURFCAST_VERSION;

/// Surfcast - Deterministic surf-forecast analytics
#[derive(Parser)]
#[command(name = "surfcast")]
#[command(version = SURFCAST_VERSION)]
#[command(about = "Transform spot forecasts into surf reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce full surf reports for forecast documents
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Preferences file (JSON); defaults apply when omitted
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Alert profile file (JSON); applied to the matching spot id
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Extract ranked surf windows from forecast documents
    Windows {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Preferences file (JSON)
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Minimum slot score for window membership
        #[arg(long, default_value = "6.5")]
        min_score: f64,

        /// Minimum slots per window
        #[arg(long, default_value = "2")]
        min_slots: usize,

        /// Maximum hour gap between consecutive window slots
        #[arg(long, default_value = "4")]
        max_gap_hours: i64,

        /// Maximum windows kept per spot
        #[arg(long, default_value = "6")]
        max_windows: usize,
    },

    /// Rank (spot, day) trip options across a date range
    Plan {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Preferences file (JSON)
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// First day of the range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,

        /// Last day of the range (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,

        /// Restrict to these spot ids (comma-separated); empty means all
        #[arg(long, value_delimiter = ',')]
        spots: Vec<String>,

        /// Drop options rated below this bucket (e.g. "good", "fairToGood")
        #[arg(long)]
        min_rating: Option<String>,

        /// Maximum options returned
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Validate forecast document schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Single forecast document or JSON array of documents
    Json,
    /// Newline-delimited JSON (one document per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (surf.spot_forecast.v1)
    Input,
    /// Output schema (surf.report.v1)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SurfcastCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            prefs,
            profile,
        } => cmd_analyze(
            &input,
            &output,
            input_format,
            output_format,
            prefs.as_deref(),
            profile.as_deref(),
        ),

        Commands::Windows {
            input,
            output,
            input_format,
            output_format,
            prefs,
            min_score,
            min_slots,
            max_gap_hours,
            max_windows,
        } => cmd_windows(
            &input,
            &output,
            input_format,
            output_format,
            prefs.as_deref(),
            WindowOptions {
                min_score,
                min_slots,
                max_gap_hours,
                max_windows,
            },
        ),

        Commands::Plan {
            input,
            output,
            input_format,
            output_format,
            prefs,
            from,
            to,
            spots,
            min_rating,
            limit,
        } => cmd_plan(
            &input,
            &output,
            input_format,
            output_format,
            prefs.as_deref(),
            &from,
            &to,
            &spots,
            min_rating.as_deref(),
            limit,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    prefs: Option<&Path>,
    profile: Option<&Path>,
) -> Result<(), SurfcastCliError> {
    let docs = read_documents(input, &input_format)?;
    let prefs = load_prefs(prefs)?;
    let profile = load_profile(profile)?;

    let analyzer = SurfAnalyzer::new(prefs);
    let reports: Vec<_> = docs
        .into_iter()
        .map(|doc| {
            let forecast = doc.into_forecast();
            let spot_profile = profile
                .as_ref()
                .filter(|p| p.spot_id == forecast.spot_id);
            analyzer.analyze(&forecast, spot_profile)
        })
        .collect();

    write_output(output, &format_output(&reports, &output_format)?)
}

fn cmd_windows(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    prefs: Option<&Path>,
    options: WindowOptions,
) -> Result<(), SurfcastCliError> {
    let docs = read_documents(input, &input_format)?;
    let scorer = PreferenceScorer::new(load_prefs(prefs)?);

    let mut windows: Vec<SurfWindow> = Vec::new();
    for doc in docs {
        let forecast = doc.into_forecast();
        windows.extend(build_surf_windows(
            &forecast.slots,
            &forecast.spot_id,
            &scorer,
            &options,
        ));
    }

    write_output(output, &format_output(&windows, &output_format)?)
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    prefs: Option<&Path>,
    from: &str,
    to: &str,
    spot_filter: &[String],
    min_rating: Option<&str>,
    limit: usize,
) -> Result<(), SurfcastCliError> {
    let docs = read_documents(input, &input_format)?;
    let scorer = PreferenceScorer::new(load_prefs(prefs)?);

    let spots: Vec<SpotForecast> = docs.into_iter().map(|d| d.into_forecast()).collect();

    let mut plan: Vec<TripOption> = build_trip_plan(
        &spots,
        from,
        to,
        spot_filter,
        &scorer,
        &WindowOptions::default(),
        limit,
    );

    if let Some(label) = min_rating {
        let floor = RatingBucket::from_label(label);
        plan.retain(|option| option.rating.index() >= floor.index());
    }

    write_output(output, &format_output(&plan, &output_format)?)
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), SurfcastCliError> {
    let docs = read_documents(input, &input_format)?;

    let mut findings: Vec<ValidationFinding> = Vec::new();
    for (doc_index, doc) in docs.iter().enumerate() {
        for issue in doc.validate() {
            findings.push(ValidationFinding {
                document_index: doc_index,
                spot_id: doc.spot_id.clone(),
                slot_index: issue.slot_index,
                field: issue.field,
                message: issue.message,
            });
        }
    }

    let report = ValidationReport {
        total_documents: docs.len(),
        invalid_documents: {
            let mut seen: Vec<usize> = findings.iter().map(|f| f.document_index).collect();
            seen.dedup();
            seen.len()
        },
        findings,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total documents:   {}", report.total_documents);
        println!("Invalid documents: {}", report.invalid_documents);

        if !report.findings.is_empty() {
            println!("\nFindings:");
            for finding in &report.findings {
                let location = match finding.slot_index {
                    Some(slot) => format!("slot {slot}"),
                    None => "document".to_string(),
                };
                println!(
                    "  - {} ({}, {}): {}",
                    finding.spot_id, location, finding.field, finding.message
                );
            }
        }
    }

    if report.invalid_documents > 0 {
        Err(SurfcastCliError::ValidationFailed(report.invalid_documents))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), SurfcastCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("A spot-forecast document contains:");
                println!();
                println!("- schemaVersion: must be {}", SCHEMA_VERSION);
                println!("- spotId, name: spot identity");
                println!("- timezone: IANA timezone (optional, informational)");
                println!("- generatedAt: upstream generation timestamp (optional)");
                println!("- slots: array of forecast slots, each with:");
                println!("  - dayKey (YYYY-MM-DD), offsetHours, dayPart");
                println!("  - timeLabel (HH:MM, optional)");
                println!("  - waveHeightM, wavePeriodS, windSpeedKmh, windDirectionDeg");
                println!("  - swellHeightM, swellPeriodS, swellDirectionDeg");
                println!("  - tide (good | fair), condition (clean | mixed | choppy)");
                println!();
                println!("All numeric slot fields are optional; absent means unknown.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: {}", REPORT_VERSION);
                println!();
                println!("A surf report contains:");
                println!();
                println!("- reportVersion: {}", REPORT_VERSION);
                println!("- producer: {{ name, version, instanceId }}");
                println!("- generatedAtUtc: report timestamp");
                println!("- spotId, spotName");
                println!("- days: one entry per forecast day containing:");
                println!("  - summary: narrative key, day score, rating, slot count");
                println!("  - trends: swell / wind / surface direction per half-day");
                println!("  - strip: compact per-slot presentation blocks");
                println!("  - bestWindow: the day's best surf window, if any");
                println!("- windows: all ranked surf windows across the span");
                println!("- alerts: day key to alert-match flag (with a profile)");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, SurfcastCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(SurfcastCliError::StdinIsTty);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_documents(
    input: &Path,
    input_format: &InputFormat,
) -> Result<Vec<SpotForecastDocument>, SurfcastCliError> {
    let data = read_input(input)?;

    let docs = match input_format {
        InputFormat::Json => {
            // Accept either a single document or an array
            if data.trim_start().starts_with('[') {
                SpotForecastDocument::parse_array(&data)?
            } else {
                vec![SpotForecastDocument::parse_json(&data)?]
            }
        }
        InputFormat::Ndjson => SpotForecastDocument::parse_ndjson(&data)?,
    };

    if docs.is_empty() {
        return Err(SurfcastCliError::NoDocuments);
    }
    Ok(docs)
}

fn load_prefs(prefs: Option<&Path>) -> Result<SurfPreferences, SurfcastCliError> {
    match prefs {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(SurfPreferences::default()),
    }
}

fn load_profile(profile: Option<&Path>) -> Result<Option<AlertProfile>, SurfcastCliError> {
    match profile {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&json)?))
        }
        None => Ok(None),
    }
}

fn format_output<T: Serialize>(
    records: &[T],
    format: &OutputFormat,
) -> Result<String, SurfcastCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), SurfcastCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
        Ok(())
    } else {
        Ok(fs::write(output, data)?)
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://surfcast.dev/schemas/surf.spot_forecast.v1.json",
        "title": "surf.spot_forecast.v1",
        "description": "Surfcast spot-forecast input schema",
        "type": "object",
        "required": ["schemaVersion", "spotId", "name", "slots"],
        "properties": {
            "schemaVersion": {
                "type": "string",
                "const": "surf.spot_forecast.v1"
            },
            "spotId": { "type": "string" },
            "name": { "type": "string" },
            "timezone": { "type": "string" },
            "generatedAt": { "type": "string", "format": "date-time" },
            "slots": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["dayKey", "offsetHours", "dayPart"],
                    "properties": {
                        "dayKey": { "type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$" },
                        "offsetHours": { "type": "integer" },
                        "timeLabel": { "type": "string", "pattern": "^\\d{2}:\\d{2}$" },
                        "dayPart": {
                            "type": "string",
                            "enum": ["morning", "afternoon", "evening"]
                        },
                        "waveHeightM": { "type": "number", "minimum": 0 },
                        "wavePeriodS": { "type": "number", "minimum": 0 },
                        "windSpeedKmh": { "type": "number", "minimum": 0 },
                        "windDirectionDeg": { "type": "number", "minimum": 0, "maximum": 360 },
                        "swellHeightM": { "type": "number", "minimum": 0 },
                        "swellPeriodS": { "type": "number", "minimum": 0 },
                        "swellDirectionDeg": { "type": "number", "minimum": 0, "maximum": 360 },
                        "tide": { "type": "string", "enum": ["good", "fair"] },
                        "condition": { "type": "string", "enum": ["clean", "mixed", "choppy"] }
                    }
                }
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://surfcast.dev/schemas/surf.report.v1.json",
        "title": "surf.report.v1",
        "description": "Surfcast report output schema",
        "type": "object",
        "required": ["reportVersion", "producer", "generatedAtUtc", "spotId", "spotName", "days", "windows", "alerts"],
        "properties": {
            "reportVersion": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instanceId": { "type": "string" }
                }
            },
            "generatedAtUtc": { "type": "string" },
            "spotId": { "type": "string" },
            "spotName": { "type": "string" },
            "days": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "dayKey": { "type": "string" },
                        "summary": { "type": "object" },
                        "trends": { "type": "object" },
                        "strip": { "type": "array", "items": { "type": "object" } },
                        "bestWindow": { "type": "object" }
                    }
                }
            },
            "windows": {
                "type": "array",
                "items": { "type": "object" }
            },
            "alerts": {
                "type": "object",
                "additionalProperties": { "type": "boolean" }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum SurfcastCliError {
    Io(io::Error),
    Forecast(ForecastError),
    Json(serde_json::Error),
    NoDocuments,
    StdinIsTty,
    ValidationFailed(usize),
}

impl From<io::Error> for SurfcastCliError {
    fn from(e: io::Error) -> Self {
        SurfcastCliError::Io(e)
    }
}

impl From<ForecastError> for SurfcastCliError {
    fn from(e: ForecastError) -> Self {
        SurfcastCliError::Forecast(e)
    }
}

impl From<serde_json::Error> for SurfcastCliError {
    fn from(e: serde_json::Error) -> Self {
        SurfcastCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SurfcastCliError> for CliError {
    fn from(e: SurfcastCliError) -> Self {
        match e {
            SurfcastCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SurfcastCliError::Forecast(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the surf.spot_forecast.v1 schema".to_string()),
            },
            SurfcastCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            SurfcastCliError::NoDocuments => CliError {
                code: "NO_DOCUMENTS".to_string(),
                message: "No forecast documents found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            SurfcastCliError::StdinIsTty => CliError {
                code: "STDIN_IS_TTY".to_string(),
                message: "Input is - but stdin is a terminal".to_string(),
                hint: Some("Pipe forecast documents in or pass a file path".to_string()),
            },
            SurfcastCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} documents failed validation", count),
                hint: Some("Fix validation findings and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_documents: usize,
    invalid_documents: usize,
    findings: Vec<ValidationFinding>,
}

#[derive(serde::Serialize)]
struct ValidationFinding {
    document_index: usize,
    spot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot_index: Option<usize>,
    field: String,
    message: String,
}
