//! Error types for Revenue Pulse.
//!
//! Every failure that reaches the CLI is funnelled into [`Error`], which carries:
//! - A stable numeric code for machine parsing
//! - A category for grouping
//! - A suggested follow-up for automation
//! - A remediation hint for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Dataset Not Found
//!   Reason: dataset not found at data/subscription_revenue.csv; run `rp-core generate` first
//!   Fix: Run 'rp-core generate' to create the dataset before loading it.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 40,
//!   "category": "dataset",
//!   "message": "dataset not found at data/subscription_revenue.csv; run `rp-core generate` first",
//!   "suggested_action": "generate",
//!   "context": { "path": "data/subscription_revenue.csv" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Revenue Pulse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Simulation/tagger configuration errors.
    Config,
    /// Series synthesis errors.
    Synthesis,
    /// Outlier tagging errors.
    Tagging,
    /// Persisted dataset errors.
    Dataset,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Synthesis => write!(f, "synthesis"),
            ErrorCategory::Tagging => write!(f, "tagging"),
            ErrorCategory::Dataset => write!(f, "dataset"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested follow-up for callers that handle errors programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Run the generator to (re)create the dataset.
    Generate,
    /// Run the check command against config or dataset.
    RunCheck,
    /// Fall back to a built-in preset.
    ResetConfig,
    /// Clean the input rows before scoring.
    CleanInput,
    /// Manual intervention required.
    ManualIntervention,
    /// Abort the operation.
    Abort,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Generate => write!(f, "generate"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::CleanInput => write!(f, "clean_input"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
            SuggestedAction::Abort => write!(f, "abort"),
        }
    }
}

/// Unified error type for Revenue Pulse.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    // Synthesis errors (20-29)
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("invalid month key: {value}")]
    InvalidMonth { value: String },

    // Tagging errors (30-39)
    #[error("outlier tagging failed: {0}")]
    Tagging(String),

    #[error("non-finite value for feature {feature} at row {row}")]
    NonFiniteFeature { row: usize, feature: String },

    // Dataset errors (40-49)
    #[error("dataset not found at {}; run `rp-core generate` first", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("invalid dataset: {0}")]
    DatasetInvalid(String),

    #[error("dataset checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Synthesis errors
    /// - 30-39: Tagging errors
    /// - 40-49: Dataset errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::UnknownPreset(_) => 12,
            Error::Synthesis(_) => 20,
            Error::InvalidMonth { .. } => 21,
            Error::Tagging(_) => 30,
            Error::NonFiniteFeature { .. } => 31,
            Error::DatasetNotFound { .. } => 40,
            Error::DatasetInvalid(_) => 41,
            Error::ChecksumMismatch { .. } => 42,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) | Error::UnknownPreset(_) => {
                ErrorCategory::Config
            }
            Error::Synthesis(_) | Error::InvalidMonth { .. } => ErrorCategory::Synthesis,
            Error::Tagging(_) | Error::NonFiniteFeature { .. } => ErrorCategory::Tagging,
            Error::DatasetNotFound { .. }
            | Error::DatasetInvalid(_)
            | Error::ChecksumMismatch { .. } => ErrorCategory::Dataset,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns the suggested follow-up for automation.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => SuggestedAction::RunCheck,
            Error::UnknownPreset(_) => SuggestedAction::ResetConfig,
            Error::Synthesis(_) | Error::InvalidMonth { .. } => SuggestedAction::RunCheck,
            Error::Tagging(_) => SuggestedAction::ManualIntervention,
            Error::NonFiniteFeature { .. } => SuggestedAction::CleanInput,
            Error::DatasetNotFound { .. } => SuggestedAction::Generate,
            Error::DatasetInvalid(_) | Error::ChecksumMismatch { .. } => SuggestedAction::Generate,
            Error::Io(_) => SuggestedAction::ManualIntervention,
            Error::Json(_) => SuggestedAction::Abort,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => {
                "Run 'rp-core check --config <file>' to see which field is out of range."
            }
            Error::UnknownPreset(_) => "List the built-in presets with 'rp-core config presets'.",
            Error::Synthesis(_) => "Validate the simulation config with 'rp-core check'.",
            Error::InvalidMonth { .. } => "Months are written as YYYY-MM, e.g. 2022-01.",
            Error::Tagging(_) => "Check that the selected feature columns are numeric.",
            Error::NonFiniteFeature { .. } => {
                "Remove or repair rows with missing or non-finite values before tagging."
            }
            Error::DatasetNotFound { .. } => {
                "Run 'rp-core generate' to create the dataset before loading it."
            }
            Error::DatasetInvalid(_) => {
                "The dataset does not match the canonical schema. Regenerate it with 'rp-core generate'."
            }
            Error::ChecksumMismatch { .. } => {
                "The dataset changed after it was generated. Regenerate it or discard the manifest."
            }
            Error::Io(_) => "Check disk space and permissions on the data directory.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Simulation Config",
            Error::UnknownPreset(_) => "Unknown Preset",
            Error::Synthesis(_) => "Synthesis Error",
            Error::InvalidMonth { .. } => "Invalid Month",
            Error::Tagging(_) => "Tagging Error",
            Error::NonFiniteFeature { .. } => "Non-Finite Feature Value",
            Error::DatasetNotFound { .. } => "Dataset Not Found",
            Error::DatasetInvalid(_) => "Invalid Dataset",
            Error::ChecksumMismatch { .. } => "Dataset Checksum Mismatch",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Format for a human reader (headline, reason, fix).
    pub fn to_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Suggested follow-up.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path, row index).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DatasetNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::NonFiniteFeature { row, feature } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("feature".to_string(), serde_json::json!(feature));
            }
            Error::ChecksumMismatch { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
