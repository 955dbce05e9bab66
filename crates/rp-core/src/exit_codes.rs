//! Exit codes for the rp-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-9: Operational outcomes
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use rp_common::{Error, ErrorCategory};

/// Exit codes for rp-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Anomalies flagged and `--fail-on-anomaly` was set
    AnomaliesFound = 1,

    /// Invalid arguments
    ArgsError = 10,

    /// Configuration missing, unparsable, or semantically invalid
    ConfigError = 11,

    /// Dataset file does not exist
    DatasetMissing = 12,

    /// Dataset exists but is malformed, inconsistent, or fails its checksum
    DatasetInvalid = 13,

    /// Internal error (bug)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::AnomaliesFound => "OK_ANOMALIES",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DatasetMissing => "ERR_DATASET_MISSING",
            ExitCode::DatasetInvalid => "ERR_DATASET_INVALID",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map a library error onto its process exit code.
    pub fn for_error(error: &Error) -> ExitCode {
        match error {
            Error::DatasetNotFound { .. } => ExitCode::DatasetMissing,
            Error::UnknownPreset(_) | Error::InvalidMonth { .. } => ExitCode::ArgsError,
            _ => match error.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Dataset => ExitCode::DatasetInvalid,
                ErrorCategory::Tagging => ExitCode::DatasetInvalid,
                ErrorCategory::Synthesis => ExitCode::InternalError,
                ErrorCategory::Io => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
