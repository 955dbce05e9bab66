//! Dataset persistence.
//!
//! One CSV file in the canonical column order plus a sidecar manifest
//! (`<dataset>.manifest.json`) recording provenance and a SHA-256 of the CSV.

pub mod manifest;
pub mod reader;
pub mod validate;
pub mod writer;

use std::path::PathBuf;
use thiserror::Error;

pub use manifest::{manifest_path, verify_manifest, DatasetManifest, ManifestInputs};
pub use reader::{load_dataset, read_rows};
pub use validate::{validate_series, SeriesExpectation, SeriesIssue, SeriesReport};
pub use writer::{write_dataset, write_rows};

/// Dataset read/write failures.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset not found at {}; run `rp-core generate` first", path.display())]
    NotFound { path: PathBuf },

    #[error("line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("manifest not found at {}", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("checksum mismatch: manifest says {expected}, file hashes to {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatasetError {
    pub(crate) fn from_csv(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DatasetError::Io(io),
            _ => DatasetError::Csv { line, message },
        }
    }
}

impl From<DatasetError> for rp_common::Error {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::NotFound { path } => rp_common::Error::DatasetNotFound { path },
            DatasetError::ChecksumMismatch { expected, actual } => {
                rp_common::Error::ChecksumMismatch { expected, actual }
            }
            DatasetError::Io(e) => rp_common::Error::Io(e),
            other => rp_common::Error::DatasetInvalid(other.to_string()),
        }
    }
}

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
