//! Revenue Pulse common types and errors.
//!
//! This crate provides the vocabulary shared by the config, math, and core crates:
//! - Dataset rows and scoring features
//! - Calendar month keys
//! - The canonical CSV schema
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod month;
pub mod output;
pub mod row;
pub mod schema;

pub use error::{Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use month::{MonthKey, MonthRange};
pub use output::OutputFormat;
pub use row::{Feature, Row, NO_LAUNCH};
pub use schema::{COLUMNS, DEFAULT_DATASET_PATH, REQUIRED_COLUMNS, SCHEMA_VERSION};
