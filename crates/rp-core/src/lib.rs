//! Revenue Pulse Core Library
//!
//! This library provides the core functionality for revenue pulse:
//! - Seeded synthesis of monthly (region, plan) revenue series
//! - Isolation-forest outlier tagging over a row set
//! - CSV dataset persistence with a checksummed sidecar manifest
//! - Row filtering and KPI summaries
//! - Exit codes and structured logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod dataset;
pub mod exit_codes;
pub mod filter;
pub mod logging;
pub mod summary;
pub mod synth;
pub mod tagger;

pub use dataset::{load_dataset, write_dataset, DatasetError, DatasetManifest, ManifestInputs};
pub use exit_codes::ExitCode;
pub use filter::RowFilter;
pub use summary::Summary;
pub use synth::Synthesizer;
pub use tagger::{OutlierTagger, TagReport, TaggerError};
