//! Revenue Pulse configuration loading and validation.
//!
//! This crate provides:
//! - Immutable parameter tables (regions, plans, content calendar)
//! - Typed simulation and tagger settings
//! - Built-in presets
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots for dataset manifests

pub mod calendar;
pub mod load;
pub mod preset;
pub mod resolve;
pub mod simulation;
pub mod snapshot;
pub mod tagger;
pub mod validate;

pub use calendar::{ContentCalendar, ContentEvent};
pub use load::{load_config, load_config_file, LoadOptions, LoadedConfig};
pub use preset::{get_preset, list_presets, PresetError, PresetInfo, PresetName};
pub use resolve::{resolve_config, ConfigSource, ResolvedPath};
pub use simulation::{
    Bounds, GrowthMode, GrowthParams, MarketingParams, PlanSpec, RateParams, RegionSpec,
    Seasonality, ShockParams, SimulationConfig, SubscriberParams,
};
pub use snapshot::ConfigSnapshot;
pub use tagger::TaggerConfig;
pub use validate::{
    validate_config, validate_contamination, validate_simulation, validate_tagger, ValidationError,
    ValidationResult,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Complete pipeline configuration: one file drives both the synthesizer and the tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schema_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub simulation: SimulationConfig,

    pub tagger: TaggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            simulation: SimulationConfig::default(),
            tagger: TaggerConfig::default(),
        }
    }
}

impl Config {
    /// Load a config from a JSON file without semantic validation.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string without semantic validation.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// SHA-256 over the canonical JSON encoding.
    ///
    /// Two configs with equal contents hash equally regardless of file formatting.
    pub fn content_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// JSON schema for config files.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
