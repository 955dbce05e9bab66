//! Configuration snapshots for dataset manifests and reproducibility.
//!
//! A snapshot records which configuration produced a dataset so that the run
//! can be audited and repeated later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::load::LoadedConfig;
use crate::simulation::GrowthMode;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path where the config was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Source of the configuration.
    pub source: String,

    /// SHA-256 of the canonical config encoding.
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub seed: u64,
    pub start: String,
    pub end: String,
    pub regions: Vec<String>,
    pub plans: Vec<String>,
    pub growth_mode: GrowthMode,
    pub shocks_enabled: bool,
    pub calendar_events: usize,
    pub contamination: f64,
    pub features: Vec<String>,
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded configuration.
    pub fn new(loaded: &LoadedConfig) -> Self {
        let config = &loaded.config;
        let sim = &config.simulation;
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: loaded.path.as_ref().map(|p| p.display().to_string()),
            source: loaded.source.to_string(),
            config_hash: loaded.hash.clone(),
            summary: ConfigSummary {
                seed: sim.seed,
                start: sim.start.to_string(),
                end: sim.end.to_string(),
                regions: sim.regions.iter().map(|r| r.name.clone()).collect(),
                plans: sim.plans.iter().map(|p| p.name.clone()).collect(),
                growth_mode: sim.growth.mode,
                shocks_enabled: sim.shock.is_some(),
                calendar_events: sim.calendar.len(),
                contamination: config.tagger.contamination,
                features: config
                    .tagger
                    .features
                    .iter()
                    .map(|f| f.as_str().to_string())
                    .collect(),
            },
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Short identifier (first 12 chars of the hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}
