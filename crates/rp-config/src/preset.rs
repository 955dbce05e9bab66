//! Built-in configuration presets.
//!
//! - Baseline: five regions × three plans, Jan 2020 through Nov 2025, no shocks
//! - Volatile: baseline with compounding growth and random revenue shocks
//! - Compact: two regions × two plans over calendar year 2022, for quick runs and tests

use crate::calendar::ContentEvent;
use crate::simulation::{plan, region, GrowthMode, ShockParams, SimulationConfig};
use crate::tagger::TaggerConfig;
use crate::{Config, CONFIG_SCHEMA_VERSION};
use rp_common::MonthKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// Default parameter tables, level growth, no shocks
    #[default]
    Baseline,
    /// Compounding growth with injected revenue shocks
    Volatile,
    /// Two regions, two plans, one year
    Compact,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Baseline,
        PresetName::Volatile,
        PresetName::Compact,
    ];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Baseline => "baseline",
            PresetName::Volatile => "volatile",
            PresetName::Compact => "compact",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "baseline" | "default" => Some(PresetName::Baseline),
            "volatile" | "shocks" => Some(PresetName::Volatile),
            "compact" | "small" | "mini" => Some(PresetName::Compact),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Baseline => {
                "Five regions x three plans, 2020-01..2025-11, Q4 uplift, no shocks"
            }
            PresetName::Volatile => {
                "Baseline tables with compounding growth and 3% revenue shocks (x0.8 / x1.2)"
            }
            PresetName::Compact => "Regions A and B, plans Basic and Premium, 2022-01..2022-12",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Build the config for a preset.
pub fn get_preset(name: PresetName) -> Config {
    let simulation = match name {
        PresetName::Baseline => SimulationConfig::default(),
        PresetName::Volatile => volatile_simulation(),
        PresetName::Compact => compact_simulation(),
    };
    Config {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        description: Some(format!("preset: {}", name.as_str())),
        simulation,
        tagger: TaggerConfig::default(),
    }
}

fn volatile_simulation() -> SimulationConfig {
    let mut sim = SimulationConfig::default();
    sim.growth.mode = GrowthMode::Compounding;
    sim.shock = Some(ShockParams::default());
    sim
}

fn compact_simulation() -> SimulationConfig {
    SimulationConfig {
        start: MonthKey::from_literal(2022, 1),
        end: MonthKey::from_literal(2022, 12),
        regions: vec![region("A", 100.0, 12.0), region("B", 60.0, 8.0)],
        plans: vec![plan("Basic", 1.0, -0.05), plan("Premium", 1.5, 0.05)],
        revenue_noise_std_dev: 1.0,
        calendar: vec![
            ContentEvent::new(MonthKey::from_literal(2022, 5), "Spring Premiere"),
            ContentEvent::new(MonthKey::from_literal(2022, 11), "Holiday Special"),
        ],
        ..SimulationConfig::default()
    }
}

/// Information about a preset for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub regions: usize,
    pub plans: usize,
    pub months: usize,
    pub expected_rows: usize,
    pub growth_mode: GrowthMode,
    pub shocks_enabled: bool,
}

impl PresetInfo {
    /// Create info from a preset.
    pub fn from_preset(name: PresetName) -> Self {
        let config = get_preset(name);
        let sim = &config.simulation;
        Self {
            name: name.as_str().to_string(),
            description: name.description().to_string(),
            regions: sim.regions.len(),
            plans: sim.plans.len(),
            months: sim.month_count(),
            expected_rows: sim.expected_rows(),
            growth_mode: sim.growth.mode,
            shocks_enabled: sim.shock.is_some(),
        }
    }
}

/// List all available presets with summary information.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo::from_preset(name))
        .collect()
}
