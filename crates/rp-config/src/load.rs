//! Loading a validated configuration.

use std::path::{Path, PathBuf};

use crate::preset::{get_preset, PresetName};
use crate::resolve::{resolve_config, ConfigSource};
use crate::validate::{validate_config, ValidationResult};
use crate::Config;

/// Options controlling config loading.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config path from the CLI.
    pub config_path: Option<PathBuf>,

    /// Built-in preset. Takes priority over every file source.
    pub preset: Option<PresetName>,
}

/// A loaded, validated configuration with provenance.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
    /// SHA-256 of the canonical config encoding.
    pub hash: String,
}

/// Load a configuration using the standard resolution order, then validate it.
pub fn load_config(options: &LoadOptions) -> ValidationResult<LoadedConfig> {
    if let Some(preset) = options.preset {
        return finish(get_preset(preset), ConfigSource::Preset, None);
    }

    let resolved = resolve_config(options.config_path.as_deref());
    match resolved.path {
        Some(path) => {
            let config = Config::from_file(&path)?;
            finish(config, resolved.source, Some(path))
        }
        None => finish(get_preset(PresetName::Baseline), resolved.source, None),
    }
}

/// Load and validate a config file at an explicit path.
pub fn load_config_file(path: &Path) -> ValidationResult<LoadedConfig> {
    let config = Config::from_file(path)?;
    finish(config, ConfigSource::CliArgument, Some(path.to_path_buf()))
}

fn finish(
    config: Config,
    source: ConfigSource,
    path: Option<PathBuf>,
) -> ValidationResult<LoadedConfig> {
    validate_config(&config)?;
    let hash = config.content_hash();
    Ok(LoadedConfig {
        config,
        source,
        path,
        hash,
    })
}
