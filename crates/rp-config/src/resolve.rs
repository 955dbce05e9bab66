//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → built-in preset.

use std::path::{Path, PathBuf};

/// Where the configuration came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via RP_CONFIG or RP_CONFIG_DIR.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Named built-in preset.
    Preset,

    /// No file found; using the baseline preset.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::Preset => write!(f, "preset"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// A resolved config file location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// None when falling back to the built-in default.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "RP_CONFIG";
pub const ENV_CONFIG_DIR: &str = "RP_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "simulation.json";

/// Application name for XDG directories.
const APP_NAME: &str = "revenue-pulse";

/// Resolve the configuration file path.
///
/// 1. Explicit CLI path. Returned even if missing so the load fails loudly.
/// 2. `RP_CONFIG` (direct path)
/// 3. `RP_CONFIG_DIR` + `simulation.json`
/// 4. `~/.config/revenue-pulse/simulation.json`
/// 5. Built-in default (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ResolvedPath {
    resolve_with(cli_path, |name| std::env::var(name).ok(), dirs::config_dir())
}

/// Resolution with injected environment lookup and XDG base, for tests.
pub(crate) fn resolve_with(
    cli_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    xdg_base: Option<PathBuf>,
) -> ResolvedPath {
    if let Some(path) = cli_path {
        return ResolvedPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Some(env_path) = env(ENV_CONFIG_PATH).filter(|s| !s.is_empty()) {
        return ResolvedPath {
            path: Some(PathBuf::from(env_path)),
            source: ConfigSource::Environment,
        };
    }

    if let Some(config_dir) = env(ENV_CONFIG_DIR).filter(|s| !s.is_empty()) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return ResolvedPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(base) = xdg_base {
        let path = base.join(APP_NAME).join(CONFIG_FILENAME);
        if path.exists() {
            return ResolvedPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    ResolvedPath {
        path: None,
        source: ConfigSource::BuiltinDefault,
    }
}
