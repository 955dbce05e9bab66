//! Logging configuration.
//!
//! Precedence, highest first: CLI flags (`-v`, `-q`, `--log-format`), then
//! `RP_LOG` / `RP_LOG_FORMAT` / `RP_LOG_TIMESTAMPS`, then a coarse reading of
//! `RUST_LOG`, then the defaults (human, info, timestamps on).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Jsonl,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{other}' (expected human or jsonl)")),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum severity that is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Most verbose level named anywhere in a `RUST_LOG` directive string.
    fn from_rust_log(directives: &str) -> Option<LogLevel> {
        let lower = directives.to_ascii_lowercase();
        [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
        .into_iter()
        .find(|level| lower.contains(level.as_str()))
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human lines with a timestamp. JSONL lines always carry `ts`.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(|name| std::env::var(name).ok(), cli_level, cli_format)
    }

    fn resolve(
        env: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let defaults = LogConfig::default();

        let env_level = env("RP_LOG")
            .and_then(|v| v.parse::<LogLevel>().ok())
            .or_else(|| env("RUST_LOG").and_then(|v| LogLevel::from_rust_log(&v)));
        let env_format = env("RP_LOG_FORMAT").and_then(|v| v.parse::<LogFormat>().ok());
        let timestamps = env("RP_LOG_TIMESTAMPS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(defaults.timestamps);

        LogConfig {
            format: cli_format.or(env_format).unwrap_or(defaults.format),
            level: cli_level.or(env_level).unwrap_or(defaults.level),
            timestamps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(LogConfig::resolve(env(&[]), None, None), LogConfig::default());
    }

    #[test]
    fn format_and_level_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!(" human ".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn rp_log_wins_over_rust_log() {
        let config = LogConfig::resolve(
            env(&[("RP_LOG", "error"), ("RUST_LOG", "rp_core=trace")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
    }

    #[test]
    fn rust_log_picks_most_verbose_level() {
        let config = LogConfig::resolve(env(&[("RUST_LOG", "warn,rp_core=debug")]), None, None);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn unparseable_rp_log_falls_through() {
        let config = LogConfig::resolve(
            env(&[("RP_LOG", "chatty"), ("RUST_LOG", "warn")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn cli_beats_env() {
        let config = LogConfig::resolve(
            env(&[("RP_LOG", "warn"), ("RP_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Debug),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn timestamps_can_be_disabled() {
        let off = LogConfig::resolve(env(&[("RP_LOG_TIMESTAMPS", "false")]), None, None);
        assert!(!off.timestamps);
        let on = LogConfig::resolve(env(&[("RP_LOG_TIMESTAMPS", "1")]), None, None);
        assert!(on.timestamps);
    }

    #[test]
    fn tracing_levels_map_one_to_one() {
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(LogLevel::from(tracing::Level::TRACE).as_str(), "trace");
    }
}
