//! Event vocabulary: pipeline stages, stable event names, and the JSONL record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::LogLevel;

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Synthesize,
    Tag,
    Persist,
    Load,
    Summarize,
    Check,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Synthesize => "synthesize",
            Stage::Tag => "tag",
            Stage::Persist => "persist",
            Stage::Load => "load",
            Stage::Summarize => "summarize",
            Stage::Check => "check",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable event names. These become the `event` key of JSONL lines, so
/// renaming one is a breaking change for log consumers.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const SYNTH_STARTED: &str = "synth.started";
    pub const SYNTH_FINISHED: &str = "synth.finished";

    pub const TAG_STARTED: &str = "tag.started";
    pub const TAG_FINISHED: &str = "tag.finished";

    pub const DATASET_WRITTEN: &str = "dataset.written";
    pub const MANIFEST_WRITTEN: &str = "manifest.written";
    pub const DATASET_LOADED: &str = "dataset.loaded";
    pub const DATASET_MISSING: &str = "dataset.missing";

    pub const SUMMARY_COMPUTED: &str = "summary.computed";
    pub const CHECK_RESULT: &str = "check.result";

    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// One JSONL log line.
///
/// `run_id`, `stage` and `message` are lifted out of the event's fields;
/// everything else lands in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub ts: DateTime<Utc>,
    pub level: LogLevel,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, event: impl Into<String>) -> Self {
        LogRecord {
            ts: Utc::now(),
            level,
            event: event.into(),
            run_id: None,
            stage: None,
            message: None,
            fields: serde_json::Map::new(),
        }
    }

    /// Route a text field to its lifted slot or into `fields`.
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            "run_id" => self.run_id = Some(value),
            "stage" => self.stage = Some(value),
            "message" => self.message = Some(value),
            _ => {
                self.fields
                    .insert(name.to_string(), serde_json::Value::String(value));
            }
        }
    }

    pub fn set_value(&mut self, name: &str, value: serde_json::Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"level":"error","event":"{}","message":"unserializable record"}}"#, self.event)
        })
    }
}

/// Per-invocation context carried into every `log_event!`.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }
}
