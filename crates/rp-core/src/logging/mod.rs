//! Structured logging for rp-core.
//!
//! Two renderings of the same events, both on stderr:
//! - a human console format for interactive runs
//! - JSON lines (`--log-format jsonl`) for scripted runs
//!
//! stdout carries only command payloads.
//!
//! ```ignore
//! use rp_core::log_event;
//! use rp_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogContext, Stage};
//!
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id());
//! log_event!(ctx, INFO, event_names::SYNTH_FINISHED, Stage::Synthesize, "done", rows = 48u64);
//! ```

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, LogRecord, Stage};
pub use layer::JsonlLayer;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    // Targets are event names, so a bare level directive is the whole filter.
    let filter = EnvFilter::new(config.level.as_str());

    let installed = match config.format {
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
        LogFormat::Human => {
            let console = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false);
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console.without_time())
                    .try_init()
            }
        }
    };
    // A subscriber set by a test harness stays in place.
    let _ = installed;
}

/// Short run identifier: `run-` plus 12 hex characters.
pub fn generate_run_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &id[..12])
}

/// Emit a named event tagged with the run id and stage.
///
/// `$level` is one of `TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`; `$event`
/// must be a constant from [`event_names`].
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::TAG_FINISHED, Stage::Tag, "tagging done",
///     flagged = 12u64, scored = 240u64);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            stage = %$stage,
            message = %$msg,
            $($key = $val,)*
        )
    };
}
