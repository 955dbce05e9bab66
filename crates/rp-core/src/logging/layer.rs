//! `tracing` layer that writes each event as one [`LogRecord`] JSON line.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::events::LogRecord;

impl Visit for LogRecord {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set_text(field.name(), format!("{value:?}"));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.set_value(field.name(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.set_value(field.name(), value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON form; keep them readable as text.
        match serde_json::Number::from_f64(value) {
            Some(n) => self.set_value(field.name(), serde_json::Value::Number(n)),
            None => self.set_text(field.name(), value.to_string()),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.set_value(field.name(), value.into());
    }
}

/// JSONL layer. Writes go through a mutex so lines never interleave.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber,
    W: Write + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut record = LogRecord::new((*meta.level()).into(), meta.target());
        event.record(&mut record);

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", record.to_jsonl());
        }
    }
}
