use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::app::LogEntry;

/// Entries kept for the log panel
const DEFAULT_BUFFER_CAPACITY: usize = 500;

/// Tracing layer that feeds the shell's log panel
///
/// The terminal is in raw mode while the shell runs, so diagnostics go here
/// instead of stderr.
pub struct ShellLogLayer {
    buffer: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
    /// Least severe level captured
    min_level: Level,
}

impl ShellLogLayer {
    pub fn new(buffer: Arc<Mutex<VecDeque<LogEntry>>>) -> Self {
        Self {
            buffer,
            capacity: DEFAULT_BUFFER_CAPACITY,
            min_level: Level::INFO,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }
}

impl<S> Layer<S> for ShellLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.level() > &self.min_level {
            return;
        }

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            timestamp: chrono::Utc::now(),
            level: *metadata.level(),
            message: visitor.finish(),
        };

        // Skip rather than block when the renderer holds the lock
        if let Ok(mut buffer) = self.buffer.try_lock() {
            while buffer.len() >= self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(entry);
        }
    }
}

/// Collects the message and structured fields of one event
#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: Vec<String>,
}

impl EntryVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        if self.message.is_empty() {
            return self.fields.join(" ");
        }
        format!("{} {}", self.message, self.fields.join(" "))
    }
}

impl tracing::field::Visit for EntryVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
