//! JSON event sink
//!
//! Outputs command events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::synth::StackStatus;

use super::{Event, EventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    #[allow(dead_code)]
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{event}");
            let _ = writer.flush();
        }
    }
}

fn status_str(status: StackStatus) -> &'static str {
    match status {
        StackStatus::Added => "added",
        StackStatus::Changed => "changed",
        StackStatus::Unchanged => "unchanged",
        StackStatus::Removed => "removed",
    }
}

impl EventSink for JsonSink {
    fn on_event(&self, event: Event) {
        let json = match event {
            Event::ConfigWarning { message } => serde_json::json!({
                "event": "config_warning",
                "message": message,
            }),
            Event::SynthStarted { config, out_dir } => serde_json::json!({
                "event": "start",
                "command": "synth",
                "config": config.display().to_string(),
                "out_dir": out_dir.display().to_string(),
            }),
            Event::StackSynthesized {
                name,
                resource_count,
                hash,
            } => serde_json::json!({
                "event": "stack_synthesized",
                "stack": name,
                "resource_count": resource_count,
                "hash": hash,
            }),
            Event::SynthCompleted {
                stack_count,
                out_dir,
            } => serde_json::json!({
                "event": "done",
                "command": "synth",
                "stack_count": stack_count,
                "out_dir": out_dir.display().to_string(),
            }),
            Event::StackDiffed { name, status, .. } => serde_json::json!({
                "event": "stack_diffed",
                "stack": name,
                "status": status_str(status),
            }),
            Event::DiffCompleted {
                unchanged,
                changed_count,
            } => serde_json::json!({
                "event": "done",
                "command": "diff",
                "unchanged": unchanged,
                "changed_count": changed_count,
            }),
            Event::OutputListed { stack, name } => serde_json::json!({
                "event": "output",
                "stack": stack,
                "name": name,
            }),
        };
        self.write_event(json);
    }
}
