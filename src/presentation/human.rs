//! Human-readable event sink

use std::io::{self, Write};
use std::sync::Mutex;

use is_terminal::IsTerminal;

use crate::synth::StackStatus;

use super::{Event, EventSink};

/// Sink writing plain lines to stdout
///
/// Diff details are only expanded when stdout is a terminal or the user asked
/// for verbosity; piped output stays one line per stack. `-v` also appends
/// content hashes to synthesis lines.
pub struct HumanSink {
    writer: Mutex<Box<dyn Write + Send>>,
    expand_details: bool,
    show_hashes: bool,
}

impl HumanSink {
    pub fn stdout(verbose: u8) -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            expand_details: io::stdout().is_terminal() || verbose > 0,
            show_hashes: verbose > 0,
        }
    }

    #[allow(dead_code)]
    pub fn with_writer<W: Write + Send + 'static>(
        writer: W,
        expand_details: bool,
        show_hashes: bool,
    ) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            expand_details,
            show_hashes,
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}

fn status_label(status: StackStatus) -> &'static str {
    match status {
        StackStatus::Added => "added",
        StackStatus::Changed => "changed",
        StackStatus::Unchanged => "unchanged",
        StackStatus::Removed => "removed",
    }
}

impl EventSink for HumanSink {
    fn on_event(&self, event: Event) {
        match event {
            Event::ConfigWarning { message } => {
                self.write_line(&format!("warning: {message}"));
            }
            Event::SynthStarted { config, out_dir } => {
                self.write_line(&format!(
                    "synthesizing {} -> {}",
                    config.display(),
                    out_dir.display()
                ));
            }
            Event::StackSynthesized {
                name,
                resource_count,
                hash,
            } => {
                if self.show_hashes {
                    self.write_line(&format!("  {name} ({resource_count} resources) {hash}"));
                } else {
                    self.write_line(&format!("  {name} ({resource_count} resources)"));
                }
            }
            Event::SynthCompleted {
                stack_count,
                out_dir,
            } => {
                self.write_line(&format!(
                    "wrote {stack_count} templates to {}",
                    out_dir.display()
                ));
            }
            Event::StackDiffed {
                name,
                status,
                detail,
            } => {
                self.write_line(&format!("  {name}: {}", status_label(status)));
                if self.expand_details {
                    if let Some(detail) = detail {
                        for line in detail.lines() {
                            self.write_line(&format!("    {line}"));
                        }
                    }
                }
            }
            Event::DiffCompleted {
                unchanged,
                changed_count,
            } => {
                if unchanged {
                    self.write_line("no changes");
                } else {
                    self.write_line(&format!("{changed_count} stack(s) differ"));
                }
            }
            Event::OutputListed { stack, name } => {
                self.write_line(&format!("  {stack}.{name}"));
            }
        }
    }
}
