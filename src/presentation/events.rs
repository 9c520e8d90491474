//! Command events

use std::path::PathBuf;

use crate::synth::StackStatus;

/// Everything the commands report
#[derive(Debug, Clone)]
pub enum Event {
    /// Configuration loaded with warnings
    ConfigWarning { message: String },
    /// Synthesis started
    SynthStarted { config: PathBuf, out_dir: PathBuf },
    /// One stack was synthesized and written
    StackSynthesized {
        name: String,
        resource_count: usize,
        hash: String,
    },
    /// Synthesis finished
    SynthCompleted { stack_count: usize, out_dir: PathBuf },
    /// One stack compared against the previous assembly
    StackDiffed {
        name: String,
        status: StackStatus,
        detail: Option<String>,
    },
    /// Diff finished; `unchanged` means re-synthesis is a no-op
    DiffCompleted { unchanged: bool, changed_count: usize },
    /// One declared output of a stack
    OutputListed { stack: String, name: String },
}

/// Sink receiving command events
pub trait EventSink {
    fn on_event(&self, event: Event);
}
