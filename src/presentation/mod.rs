//! Presentation layer
//!
//! Command output goes through an event sink so the CLI can render either
//! human-readable lines or NDJSON for CI consumption.

mod events;
mod human;
mod json;

pub use events::{Event, EventSink};
pub use human::HumanSink;
pub use json::JsonSink;

/// Pick a sink from the global `--json` and `-v` flags. The NDJSON sink
/// already emits every field, so verbosity only shapes human output.
pub fn sink_for(json: bool, verbose: u8) -> Box<dyn EventSink> {
    if json {
        Box::new(JsonSink::stdout())
    } else {
        Box::new(HumanSink::stdout(verbose))
    }
}
