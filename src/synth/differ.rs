//! Assembly diffing
//!
//! Pure comparison of a freshly synthesized assembly against the manifest of
//! a previous one. No provider round-trip: two renderings of the same
//! configuration are byte-identical, so hash equality is the idempotence
//! check ("no changes").

use std::path::Path;

use similar::{ChangeTag, TextDiff};

use crate::error::InfraResult;
use crate::synth::assembly::{Assembly, Manifest};

/// Status of one stack relative to the previous assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatus {
    /// Stack did not exist in the previous assembly
    Added,
    /// Template hash differs from the previous assembly
    Changed,
    /// Template hash matches the previous assembly
    Unchanged,
    /// Stack existed previously but is absent from the new composition
    Removed,
}

/// Diff result for a single stack
#[derive(Debug, Clone)]
pub struct StackDiff {
    pub name: String,
    pub status: StackStatus,
    /// Unified text diff of the template bodies, for changed stacks
    pub detail: Option<String>,
}

/// Result of diffing a composition against a previous assembly
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub stacks: Vec<StackDiff>,
}

impl DiffReport {
    /// True when re-synthesis would reproduce the previous assembly exactly
    pub fn is_unchanged(&self) -> bool {
        self.stacks
            .iter()
            .all(|s| s.status == StackStatus::Unchanged)
    }

    pub fn changed_count(&self) -> usize {
        self.stacks
            .iter()
            .filter(|s| s.status != StackStatus::Unchanged)
            .count()
    }
}

/// Compare a new assembly against the manifest in `dir`
pub fn diff_against_dir(assembly: &Assembly, dir: &Path) -> InfraResult<DiffReport> {
    let manifest = Manifest::load(dir)?;
    let mut report = DiffReport::default();

    for rendered in assembly.rendered()? {
        let diff = match manifest.stacks.get(&rendered.name) {
            None => StackDiff {
                name: rendered.name.clone(),
                status: StackStatus::Added,
                detail: None,
            },
            Some(previous) if previous.hash.matches(&rendered.hash) => StackDiff {
                name: rendered.name.clone(),
                status: StackStatus::Unchanged,
                detail: None,
            },
            Some(_) => {
                let old_body = manifest
                    .read_template(dir, &rendered.name)?
                    .unwrap_or_default();
                StackDiff {
                    name: rendered.name.clone(),
                    status: StackStatus::Changed,
                    detail: Some(unified_diff(&old_body, &rendered.body)),
                }
            }
        };
        report.stacks.push(diff);
    }

    let new_names: Vec<&str> = assembly.stack_names();
    for name in manifest.stacks.keys() {
        if !new_names.contains(&name.as_str()) {
            report.stacks.push(StackDiff {
                name: name.clone(),
                status: StackStatus::Removed,
                detail: None,
            });
        }
    }

    Ok(report)
}

/// Render a unified line diff between two template bodies
fn unified_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        out.push(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
