//! Synthesized assemblies
//!
//! An `Assembly` is the result of one synthesis pass: the ordered stacks of
//! the composition, ready to be rendered. `synth_to_dir` writes one template
//! file per stack plus a manifest recording per-stack content hashes, which
//! later `diff` runs compare against. Template writes are atomic
//! (tempfile + rename) so a crashed synth never leaves a half-written
//! assembly behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InfraError, InfraResult};
use crate::synth::hash::ContentHash;
use crate::synth::stack::Stack;

/// Manifest file name within an output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current manifest schema version
const MANIFEST_VERSION: u32 = 1;

/// Ordered collection of synthesized stacks
///
/// The order is the dependency order of the composition; a stack never
/// appears before the stacks whose exports it imports.
#[derive(Debug, Default)]
pub struct Assembly {
    stacks: Vec<Stack>,
}

impl Assembly {
    pub fn new() -> Self {
        Self { stacks: Vec::new() }
    }

    pub fn push(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name() == name)
    }

    pub fn stack_names(&self) -> Vec<&str> {
        self.stacks.iter().map(|s| s.name()).collect()
    }

    /// Render every stack and compute its template hash, without writing
    pub fn rendered(&self) -> InfraResult<Vec<RenderedStack>> {
        self.stacks
            .iter()
            .map(|stack| {
                let body = stack.template().to_json()?;
                let hash = ContentHash::from_bytes(body.as_bytes());
                Ok(RenderedStack {
                    name: stack.name().to_string(),
                    body,
                    hash,
                })
            })
            .collect()
    }

    /// Write templates and manifest into `dir`, creating it if needed
    pub fn synth_to_dir(&self, dir: &Path) -> InfraResult<Manifest> {
        fs::create_dir_all(dir)?;

        let mut entries = BTreeMap::new();
        for stack in &self.stacks {
            let body = stack.template().to_json()?;
            let hash = ContentHash::from_bytes(body.as_bytes());
            let file_name = format!("{}.template.json", stack.name());
            write_atomic(&dir.join(&file_name), body.as_bytes())?;

            entries.insert(
                stack.name().to_string(),
                ManifestStack {
                    template: file_name,
                    hash,
                    outputs: stack.outputs().map(|(name, _)| name.clone()).collect(),
                },
            );
        }

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            synthesized_at: Utc::now(),
            stacks: entries,
        };
        let mut body = serde_json::to_string_pretty(&manifest)?;
        body.push('\n');
        write_atomic(&dir.join(MANIFEST_FILE), body.as_bytes())?;

        Ok(manifest)
    }
}

/// One stack rendered to its template body
#[derive(Debug, Clone)]
pub struct RenderedStack {
    pub name: String,
    pub body: String,
    pub hash: ContentHash,
}

/// Assembly manifest: what the last synthesis produced
///
/// The timestamp is informational only; change detection compares template
/// hashes, so re-synthesizing unchanged configuration reports no changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub tool_version: String,
    pub synthesized_at: DateTime<Utc>,
    pub stacks: BTreeMap<String, ManifestStack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStack {
    pub template: String,
    pub hash: ContentHash,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl Manifest {
    /// Load the manifest from a previously synthesized output directory
    pub fn load(dir: &Path) -> InfraResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(InfraError::AssemblyNotFound {
                dir: dir.to_path_buf(),
            });
        }
        let body = fs::read_to_string(&path)?;
        serde_json::from_str(&body).map_err(|e| InfraError::CorruptedManifest {
            file: path,
            message: e.to_string(),
        })
    }

    /// Read a stack's template body from the output directory
    pub fn read_template(&self, dir: &Path, stack: &str) -> InfraResult<Option<String>> {
        match self.stacks.get(stack) {
            Some(entry) => {
                let path: PathBuf = dir.join(&entry.template);
                Ok(Some(fs::read_to_string(path)?))
            }
            None => Ok(None),
        }
    }
}

/// Write content to a file atomically via tempfile + rename
fn write_atomic(path: &Path, content: &[u8]) -> InfraResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::stack::{Resource, StackEnv};
    use tempfile::tempdir;

    fn env() -> StackEnv {
        StackEnv {
            account: "123456789012".to_string(),
            region: "ap-southeast-2".to_string(),
        }
    }

    fn one_stack_assembly() -> Assembly {
        let mut stack = Stack::new("TestStack", &env());
        stack
            .add("Bucket", Resource::new("AWS::S3::Bucket"))
            .unwrap();
        let mut assembly = Assembly::new();
        assembly.push(stack);
        assembly
    }

    #[test]
    fn synth_writes_template_and_manifest() {
        let dir = tempdir().unwrap();
        let manifest = one_stack_assembly().synth_to_dir(dir.path()).unwrap();

        assert!(dir.path().join("TestStack.template.json").exists());
        assert!(dir.path().join(MANIFEST_FILE).exists());
        assert_eq!(manifest.stacks.len(), 1);
        assert!(manifest.stacks["TestStack"]
            .hash
            .as_str()
            .starts_with("sha256:"));
    }

    #[test]
    fn resynthesis_produces_identical_hashes() {
        let dir = tempdir().unwrap();
        let first = one_stack_assembly().synth_to_dir(dir.path()).unwrap();
        let second = one_stack_assembly().synth_to_dir(dir.path()).unwrap();
        assert!(first.stacks["TestStack"]
            .hash
            .matches(&second.stacks["TestStack"].hash));
    }

    #[test]
    fn load_missing_manifest_errors() {
        let dir = tempdir().unwrap();
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no synthesized assembly"));
    }
}
