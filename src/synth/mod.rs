//! Synthesis core
//!
//! The declarative toolkit under the stack definitions: template values and
//! intrinsics, stacks and logical ids, deterministic template rendering,
//! assemblies with hash-carrying manifests, and the diff engine.

pub mod assembly;
pub mod differ;
pub mod hash;
pub mod stack;
pub mod template;
pub mod value;

pub use assembly::{Assembly, Manifest, RenderedStack, MANIFEST_FILE};
pub use differ::{diff_against_dir, DiffReport, StackDiff, StackStatus};
pub use hash::ContentHash;
pub use stack::{LogicalId, Output, Resource, Stack, StackEnv};
pub use template::Template;
pub use value::{props, ExportName, Value};
