//! pingln-infra - declarative infrastructure for the pingln web app
//!
//! The deployment is described as typed stacks (container registry, TLS
//! certificate, messaging policy, email identity, compute, CDN, static site,
//! DNS) that render to deterministic provisioning templates. Re-synthesizing
//! an unchanged configuration produces byte-identical templates, so the diff
//! command can prove idempotence by content hash alone.

pub mod cli;
pub mod composition;
pub mod config;
pub mod env;
pub mod error;
pub mod presentation;
pub mod resources;
pub mod stacks;
pub mod synth;

// Re-exports for convenience
pub use composition::compose;
pub use config::{ConfigWarning, DeployConfig, CONFIG_FILE};
pub use env::EnvVars;
pub use error::{InfraError, InfraResult};
pub use synth::{
    diff_against_dir, Assembly, ContentHash, LogicalId, Manifest, Resource, Stack, StackEnv,
    Template, Value,
};
