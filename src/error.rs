//! Error types for pingln-infra
//!
//! Uses `thiserror` for library errors. All of these are synthesis-time
//! failures: once templates are written, provisioning errors belong to the
//! provider, not to this crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for synthesis operations
pub type InfraResult<T> = Result<T, InfraError>;

/// Main error type for synthesis operations
#[derive(Error, Debug)]
pub enum InfraError {
    /// A required environment variable was absent at composition time
    #[error("missing required environment variable '{name}' (needed by {consumer})")]
    MissingEnvVar { name: String, consumer: String },

    /// Two resources in the same stack claimed the same logical id
    #[error("duplicate logical id '{id}' in stack '{stack}'")]
    DuplicateLogicalId { id: String, stack: String },

    /// Two outputs in the same stack claimed the same name
    #[error("duplicate output '{name}' in stack '{stack}'")]
    DuplicateOutput { name: String, stack: String },

    /// A logical id contained characters outside [A-Za-z0-9]
    #[error("invalid logical id '{id}': must be non-empty alphanumeric")]
    InvalidLogicalId { id: String },

    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Config file not found
    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Domain section present but the domain set was empty
    #[error("domain set for '{purpose}' is empty - at least one name is required")]
    EmptyDomainSet { purpose: String },

    /// A previously synthesized assembly was expected but absent
    #[error("no synthesized assembly found in {dir} - run 'synth' first")]
    AssemblyNotFound { dir: PathBuf },

    /// Assembly manifest could not be parsed
    #[error("corrupted assembly manifest in {file}: {message}")]
    CorruptedManifest { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
