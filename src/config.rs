//! Deployment configuration
//!
//! Loaded from `pingln.toml`. The config is the operator-facing surface of
//! the composition: target account/region, service sizing, and the optional
//! domain/email sections that decide which stacks get instantiated at all.
//! Unknown keys are collected as warnings rather than rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InfraError, InfraResult};

/// Default config file name
pub const CONFIG_FILE: &str = "pingln.toml";

/// Full deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Target account id
    pub account: String,

    /// Target region
    pub region: String,

    #[serde(default)]
    pub service: ServiceConfig,

    /// Custom-domain section; when absent the composition falls back to the
    /// raw load-balancer endpoint and skips certificate/CDN/DNS entirely
    #[serde(default)]
    pub domains: Option<DomainsConfig>,

    /// Transactional email section; when absent no notification stack is
    /// composed and SMTP credentials come from process env
    #[serde(default)]
    pub email: Option<EmailConfig>,

    /// Messaging section; when absent no messaging policy stack is composed
    #[serde(default)]
    pub messaging: Option<MessagingConfig>,

    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Container service sizing and wiring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the existing image repository holding the app image
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Port the application container listens on
    #[serde(default = "default_container_port")]
    pub container_port: u16,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_desired_count")]
    pub desired_count: u32,

    #[serde(default = "default_min_count")]
    pub min_count: u32,

    #[serde(default = "default_max_count")]
    pub max_count: u32,

    /// CPU utilization percentage that triggers a scale event
    #[serde(default = "default_cpu_target")]
    pub cpu_target_percent: u32,

    /// Memory utilization percentage that triggers a scale event
    #[serde(default = "default_memory_target")]
    pub memory_target_percent: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            container_port: default_container_port(),
            database_name: default_database_name(),
            desired_count: default_desired_count(),
            min_count: default_min_count(),
            max_count: default_max_count(),
            cpu_target_percent: default_cpu_target(),
            memory_target_percent: default_memory_target(),
        }
    }
}

fn default_repository() -> String {
    "pingln-web".to_string()
}

fn default_container_port() -> u16 {
    3000
}

fn default_database_name() -> String {
    "pingln_production".to_string()
}

fn default_desired_count() -> u32 {
    1
}

fn default_min_count() -> u32 {
    1
}

fn default_max_count() -> u32 {
    3
}

fn default_cpu_target() -> u32 {
    70
}

fn default_memory_target() -> u32 {
    80
}

/// Custom domain configuration
///
/// `app` names front the dynamic application distribution; `site` names
/// front the static-site distribution. The certificate covers the union.
/// Overlap between the two sets is not validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainsConfig {
    /// Hosted zone id, looked up rather than created
    pub zone_id: String,

    /// Zone name, e.g. "pingln.com"
    pub zone_name: String,

    /// Domain names routed to the application distribution
    #[serde(default)]
    pub app: Vec<String>,

    /// Domain names routed to the static-site distribution
    #[serde(default)]
    pub site: Vec<String>,
}

impl DomainsConfig {
    /// All names, app first, deduplicated, for certificate coverage
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.app.iter().chain(self.site.iter()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Transactional email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Domain the app sends mail from
    pub sending_domain: String,
}

/// Outbound messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Provision the SMS publishing policy for the compute task
    #[serde(default = "default_sms")]
    pub sms: bool,
}

fn default_sms() -> bool {
    true
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Local directory of pre-built static assets
    #[serde(default = "default_asset_source")]
    pub source: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            source: default_asset_source(),
        }
    }
}

fn default_asset_source() -> PathBuf {
    PathBuf::from("../web/splash")
}

/// A warning produced while loading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl DeployConfig {
    /// Load and validate config from a TOML file
    ///
    /// Unknown keys are reported as warnings so typos surface without
    /// blocking synthesis.
    pub fn load(path: &Path) -> InfraResult<(Self, Vec<ConfigWarning>)> {
        if !path.exists() {
            return Err(InfraError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse config from a TOML string
    pub fn parse(content: &str, source: &Path) -> InfraResult<(Self, Vec<ConfigWarning>)> {
        let mut warnings = Vec::new();
        let de = toml::Deserializer::new(content);
        let config: DeployConfig = serde_ignored::deserialize(de, |ignored| {
            warnings.push(ConfigWarning {
                message: format!("unknown config key '{ignored}' in {}", source.display()),
            });
        })
        .map_err(|e| InfraError::InvalidConfig {
            file: source.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate(source)?;
        Ok((config, warnings))
    }

    fn validate(&self, source: &Path) -> InfraResult<()> {
        if let Some(domains) = &self.domains {
            if domains.app.is_empty() && domains.site.is_empty() {
                return Err(InfraError::EmptyDomainSet {
                    purpose: "domains".to_string(),
                });
            }
        }
        if self.service.min_count > self.service.max_count {
            return Err(InfraError::InvalidConfig {
                file: source.to_path_buf(),
                message: format!(
                    "service.min_count ({}) exceeds service.max_count ({})",
                    self.service.min_count, self.service.max_count
                ),
            });
        }
        Ok(())
    }
}
