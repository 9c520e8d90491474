//! Synthesis-time environment
//!
//! The compute stack bakes a handful of operator-supplied values into its
//! container definition. They are read once at composition time through this
//! seam so the composition stays testable without touching process state.
//! A missing required variable halts composition immediately.

use std::collections::BTreeMap;

use crate::error::{InfraError, InfraResult};

/// Application secret key, required by the compute stack
pub const SECRET_KEY_BASE: &str = "SECRET_KEY_BASE";
/// Chat platform OAuth client id
pub const SLACK_CLIENT_ID: &str = "SLACK_CLIENT_ID";
/// Chat platform OAuth client secret
pub const SLACK_CLIENT_SECRET: &str = "SLACK_CLIENT_SECRET";
/// Signing public key for the second chat platform
pub const DISCORD_PUBLIC_KEY: &str = "DISCORD_PUBLIC_KEY";
/// SMTP username, required only when no notification stack provides one
pub const SMTP_USERNAME: &str = "SMTP_USERNAME";
/// SMTP password, required only when no notification stack provides one
pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";

/// Environment variable lookup for composition
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    /// Capture the process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit pairs (tests, tooling)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up a required variable, naming the consumer on failure
    pub fn require(&self, name: &str, consumer: &str) -> InfraResult<&str> {
        self.get(name).ok_or_else(|| InfraError::MissingEnvVar {
            name: name.to_string(),
            consumer: consumer.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_consumer() {
        let env = EnvVars::from_pairs([(SECRET_KEY_BASE, "s3cret")]);
        assert_eq!(env.require(SECRET_KEY_BASE, "compute stack").unwrap(), "s3cret");

        let err = env.require(SLACK_CLIENT_ID, "compute stack").unwrap_err();
        assert!(err.to_string().contains("SLACK_CLIENT_ID"));
        assert!(err.to_string().contains("compute stack"));
    }
}
