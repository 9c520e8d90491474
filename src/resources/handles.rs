//! Cross-stack handles
//!
//! A handle is the only thing that crosses a stack boundary: a typed wrapper
//! over a producing stack's exported value (or, for looked-up resources, the
//! operator-supplied identifier). Handles carry references, never the
//! underlying material; lifecycle ownership stays with the producing stack.

use crate::synth::Value;

/// Reference to an existing container image repository, looked up by name
#[derive(Debug, Clone)]
pub struct RepositoryHandle {
    pub repository_name: String,
    pub account: String,
    pub region: String,
}

impl RepositoryHandle {
    /// Image reference the container service pulls
    pub fn image_uri(&self) -> String {
        format!(
            "{}.dkr.ecr.{}.amazonaws.com/{}:latest",
            self.account, self.region, self.repository_name
        )
    }
}

/// Reference to a managed DNS zone, looked up rather than created
#[derive(Debug, Clone)]
pub struct HostedZoneHandle {
    pub zone_id: String,
    pub zone_name: String,
}

/// Reference to a DNS-validated TLS certificate
#[derive(Debug, Clone)]
pub struct CertificateHandle {
    pub arn: Value,
}

/// Reference to the compute stack's public entry point
#[derive(Debug, Clone)]
pub struct LoadBalancerHandle {
    pub dns_name: Value,
}

/// Reference to an edge distribution
#[derive(Debug, Clone)]
pub struct DistributionHandle {
    pub id: Value,
    pub domain_name: Value,
}

/// Reference to stored credential material
///
/// Consumers receive provider-resolved values keyed into the secret; the
/// material itself never appears in a template.
#[derive(Debug, Clone)]
pub struct SecretHandle {
    pub arn: Value,
}

impl SecretHandle {
    /// Container-injectable reference to one JSON key of the secret
    pub fn value_from(&self, key: &str) -> Value {
        Value::concat([self.arn.clone(), Value::string(format!(":{key}::"))])
    }

    /// Deploy-time resolution of one JSON key, for non-container consumers
    pub fn resolve(&self, key: &str) -> Value {
        Value::concat([
            Value::string("{{resolve:secretsmanager:"),
            self.arn.clone(),
            Value::string(format!(":SecretString:{key}}}}}")),
        ])
    }
}

/// Reference to a managed IAM policy
#[derive(Debug, Clone)]
pub struct ManagedPolicyHandle {
    pub arn: Value,
}

/// Reference to an object store bucket
#[derive(Debug, Clone)]
pub struct BucketHandle {
    pub name: Value,
    pub website_domain: Value,
}
