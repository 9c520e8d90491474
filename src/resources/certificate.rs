//! Public TLS certificate, validated via DNS

use crate::synth::{props, Resource, Value};

/// Certificate covering a domain set, DNS-validated against a zone
///
/// Provisioning stalls provider-side if the validation records never
/// resolve; that condition is outside this crate.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub domain_names: Vec<String>,
    pub hosted_zone_id: String,
}

impl Certificate {
    pub fn render(&self) -> Resource {
        let mut names = self.domain_names.iter();
        let apex = names.next().cloned().unwrap_or_default();
        let alternatives: Vec<Value> = names.map(Value::string).collect();

        let validation_options = Value::list(self.domain_names.iter().map(|name| {
            props([
                ("DomainName", Value::string(name)),
                ("HostedZoneId", Value::string(&self.hosted_zone_id)),
            ])
        }));

        let mut resource = Resource::new("AWS::CertificateManager::Certificate")
            .with("DomainName", apex)
            .with("ValidationMethod", "DNS")
            .with("DomainValidationOptions", validation_options);
        if !alternatives.is_empty() {
            resource = resource.with("SubjectAlternativeNames", Value::List(alternatives));
        }
        resource
    }
}
