//! DNS records in a managed zone

use crate::synth::{props, Resource, Value};

/// Fixed zone id alias targets use when pointing at an edge distribution
pub const DISTRIBUTION_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Derive the record label: the text before the first separator
pub fn record_label(domain_name: &str) -> &str {
    domain_name.split('.').next().unwrap_or(domain_name)
}

/// Alias record pointing a name at a distribution endpoint
#[derive(Debug, Clone)]
pub struct AliasRecord {
    pub zone_id: String,
    pub record_name: String,
    pub target_domain_name: Value,
}

impl AliasRecord {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::Route53::RecordSet")
            .with("HostedZoneId", self.zone_id.as_str())
            .with("Name", self.record_name.as_str())
            .with("Type", "A")
            .with(
                "AliasTarget",
                props([
                    ("DNSName", self.target_domain_name.clone()),
                    (
                        "HostedZoneId",
                        Value::string(DISTRIBUTION_HOSTED_ZONE_ID),
                    ),
                ]),
            )
    }
}

/// TXT record, e.g. sending-domain verification
#[derive(Debug, Clone)]
pub struct TxtRecord {
    pub zone_id: String,
    pub record_name: String,
    pub values: Vec<Value>,
    pub ttl_secs: u32,
}

impl TxtRecord {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::Route53::RecordSet")
            .with("HostedZoneId", self.zone_id.as_str())
            .with("Name", self.record_name.as_str())
            .with("Type", "TXT")
            .with("TTL", self.ttl_secs.to_string())
            .with("ResourceRecords", Value::List(self.values.clone()))
    }
}

/// CNAME record, e.g. message-signing keys
#[derive(Debug, Clone)]
pub struct CnameRecord {
    pub zone_id: String,
    pub record_name: Value,
    pub value: Value,
    pub ttl_secs: u32,
}

impl CnameRecord {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::Route53::RecordSet")
            .with("HostedZoneId", self.zone_id.as_str())
            .with("Name", self.record_name.clone())
            .with("Type", "CNAME")
            .with("TTL", self.ttl_secs.to_string())
            .with("ResourceRecords", Value::list([self.value.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_text_before_first_separator() {
        assert_eq!(record_label("app.pingln.com"), "app");
        assert_eq!(record_label("www.pingln.com"), "www");
        assert_eq!(record_label("pingln.com"), "pingln");
        assert_eq!(record_label("nodots"), "nodots");
    }

    #[test]
    fn alias_record_targets_distribution_zone() {
        let record = AliasRecord {
            zone_id: "Z0123456789ABC".to_string(),
            record_name: "app.pingln.com".to_string(),
            target_domain_name: Value::string("d111111abcdef8.cloudfront.net"),
        };
        let json = serde_json::to_string(&record.render()).unwrap();
        assert!(json.contains("\"Type\":\"A\""));
        assert!(json.contains(DISTRIBUTION_HOSTED_ZONE_ID));
        assert!(json.contains("d111111abcdef8.cloudfront.net"));
    }
}
