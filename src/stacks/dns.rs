//! DNS stack: alias records pointing domain names at distributions
//!
//! One record per name in every (domain set, distribution) pair. The first
//! name of a pair is treated as its apex. Overlapping names across pairs
//! are not validated here.

use crate::error::InfraResult;
use crate::resources::dns::{record_label, AliasRecord};
use crate::resources::{DistributionHandle, HostedZoneHandle};
use crate::synth::{LogicalId, Stack, StackEnv};

/// A domain set routed to one distribution
pub struct DnsPair<'a> {
    pub domain_names: &'a [String],
    pub distribution: &'a DistributionHandle,
}

pub struct DnsStack {
    pub stack: Stack,
}

impl DnsStack {
    pub fn new(
        name: &str,
        env: &StackEnv,
        hosted_zone: &HostedZoneHandle,
        pairs: &[DnsPair<'_>],
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        for pair in pairs {
            let mut names = pair.domain_names.iter();

            if let Some(apex) = names.next() {
                let id = LogicalId::from_label(record_label(apex), "ApexAliasRecord")?;
                stack.add_with_id(
                    id,
                    AliasRecord {
                        zone_id: hosted_zone.zone_id.clone(),
                        record_name: apex.clone(),
                        target_domain_name: pair.distribution.domain_name.clone(),
                    }
                    .render(),
                )?;
            }

            for domain_name in names {
                let id = LogicalId::from_label(record_label(domain_name), "AliasRecord")?;
                stack.add_with_id(
                    id,
                    AliasRecord {
                        zone_id: hosted_zone.zone_id.clone(),
                        record_name: domain_name.clone(),
                        target_domain_name: pair.distribution.domain_name.clone(),
                    }
                    .render(),
                )?;
            }
        }

        Ok(Self { stack })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Value;

    fn env() -> StackEnv {
        StackEnv {
            account: "692859939927".to_string(),
            region: "ap-southeast-2".to_string(),
        }
    }

    fn zone() -> HostedZoneHandle {
        HostedZoneHandle {
            zone_id: "Z0123456789ABC".to_string(),
            zone_name: "pingln.com".to_string(),
        }
    }

    fn distribution(domain: &str) -> DistributionHandle {
        DistributionHandle {
            id: Value::string("DISTID"),
            domain_name: Value::string(domain),
        }
    }

    #[test]
    fn one_record_per_domain_name() {
        let names = vec![
            "pingln.com".to_string(),
            "www.pingln.com".to_string(),
            "app.pingln.com".to_string(),
        ];
        let dist = distribution("d1.cloudfront.net");
        let dns = DnsStack::new(
            "PinglnDnsStack",
            &env(),
            &zone(),
            &[DnsPair {
                domain_names: &names,
                distribution: &dist,
            }],
        )
        .unwrap();

        assert_eq!(dns.stack.resource_count(), 3);
        assert!(dns.stack.resource("PinglnApexAliasRecord").is_some());
        assert!(dns.stack.resource("WwwAliasRecord").is_some());
        assert!(dns.stack.resource("AppAliasRecord").is_some());
    }

    #[test]
    fn records_target_their_paired_distribution() {
        let app_names = vec!["app.pingln.com".to_string()];
        let site_names = vec!["pingln.com".to_string(), "www.pingln.com".to_string()];
        let app_dist = distribution("app-dist.cloudfront.net");
        let site_dist = distribution("site-dist.cloudfront.net");

        let dns = DnsStack::new(
            "PinglnDnsStack",
            &env(),
            &zone(),
            &[
                DnsPair {
                    domain_names: &app_names,
                    distribution: &app_dist,
                },
                DnsPair {
                    domain_names: &site_names,
                    distribution: &site_dist,
                },
            ],
        )
        .unwrap();

        let app_record =
            serde_json::to_string(dns.stack.resource("AppApexAliasRecord").unwrap()).unwrap();
        assert!(app_record.contains("app-dist.cloudfront.net"));

        let www_record =
            serde_json::to_string(dns.stack.resource("WwwAliasRecord").unwrap()).unwrap();
        assert!(www_record.contains("site-dist.cloudfront.net"));
    }
}
