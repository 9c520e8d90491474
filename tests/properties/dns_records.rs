//! Property tests for DNS record fan-out.

use std::collections::BTreeSet;

use proptest::prelude::*;

use pingln_infra::resources::{DistributionHandle, HostedZoneHandle};
use pingln_infra::stacks::{DnsPair, DnsStack};
use pingln_infra::synth::{StackEnv, Value};

fn unique_labels() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z][a-z0-9]{0,11}", 1..=6)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a domain set of n distinct labels produces exactly n alias
    /// records, each an A record named after its domain.
    #[test]
    fn property_one_alias_record_per_domain_name(labels in unique_labels()) {
        let domain_names: Vec<String> = labels
            .iter()
            .map(|label| format!("{label}.pingln.com"))
            .collect();
        let env = StackEnv {
            account: "692859939927".to_string(),
            region: "ap-southeast-2".to_string(),
        };
        let zone = HostedZoneHandle {
            zone_id: "Z0123456789ABC".to_string(),
            zone_name: "pingln.com".to_string(),
        };
        let distribution = DistributionHandle {
            id: Value::string("DISTID"),
            domain_name: Value::string("d111111abcdef8.cloudfront.net"),
        };

        let dns = DnsStack::new(
            "PinglnDnsStack",
            &env,
            &zone,
            &[DnsPair {
                domain_names: &domain_names,
                distribution: &distribution,
            }],
        )
        .expect("distinct labels never collide");

        prop_assert_eq!(dns.stack.resource_count(), domain_names.len());

        for (_, resource) in dns.stack.resources() {
            prop_assert_eq!(resource.resource_type.as_str(), "AWS::Route53::RecordSet");
        }

        let record_names: BTreeSet<String> = dns
            .stack
            .resources()
            .filter_map(|(_, resource)| {
                resource
                    .property("Name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect();
        let expected: BTreeSet<String> = domain_names.iter().cloned().collect();
        prop_assert_eq!(record_names, expected);
    }
}
