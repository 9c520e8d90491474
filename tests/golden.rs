//! Golden tests for template rendering.
//!
//! Small hand-checkable stacks pinned as inline snapshots, so any change to
//! the serialization shape (key order, intrinsic forms, pretty-printing)
//! shows up as a readable diff.

use insta::assert_snapshot;

use pingln_infra::resources::{DistributionHandle, HostedZoneHandle};
use pingln_infra::stacks::{DnsPair, DnsStack, RegistryStack};
use pingln_infra::synth::{StackEnv, Value};

fn env() -> StackEnv {
    StackEnv {
        account: "692859939927".to_string(),
        region: "ap-southeast-2".to_string(),
    }
}

#[test]
fn golden_registry_template() {
    let registry = RegistryStack::new("PinglnRepoStack", &env(), "pingln-web").unwrap();
    let json = registry.stack.template().to_json().unwrap();
    assert_snapshot!(json, @r#"
{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Resources": {},
  "Outputs": {
    "RepositoryUri": {
      "Value": "692859939927.dkr.ecr.ap-southeast-2.amazonaws.com/pingln-web:latest",
      "Description": "Image reference the compute stack deploys"
    }
  }
}
"#);
}

#[test]
fn golden_alias_record_template() {
    let zone = HostedZoneHandle {
        zone_id: "Z0123456789ABC".to_string(),
        zone_name: "pingln.com".to_string(),
    };
    let distribution = DistributionHandle {
        id: Value::string("DISTID"),
        domain_name: Value::string("d111111abcdef8.cloudfront.net"),
    };
    let names = vec!["app.pingln.com".to_string()];
    let dns = DnsStack::new(
        "PinglnDnsStack",
        &env(),
        &zone,
        &[DnsPair {
            domain_names: &names,
            distribution: &distribution,
        }],
    )
    .unwrap();

    let json = dns.stack.template().to_json().unwrap();
    assert_snapshot!(json, @r#"
{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Resources": {
    "AppApexAliasRecord": {
      "Type": "AWS::Route53::RecordSet",
      "Properties": {
        "AliasTarget": {
          "DNSName": "d111111abcdef8.cloudfront.net",
          "HostedZoneId": "Z2FDTNDATAQYW2"
        },
        "HostedZoneId": "Z0123456789ABC",
        "Name": "app.pingln.com",
        "Type": "A"
      }
    }
  }
}
"#);
}
