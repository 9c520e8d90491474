//! End-to-end composition tests.
//!
//! These exercise the full config -> compose -> render pipeline and pin the
//! cross-stack wiring: certificate coverage, alias record fan-out, cache
//! policy assignment, and the secret handling of the compute stack.

use std::path::Path;

use serde_json::Value as Json;

use pingln_infra::composition::{compose, names};
use pingln_infra::config::DeployConfig;
use pingln_infra::env::EnvVars;
use pingln_infra::synth::Assembly;

mod common;

fn synth_env() -> EnvVars {
    EnvVars::from_pairs(common::synth_env())
}

fn assemble(config: &str) -> Assembly {
    let (config, warnings) = DeployConfig::parse(config, Path::new("pingln.toml")).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    compose(&config, &synth_env()).unwrap()
}

fn template_json(assembly: &Assembly, stack: &str) -> Json {
    let rendered = assembly
        .stack(stack)
        .unwrap_or_else(|| panic!("stack {stack} missing"))
        .template()
        .to_json()
        .unwrap();
    serde_json::from_str(&rendered).unwrap()
}

#[test]
fn certificate_covers_every_configured_domain_name() {
    let assembly = assemble(common::FULL_CONFIG);
    let template = template_json(&assembly, names::CERTIFICATE);
    let cert = &template["Resources"]["Certificate"]["Properties"];

    // app names come first, the rest ride as alternative names
    assert_eq!(cert["DomainName"], "app.pingln.com");
    assert_eq!(
        cert["SubjectAlternativeNames"],
        serde_json::json!(["pingln.com", "www.pingln.com"])
    );
    assert_eq!(cert["ValidationMethod"], "DNS");
}

#[test]
fn app_distribution_is_aliased_to_app_domains_only() {
    let assembly = assemble(common::FULL_CONFIG);
    let template = template_json(&assembly, names::CDN);
    let distribution = &template["Resources"]["Distribution"]["Properties"]["DistributionConfig"];

    assert_eq!(distribution["Aliases"], serde_json::json!(["app.pingln.com"]));
}

#[test]
fn cache_policies_are_never_swapped_between_distributions() {
    let assembly = assemble(common::FULL_CONFIG);

    let app = template_json(&assembly, names::CDN);
    let app_behavior =
        &app["Resources"]["Distribution"]["Properties"]["DistributionConfig"]["DefaultCacheBehavior"];
    // dynamic distribution references its own near-zero-TTL policy
    assert_eq!(
        app_behavior["CachePolicyId"],
        serde_json::json!({ "Ref": "NoCachePolicy" })
    );

    let site = template_json(&assembly, names::STATIC_SITE);
    let site_behavior =
        &site["Resources"]["Distribution"]["Properties"]["DistributionConfig"]["DefaultCacheBehavior"];
    // static distribution pins the managed caching-optimized policy
    assert_eq!(
        site_behavior["CachePolicyId"],
        "658327ea-f89d-4fab-a63d-7e88639e58f6"
    );
}

#[test]
fn dns_stack_has_exactly_one_alias_record_per_domain_name() {
    let assembly = assemble(common::FULL_CONFIG);
    let template = template_json(&assembly, names::DNS);
    let resources = template["Resources"].as_object().unwrap();

    assert_eq!(resources.len(), 3);
    assert!(resources.contains_key("AppApexAliasRecord"));
    assert!(resources.contains_key("PinglnApexAliasRecord"));
    assert!(resources.contains_key("WwwAliasRecord"));

    // app record targets the dynamic distribution, site records the static one
    let app_target = &resources["AppApexAliasRecord"]["Properties"]["AliasTarget"]["DNSName"];
    let www_target = &resources["WwwAliasRecord"]["Properties"]["AliasTarget"]["DNSName"];
    assert!(app_target.to_string().contains("PinglnCdnStack"));
    assert!(www_target.to_string().contains("PinglnSiteStack"));
}

#[test]
fn no_domains_composes_registry_and_compute_only() {
    let assembly = assemble(common::MINIMAL_CONFIG);
    assert_eq!(assembly.stack_names(), vec![names::REGISTRY, names::COMPUTE]);

    // the raw load-balancer endpoint is the only exported entry point
    let compute = assembly.stack(names::COMPUTE).unwrap();
    let exports: Vec<&String> = compute
        .outputs()
        .filter(|(_, output)| output.export.is_some())
        .map(|(name, _)| name)
        .collect();
    assert_eq!(exports, vec!["LoadBalancerDns"]);
}

#[test]
fn database_credentials_never_appear_as_plaintext_environment() {
    let assembly = assemble(common::FULL_CONFIG);
    let template = template_json(&assembly, names::COMPUTE);
    let containers = &template["Resources"]["TaskDefinition"]["Properties"]["ContainerDefinitions"];
    let container = &containers[0];

    let environment_names: Vec<&str> = container["Environment"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["Name"].as_str().unwrap())
        .collect();
    assert!(!environment_names.contains(&"DB_USERNAME"));
    assert!(!environment_names.contains(&"DB_PASSWORD"));

    let secret_names: Vec<&str> = container["Secrets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["Name"].as_str().unwrap())
        .collect();
    assert!(secret_names.contains(&"DB_USERNAME"));
    assert!(secret_names.contains(&"DB_PASSWORD"));
}

#[test]
fn templates_never_leak_synthesized_secret_values() {
    let assembly = assemble(common::FULL_CONFIG);
    for rendered in assembly.rendered().unwrap() {
        assert!(
            !rendered.body.contains("test-smtp-pass"),
            "SMTP password leaked into {}",
            rendered.name
        );
    }
}

#[test]
fn missing_required_env_var_halts_composition() {
    let (config, _) =
        DeployConfig::parse(common::MINIMAL_CONFIG, Path::new("pingln.toml")).unwrap();
    let incomplete = EnvVars::from_pairs([("SECRET_KEY_BASE", "key")]);
    let err = compose(&config, &incomplete).unwrap_err();
    assert!(err.to_string().contains("SLACK_CLIENT_ID"));
}
