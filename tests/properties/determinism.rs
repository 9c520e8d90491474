//! Property tests for deterministic rendering.
//!
//! Hash-based change detection only works if the same configuration always
//! renders to the same bytes.

use std::path::Path;

use proptest::prelude::*;

use pingln_infra::composition::compose;
use pingln_infra::config::DeployConfig;
use pingln_infra::env::EnvVars;

fn synth_env() -> EnvVars {
    EnvVars::from_pairs([
        ("SECRET_KEY_BASE", "key"),
        ("SLACK_CLIENT_ID", "id"),
        ("SLACK_CLIENT_SECRET", "secret"),
        ("DISCORD_PUBLIC_KEY", "pubkey"),
        ("SMTP_USERNAME", "user"),
        ("SMTP_PASSWORD", "pass"),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: composing the same configuration twice yields byte-identical
    /// templates and therefore identical content hashes.
    #[test]
    fn property_same_config_renders_same_bytes(
        container_port in 1u16..,
        desired in 1u32..=4,
        extra in 0u32..=4,
        database_name in "[a-z][a-z0-9_]{0,19}",
    ) {
        let toml = format!(
            r#"
account = "692859939927"
region = "ap-southeast-2"

[service]
container_port = {container_port}
database_name = "{database_name}"
desired_count = {desired}
min_count = {desired}
max_count = {max}
"#,
            max = desired + extra,
        );
        let (config, _) = DeployConfig::parse(&toml, Path::new("pingln.toml"))
            .expect("generated config is valid");

        let first = compose(&config, &synth_env()).expect("compose");
        let second = compose(&config, &synth_env()).expect("compose");

        let first = first.rendered().expect("render");
        let second = second.rendered().expect("render");
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.name, &b.name);
            prop_assert_eq!(&a.body, &b.body);
            prop_assert!(a.hash.matches(&b.hash));
        }
    }
}
