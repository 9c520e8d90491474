//! Content-delivery stack for the dynamic application origin
//!
//! The distribution is a TLS-terminating, compressing passthrough: the cache
//! policy keeps TTLs near zero and the origin-request policy forwards all
//! headers, cookies and query strings unmodified.

use crate::error::InfraResult;
use crate::resources::cdn::{Behavior, CachePolicy, Distribution, Origin, OriginRequestPolicy};
use crate::resources::{CertificateHandle, DistributionHandle, LoadBalancerHandle};
use crate::synth::{Stack, StackEnv, Value};

pub struct CdnStack {
    pub stack: Stack,
    pub distribution: DistributionHandle,
}

impl CdnStack {
    pub fn new(
        name: &str,
        env: &StackEnv,
        load_balancer: &LoadBalancerHandle,
        certificate: &CertificateHandle,
        domain_names: &[String],
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let origin_policy_id = stack.add(
            "AppOriginRequestPolicy",
            OriginRequestPolicy::forward_all(
                "AppOriginRequestPolicy",
                "Forward all headers, cookies, and query strings to the app",
            )
            .render(),
        )?;

        let cache_policy_id = stack.add(
            "NoCachePolicy",
            CachePolicy::no_cache("AppNoCachePolicy").render(),
        )?;

        let distribution_id = stack.add(
            "Distribution",
            Distribution {
                comment: "Application distribution".to_string(),
                domain_names: domain_names.to_vec(),
                certificate: Some(certificate.arn.clone()),
                origin: Origin::LoadBalancer {
                    domain_name: load_balancer.dns_name.clone(),
                    http_port: 80,
                },
                behavior: Behavior::all_methods(
                    Value::Ref(cache_policy_id),
                    Value::Ref(origin_policy_id),
                ),
                default_root_object: None,
                error_responses: vec![],
            }
            .render(),
        )?;

        stack.add_output(
            "DistributionId",
            Value::Ref(distribution_id.clone()),
            "Edge distribution id",
        )?;
        let domain_name = stack.export(
            "DistributionDomainName",
            Value::get_att(&distribution_id, "DomainName"),
        )?;
        let id = stack.export("DistributionIdExport", Value::Ref(distribution_id))?;

        Ok(Self {
            stack,
            distribution: DistributionHandle { id, domain_name },
        })
    }
}
