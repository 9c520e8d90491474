//! Static-site stack: object store, aggressively cached distribution,
//! asset deployment
//!
//! The opposite caching posture to the dynamic CDN stack: assets are
//! immutable between deploys, so the distribution uses the provider's
//! caching-optimized policy and every deploy invalidates the edge cache.

use std::path::Path;

use crate::error::InfraResult;
use crate::resources::cdn::{
    Behavior, Distribution, ErrorResponse, Origin, CACHING_OPTIMIZED_POLICY_ID,
};
use crate::resources::storage::{AssetDeployment, PublicReadPolicy, WebsiteBucket};
use crate::resources::{BucketHandle, CertificateHandle, DistributionHandle};
use crate::synth::{Stack, StackEnv, Value};

const ENTRY_FILE: &str = "index.html";
const ERROR_TTL_SECS: u32 = 1800;

pub struct StaticSiteStack {
    pub stack: Stack,
    pub distribution: DistributionHandle,
    pub bucket: BucketHandle,
}

impl StaticSiteStack {
    pub fn new(
        name: &str,
        env: &StackEnv,
        certificate: &CertificateHandle,
        domain_names: &[String],
        asset_source: &Path,
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let apex = domain_names.first().map(String::as_str).unwrap_or("site");
        let bucket_id = stack.add(
            "WebsiteBucket",
            WebsiteBucket::for_domain(apex, ENTRY_FILE).render(),
        )?;

        stack.add(
            "WebsiteBucketPolicy",
            PublicReadPolicy {
                bucket: Value::Ref(bucket_id.clone()),
            }
            .render(),
        )?;

        // Client-side router handles every path: both 403 and 404 from the
        // origin become 200 with the entry file
        let error_responses = [403u16, 404]
            .into_iter()
            .map(|code| ErrorResponse {
                error_code: code,
                response_code: 200,
                response_page_path: format!("/{ENTRY_FILE}"),
                ttl_secs: ERROR_TTL_SECS,
            })
            .collect();

        let distribution_id = stack.add(
            "Distribution",
            Distribution {
                comment: format!("Distribution for {apex}"),
                domain_names: domain_names.to_vec(),
                certificate: Some(certificate.arn.clone()),
                origin: Origin::BucketWebsite {
                    domain_name: Value::get_att(&bucket_id, "WebsiteURL"),
                },
                behavior: Behavior::get_head_cached(Value::string(
                    CACHING_OPTIMIZED_POLICY_ID,
                )),
                default_root_object: Some(ENTRY_FILE.to_string()),
                error_responses,
            }
            .render(),
        )?;

        stack.add(
            "DeployWebsite",
            AssetDeployment {
                source: asset_source.to_path_buf(),
                bucket: Value::Ref(bucket_id.clone()),
                distribution: Value::Ref(distribution_id.clone()),
                invalidation_paths: vec!["/*".to_string()],
            }
            .render(),
        )?;

        let domain_name = stack.export(
            "SiteDistributionDomainName",
            Value::get_att(&distribution_id, "DomainName"),
        )?;
        let id = stack.export("SiteDistributionId", Value::Ref(distribution_id))?;
        let bucket_name = stack.export("SiteBucketName", Value::Ref(bucket_id.clone()))?;
        let website_domain = stack.export(
            "SiteBucketWebsiteUrl",
            Value::get_att(&bucket_id, "WebsiteURL"),
        )?;

        Ok(Self {
            stack,
            distribution: DistributionHandle { id, domain_name },
            bucket: BucketHandle {
                name: bucket_name,
                website_domain,
            },
        })
    }
}
