//! Edge distribution resources: cache policies, origin-request policies,
//! distributions

use crate::synth::{props, Resource, Value};

/// Provider-managed cache policy tuned for immutable static assets
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// Cache policy
///
/// The dynamic-origin policy keeps TTLs near zero (default 0s, max 1s) so
/// the distribution acts as a passthrough; swapping it with the static
/// policy would cache dynamic responses at the edge.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub name: String,
    pub comment: String,
    pub default_ttl_secs: u32,
    pub max_ttl_secs: u32,
    pub min_ttl_secs: u32,
    pub cookie_behavior: String,
    pub header_behavior: String,
    /// Header allow-list, only meaningful with "whitelist" behavior
    pub headers: Vec<String>,
    pub query_string_behavior: String,
}

impl CachePolicy {
    /// The passthrough policy for dynamic origins
    pub fn no_cache(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: "No caching - forward everything to the origin".to_string(),
            default_ttl_secs: 0,
            max_ttl_secs: 1,
            min_ttl_secs: 0,
            cookie_behavior: "all".to_string(),
            header_behavior: "whitelist".to_string(),
            headers: vec!["Authorization".to_string(), "Host".to_string()],
            query_string_behavior: "all".to_string(),
        }
    }

    pub fn render(&self) -> Resource {
        let mut headers_config = vec![(
            "HeaderBehavior".to_string(),
            Value::string(&self.header_behavior),
        )];
        if !self.headers.is_empty() {
            headers_config.push((
                "Headers".to_string(),
                Value::list(self.headers.iter().map(Value::string)),
            ));
        }

        Resource::new("AWS::CloudFront::CachePolicy").with(
            "CachePolicyConfig",
            props([
                ("Name", Value::string(&self.name)),
                ("Comment", Value::string(&self.comment)),
                ("DefaultTTL", Value::from(i64::from(self.default_ttl_secs))),
                ("MaxTTL", Value::from(i64::from(self.max_ttl_secs))),
                ("MinTTL", Value::from(i64::from(self.min_ttl_secs))),
                (
                    "ParametersInCacheKeyAndForwardedToOrigin",
                    props([
                        (
                            "CookiesConfig",
                            props([(
                                "CookieBehavior",
                                Value::string(&self.cookie_behavior),
                            )]),
                        ),
                        ("HeadersConfig", Value::Map(headers_config.into_iter().collect())),
                        (
                            "QueryStringsConfig",
                            props([(
                                "QueryStringBehavior",
                                Value::string(&self.query_string_behavior),
                            )]),
                        ),
                        ("EnableAcceptEncodingGzip", Value::Bool(true)),
                        ("EnableAcceptEncodingBrotli", Value::Bool(true)),
                    ]),
                ),
            ]),
        )
    }
}

/// Origin-request policy forwarding everything unmodified
#[derive(Debug, Clone)]
pub struct OriginRequestPolicy {
    pub name: String,
    pub comment: String,
}

impl OriginRequestPolicy {
    pub fn forward_all(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }

    pub fn render(&self) -> Resource {
        Resource::new("AWS::CloudFront::OriginRequestPolicy").with(
            "OriginRequestPolicyConfig",
            props([
                ("Name", Value::string(&self.name)),
                ("Comment", Value::string(&self.comment)),
                (
                    "CookiesConfig",
                    props([("CookieBehavior", Value::string("all"))]),
                ),
                (
                    "HeadersConfig",
                    props([("HeaderBehavior", Value::string("allViewer"))]),
                ),
                (
                    "QueryStringsConfig",
                    props([("QueryStringBehavior", Value::string("all"))]),
                ),
            ]),
        )
    }
}

/// What a distribution fronts
#[derive(Debug, Clone)]
pub enum Origin {
    /// A load balancer, reached over plain HTTP; TLS terminated at the edge
    LoadBalancer { domain_name: Value, http_port: u16 },
    /// A bucket's website endpoint
    BucketWebsite { domain_name: Value },
}

impl Origin {
    fn to_value(&self) -> Value {
        match self {
            Origin::LoadBalancer {
                domain_name,
                http_port,
            } => props([
                ("Id", Value::string("origin")),
                ("DomainName", domain_name.clone()),
                (
                    "CustomOriginConfig",
                    props([
                        ("OriginProtocolPolicy", Value::string("http-only")),
                        ("HTTPPort", Value::from(*http_port)),
                    ]),
                ),
            ]),
            Origin::BucketWebsite { domain_name } => props([
                ("Id", Value::string("origin")),
                ("DomainName", domain_name.clone()),
                (
                    "CustomOriginConfig",
                    props([("OriginProtocolPolicy", Value::string("http-only"))]),
                ),
            ]),
        }
    }
}

/// Maps an origin error status to a replacement response
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
    pub ttl_secs: u32,
}

/// Default behavior of a distribution
#[derive(Debug, Clone)]
pub struct Behavior {
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub cache_policy: Value,
    pub origin_request_policy: Option<Value>,
    pub compress: bool,
}

impl Behavior {
    pub fn all_methods(cache_policy: Value, origin_request_policy: Value) -> Self {
        Self {
            allowed_methods: ["GET", "HEAD", "OPTIONS", "PUT", "PATCH", "POST", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            cached_methods: vec!["GET".to_string(), "HEAD".to_string()],
            cache_policy,
            origin_request_policy: Some(origin_request_policy),
            compress: true,
        }
    }

    pub fn get_head_cached(cache_policy: Value) -> Self {
        Self {
            allowed_methods: vec!["GET".to_string(), "HEAD".to_string()],
            cached_methods: vec!["GET".to_string(), "HEAD".to_string()],
            cache_policy,
            origin_request_policy: None,
            compress: true,
        }
    }
}

/// Global edge distribution
#[derive(Debug, Clone)]
pub struct Distribution {
    pub comment: String,
    pub domain_names: Vec<String>,
    pub certificate: Option<Value>,
    pub origin: Origin,
    pub behavior: Behavior,
    pub default_root_object: Option<String>,
    pub error_responses: Vec<ErrorResponse>,
}

impl Distribution {
    pub fn render(&self) -> Resource {
        let mut behavior = vec![
            ("TargetOriginId".to_string(), Value::string("origin")),
            (
                "ViewerProtocolPolicy".to_string(),
                Value::string("redirect-to-https"),
            ),
            (
                "AllowedMethods".to_string(),
                Value::list(self.behavior.allowed_methods.iter().map(Value::string)),
            ),
            (
                "CachedMethods".to_string(),
                Value::list(self.behavior.cached_methods.iter().map(Value::string)),
            ),
            (
                "CachePolicyId".to_string(),
                self.behavior.cache_policy.clone(),
            ),
            ("Compress".to_string(), Value::Bool(self.behavior.compress)),
        ];
        if let Some(policy) = &self.behavior.origin_request_policy {
            behavior.push(("OriginRequestPolicyId".to_string(), policy.clone()));
        }

        let mut config = vec![
            ("Enabled".to_string(), Value::Bool(true)),
            ("Comment".to_string(), Value::string(&self.comment)),
            ("HttpVersion".to_string(), Value::string("http2and3")),
            ("PriceClass".to_string(), Value::string("PriceClass_100")),
            (
                "Origins".to_string(),
                Value::list([self.origin.to_value()]),
            ),
            (
                "DefaultCacheBehavior".to_string(),
                Value::Map(behavior.into_iter().collect()),
            ),
        ];

        if !self.domain_names.is_empty() {
            config.push((
                "Aliases".to_string(),
                Value::list(self.domain_names.iter().map(Value::string)),
            ));
        }
        if let Some(certificate) = &self.certificate {
            config.push((
                "ViewerCertificate".to_string(),
                props([
                    ("AcmCertificateArn", certificate.clone()),
                    ("SslSupportMethod", Value::string("sni-only")),
                    (
                        "MinimumProtocolVersion",
                        Value::string("TLSv1.2_2021"),
                    ),
                ]),
            ));
        }
        if let Some(root) = &self.default_root_object {
            config.push(("DefaultRootObject".to_string(), Value::string(root)));
        }
        if !self.error_responses.is_empty() {
            config.push((
                "CustomErrorResponses".to_string(),
                Value::list(self.error_responses.iter().map(|e| {
                    props([
                        ("ErrorCode", Value::from(e.error_code)),
                        ("ResponseCode", Value::from(e.response_code)),
                        (
                            "ResponsePagePath",
                            Value::string(&e.response_page_path),
                        ),
                        (
                            "ErrorCachingMinTTL",
                            Value::from(i64::from(e.ttl_secs)),
                        ),
                    ])
                })),
            ));
        }

        Resource::new("AWS::CloudFront::Distribution").with(
            "DistributionConfig",
            Value::Map(config.into_iter().collect()),
        )
    }
}
