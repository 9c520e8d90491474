//! Object store resources for static-site hosting

use std::path::PathBuf;

use crate::synth::{props, Resource, Value};

/// Public website bucket
///
/// Index and error documents point at the same entry file so the client-side
/// router handles every path (single-page-application fallback).
#[derive(Debug, Clone)]
pub struct WebsiteBucket {
    pub bucket_name: String,
    pub entry_file: String,
}

impl WebsiteBucket {
    /// Derive the bucket name from the apex domain ("pingln.com" ->
    /// "pingln-com-spa-bucket")
    pub fn for_domain(apex: &str, entry_file: impl Into<String>) -> Self {
        Self {
            bucket_name: format!("{}-spa-bucket", apex.replace('.', "-")),
            entry_file: entry_file.into(),
        }
    }

    pub fn render(&self) -> Resource {
        // Asset buckets are disposable; contents are re-uploaded every deploy
        Resource::new("AWS::S3::Bucket")
            .deletion_policy("Delete")
            .with("BucketName", self.bucket_name.as_str())
            .with(
                "WebsiteConfiguration",
                props([
                    ("IndexDocument", Value::string(&self.entry_file)),
                    ("ErrorDocument", Value::string(&self.entry_file)),
                ]),
            )
            .with(
                "PublicAccessBlockConfiguration",
                props([
                    ("BlockPublicAcls", Value::Bool(false)),
                    ("BlockPublicPolicy", Value::Bool(false)),
                    ("IgnorePublicAcls", Value::Bool(false)),
                    ("RestrictPublicBuckets", Value::Bool(false)),
                ]),
            )
    }
}

/// Public-read policy over a bucket's objects
#[derive(Debug, Clone)]
pub struct PublicReadPolicy {
    pub bucket: Value,
}

impl PublicReadPolicy {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::S3::BucketPolicy")
            .with("Bucket", self.bucket.clone())
            .with(
                "PolicyDocument",
                props([
                    ("Version", Value::string("2012-10-17")),
                    (
                        "Statement",
                        Value::list([props([
                            ("Effect", Value::string("Allow")),
                            ("Principal", Value::string("*")),
                            ("Action", Value::string("s3:GetObject")),
                            (
                                "Resource",
                                Value::concat([
                                    Value::string("arn:aws:s3:::"),
                                    self.bucket.clone(),
                                    Value::string("/*"),
                                ]),
                            ),
                        ])]),
                    ),
                ]),
            )
    }
}

/// Declarative deployment step: upload a local asset directory and
/// invalidate the distribution's edge cache on every deploy
#[derive(Debug, Clone)]
pub struct AssetDeployment {
    pub source: PathBuf,
    pub bucket: Value,
    pub distribution: Value,
    pub invalidation_paths: Vec<String>,
}

impl AssetDeployment {
    pub fn render(&self) -> Resource {
        Resource::new("Custom::AssetDeployment")
            .with("Source", self.source.display().to_string())
            .with("DestinationBucket", self.bucket.clone())
            .with("Distribution", self.distribution.clone())
            .with(
                "InvalidationPaths",
                Value::list(self.invalidation_paths.iter().map(Value::string)),
            )
    }
}
