//! Typed provider resource descriptors
//!
//! Each descriptor is a plain struct that renders to a `Resource` (type name
//! plus property map). Descriptors hold `Value`s so references and imported
//! handles flow through unchanged.

pub mod cdn;
pub mod certificate;
pub mod compute;
pub mod database;
pub mod dns;
pub mod email;
pub mod handles;
pub mod iam;
pub mod network;
pub mod secrets;
pub mod storage;

pub use handles::{
    BucketHandle, CertificateHandle, DistributionHandle, HostedZoneHandle, LoadBalancerHandle,
    ManagedPolicyHandle, RepositoryHandle, SecretHandle,
};
