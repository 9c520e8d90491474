//! Stack definitions
//!
//! Each stack is an independent deployable unit; cross-stack data flows only
//! through the typed handles returned by the builders, wired together by the
//! entry composition.

pub mod cdn;
pub mod certificate;
pub mod compute;
pub mod dns;
pub mod notification;
pub mod registry;
pub mod sms;
pub mod static_site;

pub use cdn::CdnStack;
pub use certificate::CertificateStack;
pub use compute::{ComputeStack, ComputeStackProps};
pub use dns::{DnsPair, DnsStack};
pub use notification::NotificationStack;
pub use registry::RegistryStack;
pub use sms::SmsStack;
pub use static_site::StaticSiteStack;
