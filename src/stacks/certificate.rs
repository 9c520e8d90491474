//! Certificate stack: DNS-validated TLS certificate for the domain set

use crate::error::InfraResult;
use crate::resources::certificate::Certificate;
use crate::resources::{CertificateHandle, HostedZoneHandle};
use crate::synth::{Stack, StackEnv, Value};

pub struct CertificateStack {
    pub stack: Stack,
    pub certificate: CertificateHandle,
    pub hosted_zone: HostedZoneHandle,
}

impl CertificateStack {
    pub fn new(
        name: &str,
        env: &StackEnv,
        domain_names: &[String],
        zone_id: &str,
        zone_name: &str,
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let cert_id = stack.add(
            "Certificate",
            Certificate {
                domain_names: domain_names.to_vec(),
                hosted_zone_id: zone_id.to_string(),
            }
            .render(),
        )?;
        let arn = stack.export("CertificateArn", Value::Ref(cert_id))?;

        Ok(Self {
            stack,
            certificate: CertificateHandle { arn },
            hosted_zone: HostedZoneHandle {
                zone_id: zone_id.to_string(),
                zone_name: zone_name.to_string(),
            },
        })
    }
}
