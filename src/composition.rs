//! Entry composition
//!
//! The only place where cross-stack data flow is decided. Stacks are
//! instantiated in dependency order - registry, certificate, messaging
//! policy, notification, compute, content delivery, static site, DNS - and
//! each stack's typed handles become the next stack's inputs. When no custom
//! domain is configured the certificate/CDN/static/DNS/notification stacks
//! are omitted entirely and the compute stack's raw load-balancer endpoint
//! is the sole public entry point.

use crate::config::DeployConfig;
use crate::env::EnvVars;
use crate::error::InfraResult;
use crate::resources::HostedZoneHandle;
use crate::stacks::{
    CdnStack, CertificateStack, ComputeStack, ComputeStackProps, DnsPair, DnsStack,
    NotificationStack, RegistryStack, SmsStack, StaticSiteStack,
};
use crate::synth::{Assembly, StackEnv};

/// Stack names of the composition
pub mod names {
    pub const REGISTRY: &str = "PinglnRepoStack";
    pub const CERTIFICATE: &str = "PinglnCertificateStack";
    pub const SMS: &str = "PinglnSmsStack";
    pub const NOTIFICATION: &str = "PinglnNotificationStack";
    pub const COMPUTE: &str = "PinglnWebStack";
    pub const CDN: &str = "PinglnCdnStack";
    pub const STATIC_SITE: &str = "PinglnSiteStack";
    pub const DNS: &str = "PinglnDnsStack";
}

/// Build the full assembly from configuration and synthesis-time env
pub fn compose(config: &DeployConfig, env_vars: &EnvVars) -> InfraResult<Assembly> {
    let env = StackEnv {
        account: config.account.clone(),
        region: config.region.clone(),
    };
    let mut assembly = Assembly::new();

    let registry = RegistryStack::new(names::REGISTRY, &env, &config.service.repository)?;

    let certificate = match &config.domains {
        Some(domains) => Some(CertificateStack::new(
            names::CERTIFICATE,
            &env,
            &domains.all_names(),
            &domains.zone_id,
            &domains.zone_name,
        )?),
        None => None,
    };

    let sms = match &config.messaging {
        Some(messaging) if messaging.sms => Some(SmsStack::new(names::SMS, &env)?),
        _ => None,
    };

    // A sending identity needs a zone to hold its verification records
    let notification = match (&config.email, &certificate) {
        (Some(email), Some(cert)) => Some(NotificationStack::new(
            names::NOTIFICATION,
            &env,
            &email.sending_domain,
            &cert.hosted_zone,
        )?),
        _ => None,
    };

    let compute = ComputeStack::new(
        names::COMPUTE,
        &env,
        config,
        env_vars,
        ComputeStackProps {
            repository: &registry.repository,
            messaging_policy: sms.as_ref().map(|s| &s.sms_policy),
            smtp_secret: notification.as_ref().map(|n| &n.smtp_secret),
        },
    )?;

    let mut cdn = None;
    let mut static_site = None;
    let mut dns = None;

    if let (Some(domains), Some(cert)) = (&config.domains, &certificate) {
        if !domains.app.is_empty() {
            cdn = Some(CdnStack::new(
                names::CDN,
                &env,
                &compute.load_balancer,
                &cert.certificate,
                &domains.app,
            )?);
        }
        if !domains.site.is_empty() {
            static_site = Some(StaticSiteStack::new(
                names::STATIC_SITE,
                &env,
                &cert.certificate,
                &domains.site,
                &config.assets.source,
            )?);
        }

        let zone = HostedZoneHandle {
            zone_id: domains.zone_id.clone(),
            zone_name: domains.zone_name.clone(),
        };
        let mut pairs = Vec::new();
        if let Some(cdn) = &cdn {
            pairs.push(DnsPair {
                domain_names: &domains.app,
                distribution: &cdn.distribution,
            });
        }
        if let Some(site) = &static_site {
            pairs.push(DnsPair {
                domain_names: &domains.site,
                distribution: &site.distribution,
            });
        }
        dns = Some(DnsStack::new(names::DNS, &env, &zone, &pairs)?);
    }

    assembly.push(registry.stack);
    if let Some(certificate) = certificate {
        assembly.push(certificate.stack);
    }
    if let Some(sms) = sms {
        assembly.push(sms.stack);
    }
    if let Some(notification) = notification {
        assembly.push(notification.stack);
    }
    assembly.push(compute.stack);
    if let Some(cdn) = cdn {
        assembly.push(cdn.stack);
    }
    if let Some(static_site) = static_site {
        assembly.push(static_site.stack);
    }
    if let Some(dns) = dns {
        assembly.push(dns.stack);
    }

    Ok(assembly)
}
