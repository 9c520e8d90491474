//! Notification stack: transactional email sending identity
//!
//! Registers the sending domain, creates the verification and signing DNS
//! records (content issued by the identity provider), and provisions a
//! send-only credential whose access key pair lands in a secret for the
//! compute stack. Rotation and revocation are manual operator actions.

use std::collections::BTreeMap;

use crate::error::InfraResult;
use crate::resources::dns::{CnameRecord, TxtRecord};
use crate::resources::email::EmailIdentity;
use crate::resources::iam::{AccessKey, PolicyStatement, User};
use crate::resources::secrets::AssembledSecret;
use crate::resources::{HostedZoneHandle, SecretHandle};
use crate::synth::{Stack, StackEnv, Value};

const RECORD_TTL_SECS: u32 = 300;
const DKIM_SLOTS: u8 = 3;

pub struct NotificationStack {
    pub stack: Stack,
    pub smtp_secret: SecretHandle,
}

impl NotificationStack {
    pub fn new(
        name: &str,
        env: &StackEnv,
        sending_domain: &str,
        hosted_zone: &HostedZoneHandle,
    ) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let identity_id = stack.add(
            "SendingIdentity",
            EmailIdentity {
                domain_name: sending_domain.to_string(),
            }
            .render(),
        )?;

        stack.add(
            "DomainVerificationRecord",
            TxtRecord {
                zone_id: hosted_zone.zone_id.clone(),
                record_name: format!("_amazonses.{sending_domain}"),
                values: vec![EmailIdentity::dkim_value(&identity_id, 1)],
                ttl_secs: RECORD_TTL_SECS,
            }
            .render(),
        )?;

        for slot in 1..=DKIM_SLOTS {
            stack.add(
                &format!("DkimRecord{slot}"),
                CnameRecord {
                    zone_id: hosted_zone.zone_id.clone(),
                    record_name: EmailIdentity::dkim_name(&identity_id, slot),
                    value: EmailIdentity::dkim_value(&identity_id, slot),
                    ttl_secs: RECORD_TTL_SECS,
                }
                .render(),
            )?;
        }

        let user_id = stack.add(
            "SmtpUser",
            User {
                user_name: "ses-smtp-user".to_string(),
                statements: vec![PolicyStatement::allow(
                    &["ses:SendEmail", "ses:SendRawEmail"],
                    vec![Value::string("*")],
                )],
            }
            .render(),
        )?;

        let key_id = stack.add(
            "SmtpAccessKey",
            AccessKey {
                user: Value::Ref(user_id),
            }
            .render(),
        )?;

        let mut fields = BTreeMap::new();
        fields.insert("username".to_string(), Value::Ref(key_id.clone()));
        fields.insert(
            "password".to_string(),
            Value::get_att(&key_id, "SecretAccessKey"),
        );
        let secret_id = stack.add(
            "SmtpCredentials",
            AssembledSecret {
                description: "SMTP credentials for the sending identity".to_string(),
                fields,
            }
            .render(),
        )?;

        let arn = stack.export("SmtpSecretArn", Value::Ref(secret_id))?;

        Ok(Self {
            stack,
            smtp_secret: SecretHandle { arn },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> NotificationStack {
        let env = StackEnv {
            account: "692859939927".to_string(),
            region: "ap-southeast-2".to_string(),
        };
        let zone = HostedZoneHandle {
            zone_id: "Z0123456789ABC".to_string(),
            zone_name: "pingln.com".to_string(),
        };
        NotificationStack::new("PinglnNotificationStack", &env, "pingln.com", &zone).unwrap()
    }

    #[test]
    fn creates_verification_and_signing_records() {
        let stack = build();
        let json = stack.stack.template().to_json().unwrap();
        assert!(json.contains("_amazonses.pingln.com"));
        for slot in 1..=3 {
            assert!(json.contains(&format!("DkimDNSTokenName{slot}")));
            assert!(json.contains(&format!("DkimDNSTokenValue{slot}")));
        }
    }

    #[test]
    fn credential_pair_is_referenced_never_inlined() {
        let stack = build();
        let json = stack.stack.template().to_json().unwrap();
        assert!(json.contains("SecretAccessKey"));
        assert!(json.contains("ses:SendRawEmail"));
        // the secret's fields are intrinsics, not literals
        assert!(json.contains("\"Fn::GetAtt\""));
    }
}
