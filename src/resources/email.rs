//! Transactional email sending identity

use crate::synth::{LogicalId, Resource, Value};

/// Sending identity for a domain
///
/// Verification and signing record content is issued by the identity
/// provider at creation time; templates reference the issued attributes
/// instead of computing anything locally.
#[derive(Debug, Clone)]
pub struct EmailIdentity {
    pub domain_name: String,
}

impl EmailIdentity {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::SES::EmailIdentity")
            .with("EmailIdentity", self.domain_name.as_str())
    }

    /// Issued DKIM record name for slot 1..=3
    pub fn dkim_name(id: &LogicalId, slot: u8) -> Value {
        Value::get_att(id, format!("DkimDNSTokenName{slot}"))
    }

    /// Issued DKIM record value for slot 1..=3
    pub fn dkim_value(id: &LogicalId, slot: u8) -> Value {
        Value::get_att(id, format!("DkimDNSTokenValue{slot}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dkim_attributes_are_issued_not_computed() {
        let id = LogicalId::new("SendingIdentity").unwrap();
        let json = serde_json::to_string(&EmailIdentity::dkim_name(&id, 2)).unwrap();
        assert_eq!(
            json,
            "{\"Fn::GetAtt\":[\"SendingIdentity\",\"DkimDNSTokenName2\"]}"
        );
    }
}
