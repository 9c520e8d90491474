//! Messaging policy stack: managed policy for outbound SMS publishing

use crate::error::InfraResult;
use crate::resources::iam::{ManagedPolicy, PolicyStatement};
use crate::resources::ManagedPolicyHandle;
use crate::synth::{Stack, StackEnv, Value};

pub struct SmsStack {
    pub stack: Stack,
    pub sms_policy: ManagedPolicyHandle,
}

impl SmsStack {
    pub fn new(name: &str, env: &StackEnv) -> InfraResult<Self> {
        let mut stack = Stack::new(name, env);

        let policy_id = stack.add(
            "SnsSmsPolicy",
            ManagedPolicy {
                statements: vec![PolicyStatement::allow(
                    &["sns:Publish"],
                    vec![Value::string("*")],
                )],
            }
            .render(),
        )?;
        let arn = stack.export("SmsPolicyArn", Value::Ref(policy_id))?;

        Ok(Self {
            stack,
            sms_policy: ManagedPolicyHandle { arn },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_allows_publish_only() {
        let env = StackEnv {
            account: "692859939927".to_string(),
            region: "ap-southeast-2".to_string(),
        };
        let stack = SmsStack::new("PinglnSmsStack", &env).unwrap();
        let json = stack.stack.template().to_json().unwrap();
        assert!(json.contains("sns:Publish"));
        assert_eq!(stack.stack.resource_count(), 1);
    }
}
