//! IAM resources: policies, roles, users, access keys

use crate::synth::{props, Resource, Value};

/// Allow or deny
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    fn as_str(self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// One policy statement
#[derive(Debug, Clone)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<Value>,
}

impl PolicyStatement {
    pub fn allow(actions: &[&str], resources: Vec<Value>) -> Self {
        Self {
            effect: Effect::Allow,
            actions: actions.iter().map(|a| a.to_string()).collect(),
            resources,
        }
    }

    fn to_value(&self) -> Value {
        props([
            ("Effect", Value::string(self.effect.as_str())),
            (
                "Action",
                Value::list(self.actions.iter().map(Value::string)),
            ),
            ("Resource", Value::List(self.resources.clone())),
        ])
    }
}

fn policy_document(statements: &[PolicyStatement]) -> Value {
    props([
        ("Version", Value::string("2012-10-17")),
        (
            "Statement",
            Value::list(statements.iter().map(PolicyStatement::to_value)),
        ),
    ])
}

/// Standalone managed policy, attachable across stacks by ARN
#[derive(Debug, Clone)]
pub struct ManagedPolicy {
    pub statements: Vec<PolicyStatement>,
}

impl ManagedPolicy {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::IAM::ManagedPolicy")
            .with("PolicyDocument", policy_document(&self.statements))
    }
}

/// Service role with inline statements and optional managed attachments
#[derive(Debug, Clone)]
pub struct Role {
    pub service_principal: String,
    pub statements: Vec<PolicyStatement>,
    pub managed_policy_arns: Vec<Value>,
}

impl Role {
    pub fn for_service(service_principal: impl Into<String>) -> Self {
        Self {
            service_principal: service_principal.into(),
            statements: Vec::new(),
            managed_policy_arns: Vec::new(),
        }
    }

    pub fn render(&self) -> Resource {
        let assume = props([
            ("Version", Value::string("2012-10-17")),
            (
                "Statement",
                Value::list([props([
                    ("Effect", Value::string("Allow")),
                    (
                        "Principal",
                        props([("Service", Value::string(&self.service_principal))]),
                    ),
                    ("Action", Value::string("sts:AssumeRole")),
                ])]),
            ),
        ]);

        let mut resource =
            Resource::new("AWS::IAM::Role").with("AssumeRolePolicyDocument", assume);
        if !self.statements.is_empty() {
            resource = resource.with(
                "Policies",
                Value::list([props([
                    ("PolicyName", Value::string("Inline")),
                    ("PolicyDocument", policy_document(&self.statements)),
                ])]),
            );
        }
        if !self.managed_policy_arns.is_empty() {
            resource = resource.with(
                "ManagedPolicyArns",
                Value::List(self.managed_policy_arns.clone()),
            );
        }
        resource
    }
}

/// IAM user for programmatic credentials
#[derive(Debug, Clone)]
pub struct User {
    pub user_name: String,
    pub statements: Vec<PolicyStatement>,
}

impl User {
    pub fn render(&self) -> Resource {
        let mut resource =
            Resource::new("AWS::IAM::User").with("UserName", self.user_name.as_str());
        if !self.statements.is_empty() {
            resource = resource.with(
                "Policies",
                Value::list([props([
                    ("PolicyName", Value::string("Inline")),
                    ("PolicyDocument", policy_document(&self.statements)),
                ])]),
            );
        }
        resource
    }
}

/// Access key issued for a user; the secret part is only ever referenced
#[derive(Debug, Clone)]
pub struct AccessKey {
    pub user: Value,
}

impl AccessKey {
    pub fn render(&self) -> Resource {
        Resource::new("AWS::IAM::AccessKey").with("UserName", self.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managed_policy_renders_statement() {
        let policy = ManagedPolicy {
            statements: vec![PolicyStatement::allow(
                &["sns:Publish"],
                vec![Value::string("*")],
            )],
        };
        let json = serde_json::to_string(&policy.render()).unwrap();
        assert!(json.contains("\"sns:Publish\""));
        assert!(json.contains("\"Effect\":\"Allow\""));
    }

    #[test]
    fn role_carries_assume_principal() {
        let role = Role::for_service("ecs-tasks.amazonaws.com");
        let json = serde_json::to_string(&role.render()).unwrap();
        assert!(json.contains("ecs-tasks.amazonaws.com"));
        assert!(json.contains("sts:AssumeRole"));
        assert!(!json.contains("\"Policies\""));
    }
}
