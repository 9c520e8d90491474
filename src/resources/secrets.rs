//! Secret store resources
//!
//! Credential material is generated or assembled provider-side; templates
//! only ever carry references and generation rules, never plaintext values.

use std::collections::BTreeMap;

use crate::synth::{props, Resource, Value};

/// A secret whose value the provider generates at creation time
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
    pub description: String,
    /// Fixed JSON fields to merge the generated key into
    pub template_username: String,
    /// JSON key the generated value lands under
    pub generate_key: String,
    pub exclude_characters: String,
    pub password_length: u32,
}

impl GeneratedSecret {
    /// Database-credential shape: fixed username, generated 32-char password
    pub fn database_credentials(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            template_username: "postgres".to_string(),
            generate_key: "password".to_string(),
            exclude_characters: "\"@/\\".to_string(),
            password_length: 32,
        }
    }

    pub fn render(&self) -> Resource {
        Resource::new("AWS::SecretsManager::Secret")
            .with("Description", self.description.as_str())
            .with(
                "GenerateSecretString",
                props([
                    (
                        "SecretStringTemplate",
                        Value::string(format!(
                            "{{\"username\":\"{}\"}}",
                            self.template_username
                        )),
                    ),
                    ("GenerateStringKey", Value::string(&self.generate_key)),
                    (
                        "ExcludeCharacters",
                        Value::string(&self.exclude_characters),
                    ),
                    ("PasswordLength", Value::from(i64::from(self.password_length))),
                ]),
            )
    }
}

/// A secret assembled from values of other resources in the same stack
///
/// Used for the notification stack's SMTP credential pair: the keys point at
/// a provider-issued access key, so the material never enters the template.
#[derive(Debug, Clone)]
pub struct AssembledSecret {
    pub description: String,
    pub fields: BTreeMap<String, Value>,
}

impl AssembledSecret {
    pub fn render(&self) -> Resource {
        let mut parts = vec![Value::string("{")];
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                parts.push(Value::string(","));
            }
            parts.push(Value::string(format!("\"{key}\":\"")));
            parts.push(value.clone());
            parts.push(Value::string("\""));
        }
        parts.push(Value::string("}"));

        Resource::new("AWS::SecretsManager::Secret")
            .with("Description", self.description.as_str())
            .with("SecretString", Value::concat(parts))
    }
}
