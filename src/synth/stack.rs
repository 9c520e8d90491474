//! Stacks and resources
//!
//! A `Stack` is a named unit of infrastructure deployed and updated together:
//! an ordered collection of `Resource` descriptors plus declared `Output`s.
//! Resources are keyed by validated `LogicalId`s; maps are `BTreeMap` so a
//! stack always renders to byte-identical JSON for unchanged input.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{InfraError, InfraResult};
use crate::synth::template::Template;
use crate::synth::value::{ExportName, Value};

/// Validated logical name of a resource within a stack
///
/// Logical ids are the provider's template-level handles; they must be
/// non-empty and alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> InfraResult<Self> {
        let id = id.into();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InfraError::InvalidLogicalId { id });
        }
        Ok(Self(id))
    }

    /// Derive a logical id from a free-form label, keeping only alphanumerics
    /// and capitalizing word starts ("app" -> "App", "my-site" -> "MySite").
    pub fn from_label(label: &str, suffix: &str) -> InfraResult<Self> {
        let mut id = String::with_capacity(label.len() + suffix.len());
        let mut upper_next = true;
        for c in label.chars() {
            if c.is_ascii_alphanumeric() {
                if upper_next {
                    id.extend(c.to_uppercase());
                    upper_next = false;
                } else {
                    id.push(c);
                }
            } else {
                upper_next = true;
            }
        }
        id.push_str(suffix);
        Self::new(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single provider resource descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
    #[serde(rename = "Properties")]
    pub properties: BTreeMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            deletion_policy: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Resource-level removal policy ("Delete", "Retain")
    pub fn deletion_policy(mut self, policy: impl Into<String>) -> Self {
        self.deletion_policy = Some(policy.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// A declared stack output, optionally exported for cross-stack consumption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    pub export: Option<OutputExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputExport {
    #[serde(rename = "Name")]
    pub name: ExportName,
}

/// Target account and region for a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEnv {
    pub account: String,
    pub region: String,
}

/// A named unit of infrastructure resources
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: StackEnv,
    resources: BTreeMap<LogicalId, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl Stack {
    pub fn new(name: impl Into<String>, env: &StackEnv) -> Self {
        Self {
            name: name.into(),
            env: env.clone(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &StackEnv {
        &self.env
    }

    /// Add a resource under the given logical id
    pub fn add(&mut self, id: &str, resource: Resource) -> InfraResult<LogicalId> {
        let id = LogicalId::new(id)?;
        self.add_with_id(id.clone(), resource)?;
        Ok(id)
    }

    /// Add a resource under an already-derived logical id
    pub fn add_with_id(&mut self, id: LogicalId, resource: Resource) -> InfraResult<()> {
        if self.resources.contains_key(&id) {
            return Err(InfraError::DuplicateLogicalId {
                id: id.as_str().to_string(),
                stack: self.name.clone(),
            });
        }
        self.resources.insert(id, resource);
        Ok(())
    }

    /// Declare an informational output
    pub fn add_output(
        &mut self,
        name: &str,
        value: Value,
        description: impl Into<String>,
    ) -> InfraResult<()> {
        self.insert_output(
            name,
            Output {
                value,
                description: Some(description.into()),
                export: None,
            },
        )
    }

    /// Declare an output exported for other stacks; returns a `Value`
    /// importing it, the only way a handle crosses a stack boundary.
    pub fn export(&mut self, name: &str, value: Value) -> InfraResult<Value> {
        let export = ExportName::new(&self.name, name);
        self.insert_output(
            name,
            Output {
                value,
                description: None,
                export: Some(OutputExport {
                    name: export.clone(),
                }),
            },
        )?;
        Ok(Value::Import(export))
    }

    fn insert_output(&mut self, name: &str, output: Output) -> InfraResult<()> {
        if self.outputs.contains_key(name) {
            return Err(InfraError::DuplicateOutput {
                name: name.to_string(),
                stack: self.name.clone(),
            });
        }
        self.outputs.insert(name.to_string(), output);
        Ok(())
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        let id = LogicalId::new(id).ok()?;
        self.resources.get(&id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&LogicalId, &Resource)> {
        self.resources.iter()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&String, &Output)> {
        self.outputs.iter()
    }

    /// Render this stack to its provisioning template
    pub fn template(&self) -> Template {
        Template::new(self.resources.clone(), self.outputs.clone())
    }
}
