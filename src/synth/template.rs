//! Template rendering
//!
//! A `Template` is the serialized form of a stack: the JSON document handed
//! to the provider's reconciliation engine. Rendering is deterministic -
//! same stack, same bytes - which is what makes hash-based change detection
//! and the idempotence guarantee work.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::InfraResult;
use crate::synth::stack::{LogicalId, Output, Resource};

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Serialized rendering of a stack
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Resources")]
    resources: BTreeMap<LogicalId, Resource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(
        resources: BTreeMap<LogicalId, Resource>,
        outputs: BTreeMap<String, Output>,
    ) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION,
            resources,
            outputs,
        }
    }

    /// Render to pretty JSON with a trailing newline
    pub fn to_json(&self) -> InfraResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::value::Value;

    #[test]
    fn empty_outputs_are_omitted() {
        let mut resources = BTreeMap::new();
        resources.insert(
            LogicalId::new("Bucket").unwrap(),
            Resource::new("AWS::S3::Bucket"),
        );
        let template = Template::new(resources, BTreeMap::new());
        let json = template.to_json().unwrap();
        assert!(json.contains("\"AWSTemplateFormatVersion\": \"2010-09-09\""));
        assert!(json.contains("\"Bucket\""));
        assert!(!json.contains("\"Outputs\""));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut resources = BTreeMap::new();
        resources.insert(
            LogicalId::new("Vpc").unwrap(),
            Resource::new("AWS::EC2::VPC").with("MaxAzs", Value::from(2i64)),
        );
        let template = Template::new(resources.clone(), BTreeMap::new());
        let again = Template::new(resources, BTreeMap::new());
        assert_eq!(template.to_json().unwrap(), again.to_json().unwrap());
    }
}
