//! Template values
//!
//! A `Value` is the right-hand side of any template property: a literal, a
//! same-stack reference, a resource attribute, or a cross-stack import.
//! References serialize to the provider's intrinsic JSON forms so the
//! provisioning engine resolves them at deploy time - nothing is resolved
//! locally.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::stack::LogicalId;

/// Name under which a stack output is exported for cross-stack consumption
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportName(String);

impl ExportName {
    pub fn new(stack: &str, output: &str) -> Self {
        Self(format!("{stack}-{output}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A template property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(i64),
    Bool(bool),
    /// Reference to a resource in the same stack
    Ref(LogicalId),
    /// Attribute of a resource in the same stack
    GetAtt(LogicalId, String),
    /// Value exported by another stack
    Import(ExportName),
    /// Deploy-time string concatenation of the parts with a separator
    Join(String, Vec<Value>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn get_att(id: &LogicalId, attribute: impl Into<String>) -> Self {
        Value::GetAtt(id.clone(), attribute.into())
    }

    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        Value::List(values.into_iter().collect())
    }

    /// Concatenate parts at deploy time with no separator
    pub fn concat(parts: impl IntoIterator<Item = Value>) -> Self {
        Value::Join(String::new(), parts.into_iter().collect())
    }

    /// Literal string value, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_i64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id.as_str())?;
                map.end()
            }
            Value::GetAtt(id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id.as_str(), attribute.as_str()])?;
                map.end()
            }
            Value::Import(export) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::ImportValue", export.as_str())?;
                map.end()
            }
            Value::Join(separator, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(separator, parts))?;
                map.end()
            }
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Build a `Value::Map` from key/value pairs
pub fn props<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}
