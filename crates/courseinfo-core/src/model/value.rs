//! Normalized field values.

use std::fmt;

use serde::Serialize;

use super::EntityId;

/// A single normalized field value.
///
/// Ordering is only meaningful between values of the same field, which
/// always share a variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer value.
    Integer(i64),
    /// Trimmed text.
    Text(String),
    /// Foreign key.
    Reference(EntityId),
}

impl FieldValue {
    /// Get as text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as an integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as a reference, if this is a reference value.
    pub fn as_reference(&self) -> Option<EntityId> {
        match self {
            FieldValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Convert to the JSON shape accepted on input.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Text(s) => serde_json::Value::from(s.as_str()),
            FieldValue::Reference(id) => serde_json::Value::from(id.0),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Reference(id) => write!(f, "{id}"),
        }
    }
}
