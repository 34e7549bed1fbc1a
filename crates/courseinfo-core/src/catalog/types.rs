//! Core type definitions for the catalog.

use serde::Serialize;

use super::EntityKind;

/// Field types supported by the course-registration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum FieldType {
    /// Free text, trimmed on input.
    Text,
    /// Signed integer.
    Integer,
    /// Foreign key to a record of the given kind.
    Reference(EntityKind),
}

impl FieldType {
    /// Check if this is a reference type.
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Reference(_))
    }

    /// Get the referenced kind, if any.
    pub fn referenced_kind(&self) -> Option<EntityKind> {
        match self {
            FieldType::Reference(kind) => Some(*kind),
            _ => None,
        }
    }
}
