//! Field definitions for entities.

use serde::Serialize;

use super::types::FieldType;
use super::EntityKind;

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field must be non-blank after normalization.
    pub required: bool,
    /// Maximum length in characters for text fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            max_length: None,
        }
    }

    /// Create a required text field with a length limit.
    pub fn text(name: impl Into<String>, max_length: usize) -> Self {
        Self::new(name, FieldType::Text).with_max_length(max_length)
    }

    /// Create a required integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Create a required reference field.
    pub fn reference(name: impl Into<String>, target: EntityKind) -> Self {
        Self::new(name, FieldType::Reference(target))
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Mark the field as optional.
    pub fn not_required(mut self) -> Self {
        self.required = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_builders() {
        let name = FieldDef::text("first_name", 45);
        assert!(name.required);
        assert_eq!(name.max_length, Some(45));

        let disambiguator = FieldDef::text("disambiguator", 45).not_required();
        assert!(!disambiguator.required);

        let course = FieldDef::reference("course", EntityKind::Course);
        assert_eq!(course.field_type.referenced_kind(), Some(EntityKind::Course));
    }
}
