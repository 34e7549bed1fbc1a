//! Constraint definitions for entities.

use serde::Serialize;

use super::EntityKind;

/// A uniqueness constraint (single or composite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintDef {
    /// Constraint name.
    pub name: String,
    /// Entity this constraint applies to.
    pub entity: EntityKind,
    /// Fields that must be unique together.
    pub fields: Vec<String>,
}

impl ConstraintDef {
    /// Create a unique constraint on a single field.
    pub fn unique(name: impl Into<String>, entity: EntityKind, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity,
            fields: vec![field.into()],
        }
    }

    /// Create a composite unique constraint.
    pub fn unique_composite(
        name: impl Into<String>,
        entity: EntityKind,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            entity,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this constraint spans more than one field.
    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }
}
