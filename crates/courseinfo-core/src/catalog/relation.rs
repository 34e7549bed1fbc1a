//! Relation definitions between entities.

use serde::Serialize;

use super::EntityKind;

/// A many-to-one relation: `from_entity.from_field` points at a `to_entity`.
///
/// Every relation restricts deletes: a referenced record with at least one
/// referencing record cannot be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationDef {
    /// Relation name (unique within schema).
    pub name: String,
    /// Dependent (referencing) entity.
    pub from_entity: EntityKind,
    /// Foreign key field on the dependent entity.
    pub from_field: String,
    /// Referenced entity.
    pub to_entity: EntityKind,
}

impl RelationDef {
    /// Create a many-to-one relation.
    pub fn many_to_one(
        name: impl Into<String>,
        from_entity: EntityKind,
        from_field: impl Into<String>,
        to_entity: EntityKind,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity,
            from_field: from_field.into(),
            to_entity,
        }
    }
}
