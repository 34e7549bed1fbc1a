//! Catalog for looking up schema metadata.

use super::{ConstraintDef, EntityDef, EntityKind, RelationDef, SchemaBundle};
use crate::error::Error;

/// Read-only view over the schema used by validation, storage, and the
/// deletion guard.
#[derive(Debug, Clone)]
pub struct Catalog {
    schema: SchemaBundle,
}

impl Catalog {
    /// Create a catalog from a schema bundle.
    pub fn new(schema: SchemaBundle) -> Self {
        Self { schema }
    }

    /// Catalog for the course-registration schema.
    pub fn courseinfo() -> Self {
        Self::new(SchemaBundle::courseinfo())
    }

    /// The underlying schema bundle.
    pub fn schema(&self) -> &SchemaBundle {
        &self.schema
    }

    /// Get the entity definition for a kind.
    pub fn entity(&self, kind: EntityKind) -> Result<&EntityDef, Error> {
        self.schema
            .get_entity(kind)
            .ok_or_else(|| Error::InvalidData(format!("no entity definition for {kind}")))
    }

    /// Relations whose dependents block deletion of `kind`, in scan order.
    pub fn dependents_of(&self, kind: EntityKind) -> impl Iterator<Item = &RelationDef> {
        self.schema.relations_to(kind)
    }

    /// Unique constraints declared on `kind`.
    pub fn constraints_for(&self, kind: EntityKind) -> impl Iterator<Item = &ConstraintDef> {
        self.schema.constraints_for(kind)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::courseinfo()
    }
}
