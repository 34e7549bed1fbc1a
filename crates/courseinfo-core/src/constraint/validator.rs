//! Derivation of unique-index claims from records.

use crate::catalog::Catalog;
use crate::error::Error;
use crate::model::Entity;

use super::unique_index::UniqueKey;

/// Maps records to the unique-index entries they must hold.
pub struct ConstraintValidator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ConstraintValidator<'a> {
    /// Create a new constraint validator.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Every unique key a record claims, one per constraint on its kind.
    pub fn unique_keys(&self, entity: &Entity) -> Result<Vec<UniqueKey>, Error> {
        let kind = entity.kind();
        self.catalog
            .constraints_for(kind)
            .map(|constraint| {
                let values = constraint
                    .fields
                    .iter()
                    .map(|field| {
                        entity.field(field).ok_or_else(|| {
                            Error::InvalidData(format!(
                                "constraint {} names unknown field {kind}.{field}",
                                constraint.name
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(UniqueKey {
                    kind,
                    constraint: constraint.name.clone(),
                    fields: constraint.fields.clone(),
                    values,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConstraintDef, EntityDef, EntityKind, FieldDef, SchemaBundle};
    use crate::model::{EntityId, FieldValue, Registration, Year};

    #[test]
    fn test_composite_key_values() {
        let catalog = Catalog::courseinfo();
        let validator = ConstraintValidator::new(&catalog);
        let keys = validator
            .unique_keys(&Entity::Registration(Registration {
                student: EntityId(4),
                section: EntityId(9),
            }))
            .unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].constraint, "unique_registration");
        assert_eq!(
            keys[0].values,
            vec![FieldValue::Reference(EntityId(4)), FieldValue::Reference(EntityId(9))]
        );
    }

    #[test]
    fn test_unknown_constraint_field() {
        let catalog = Catalog::new(
            SchemaBundle::new()
                .with_entity(EntityDef::new(EntityKind::Year).with_field(FieldDef::integer("year")))
                .with_constraint(ConstraintDef::unique("bad", EntityKind::Year, "label")),
        );
        let validator = ConstraintValidator::new(&catalog);
        assert!(matches!(
            validator.unique_keys(&Entity::Year(Year { year: 2024 })),
            Err(Error::InvalidData(_))
        ));
    }
}
