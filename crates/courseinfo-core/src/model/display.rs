//! Display labels and natural sort keys.

use super::{Entity, EntityId, FieldValue};
use crate::catalog::{Catalog, EntityKind};
use crate::error::Error;

/// Point lookup of stored records, used to follow references.
pub trait Lookup {
    /// Fetch a record by kind and id.
    fn lookup(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>, Error>;
}

/// Renders labels and sort keys by following references through a [`Lookup`].
pub struct Presenter<'a, L: Lookup + ?Sized> {
    catalog: &'a Catalog,
    store: &'a L,
}

impl<'a, L: Lookup + ?Sized> Presenter<'a, L> {
    pub fn new(catalog: &'a Catalog, store: &'a L) -> Self {
        Self { catalog, store }
    }

    fn resolve(&self, kind: EntityKind, id: EntityId) -> Result<Entity, Error> {
        self.store
            .lookup(kind, id)?
            .ok_or_else(|| Error::not_found(kind, id))
    }

    fn referenced(&self, entity: &Entity, field: &str) -> Result<Entity, Error> {
        let def = self.catalog.entity(entity.kind())?;
        let target = def
            .get_field(field)
            .and_then(|f| f.field_type.referenced_kind())
            .ok_or_else(|| Error::InvalidData(format!("{} has no reference {field}", entity.kind())))?;
        let id = entity
            .field(field)
            .and_then(|v| v.as_reference())
            .ok_or_else(|| Error::InvalidData(format!("{} has no reference {field}", entity.kind())))?;
        self.resolve(target, id)
    }

    /// Human-readable label of a record.
    pub fn label(&self, entity: &Entity) -> Result<String, Error> {
        Ok(match entity {
            Entity::Year(y) => y.year.to_string(),
            Entity::Period(p) => p.period_name.clone(),
            Entity::Semester(_) => {
                let year = self.label(&self.referenced(entity, "year")?)?;
                let period = self.label(&self.referenced(entity, "period")?)?;
                format!("{year} - {period}")
            }
            Entity::Course(c) => format!("{} - {}", c.course_number, c.course_name),
            Entity::Instructor(p) => person_label(&p.first_name, &p.last_name, &p.disambiguator),
            Entity::Student(p) => person_label(&p.first_name, &p.last_name, &p.disambiguator),
            Entity::Section(s) => {
                let course = match self.referenced(entity, "course")? {
                    Entity::Course(c) => c.course_number,
                    other => self.label(&other)?,
                };
                let semester = self.label(&self.referenced(entity, "semester")?)?;
                format!("{course} - {} ({semester})", s.section_name)
            }
            Entity::Registration(_) => {
                let section = self.label(&self.referenced(entity, "section")?)?;
                let student = self.label(&self.referenced(entity, "student")?)?;
                format!("{section} / {student}")
            }
        })
    }

    /// Natural display key: the default-order fields with references expanded.
    pub fn natural_key(&self, entity: &Entity) -> Result<Vec<FieldValue>, Error> {
        let def = self.catalog.entity(entity.kind())?;
        let mut key = Vec::new();
        for order in &def.default_order {
            key.extend(self.field_key(entity, &order.field)?);
        }
        Ok(key)
    }

    /// Sort key for one field. References sort by the target's natural key.
    pub fn field_key(&self, entity: &Entity, field: &str) -> Result<Vec<FieldValue>, Error> {
        match entity.field(field) {
            Some(FieldValue::Reference(_)) => {
                let target = self.referenced(entity, field)?;
                self.natural_key(&target)
            }
            Some(value) => Ok(vec![value]),
            None => Ok(Vec::new()),
        }
    }
}

fn person_label(first: &str, last: &str, disambiguator: &str) -> String {
    if disambiguator.is_empty() {
        format!("{last}, {first}")
    } else {
        format!("{last}, {first} ({disambiguator})")
    }
}
