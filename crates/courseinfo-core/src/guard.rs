//! Deletion guard for referential integrity.
//!
//! Deletes are never cascaded. A record referenced by any dependent record
//! is refused, and the refusal lists every dependent found by walking the
//! catalog's relation table.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, EntityKind};
use crate::error::Error;
use crate::model::{record_path, Entity, EntityId, FieldValue, Presenter};
use crate::storage::StorageEngine;

/// A record that blocks deletion of the record it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentRecord {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub path: String,
}

impl fmt::Display for DependentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.label)
    }
}

/// Outcome of a deletability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "dependents", rename_all = "lowercase")]
pub enum Deletability {
    /// No dependents; the record may be deleted.
    Allowed,
    /// Dependents exist, in relation-table order then natural order.
    Refused(Vec<DependentRecord>),
}

impl Deletability {
    /// Check if deletion is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Deletability::Allowed)
    }

    /// Dependents blocking the delete (empty when allowed).
    pub fn dependents(&self) -> &[DependentRecord] {
        match self {
            Deletability::Allowed => &[],
            Deletability::Refused(dependents) => dependents,
        }
    }
}

/// Delete refused because dependent records exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("You may not delete {kind} {label}.")]
pub struct DeletionRefused {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub dependents: Vec<DependentRecord>,
}

/// A record's label together with whether it may be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionCheck {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub deletability: Deletability,
}

impl DeletionCheck {
    /// The refusal, if dependents exist.
    pub fn into_refusal(self) -> Option<DeletionRefused> {
        match self.deletability {
            Deletability::Allowed => None,
            Deletability::Refused(dependents) => Some(DeletionRefused {
                kind: self.kind,
                id: self.id,
                label: self.label,
                dependents,
            }),
        }
    }
}

/// Finds dependents of a record through the catalog's relation table.
pub struct DeletionGuard<'a> {
    catalog: &'a Catalog,
    engine: &'a StorageEngine,
}

impl<'a> DeletionGuard<'a> {
    /// Create a new deletion guard.
    pub fn new(catalog: &'a Catalog, engine: &'a StorageEngine) -> Self {
        Self { catalog, engine }
    }

    /// Every record referencing `kind`/`id`.
    ///
    /// Relations are visited in catalog order; within one relation the
    /// dependents follow their kind's natural order, then id.
    pub fn dependents(&self, kind: EntityKind, id: EntityId) -> Result<Vec<DependentRecord>, Error> {
        let presenter = Presenter::new(self.catalog, self.engine);
        let target = FieldValue::Reference(id);
        let mut dependents = Vec::new();

        for relation in self.catalog.dependents_of(kind) {
            let mut found: Vec<(Vec<FieldValue>, EntityId, Entity)> = Vec::new();
            for entry in self.engine.scan(relation.from_entity) {
                let (dependent_id, entity) = entry?;
                if entity.field(&relation.from_field).as_ref() == Some(&target) {
                    found.push((presenter.natural_key(&entity)?, dependent_id, entity));
                }
            }
            found.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

            for (_, dependent_id, entity) in found {
                dependents.push(DependentRecord {
                    kind: relation.from_entity,
                    id: dependent_id,
                    label: presenter.label(&entity)?,
                    path: record_path(relation.from_entity, dependent_id),
                });
            }
        }

        Ok(dependents)
    }

    /// Label the record and collect its dependents in one pass. Read-only.
    pub fn inspect(&self, kind: EntityKind, id: EntityId) -> Result<DeletionCheck, Error> {
        let entity = self
            .engine
            .fetch(kind, id)?
            .ok_or_else(|| Error::not_found(kind, id))?;
        let label = Presenter::new(self.catalog, self.engine).label(&entity)?;

        let dependents = self.dependents(kind, id)?;
        let deletability = if dependents.is_empty() {
            Deletability::Allowed
        } else {
            Deletability::Refused(dependents)
        };
        Ok(DeletionCheck {
            kind,
            id,
            label,
            deletability,
        })
    }

    /// Decide whether `kind`/`id` may be deleted. Read-only.
    pub fn check_deletable(&self, kind: EntityKind, id: EntityId) -> Result<Deletability, Error> {
        Ok(self.inspect(kind, id)?.deletability)
    }

    /// Like [`check_deletable`](Self::check_deletable), but a refusal becomes
    /// a [`DeletionRefused`] error naming the record.
    pub fn ensure_deletable(&self, kind: EntityKind, id: EntityId) -> Result<(), Error> {
        match self.inspect(kind, id)?.into_refusal() {
            None => Ok(()),
            Some(refused) => Err(refused.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, Instructor, Period, Section, Semester, Year};
    use crate::storage::StorageConfig;

    struct Fixture {
        catalog: Catalog,
        engine: StorageEngine,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Catalog::courseinfo(),
                engine: StorageEngine::open(StorageConfig::temporary()).unwrap(),
            }
        }

        fn insert(&self, entity: Entity) -> EntityId {
            let id = self.engine.generate_id().unwrap();
            let mut tx = self.engine.transaction(&self.catalog);
            tx.insert(id, entity);
            tx.commit().unwrap();
            id
        }

        fn guard(&self) -> DeletionGuard<'_> {
            DeletionGuard::new(&self.catalog, &self.engine)
        }

        fn instructor(&self, first: &str, last: &str) -> EntityId {
            self.insert(Entity::Instructor(Instructor {
                first_name: first.into(),
                last_name: last.into(),
                disambiguator: String::new(),
            }))
        }

        fn semester(&self) -> EntityId {
            let year = self.insert(Entity::Year(Year { year: 2024 }));
            let period = self.insert(Entity::Period(Period {
                period_sequence: 1,
                period_name: "Spring".into(),
            }));
            self.insert(Entity::Semester(Semester { year, period }))
        }

        fn section(&self, name: &str, semester: EntityId, course: EntityId, instructor: EntityId) -> EntityId {
            self.insert(Entity::Section(Section {
                section_name: name.into(),
                semester,
                course,
                instructor,
            }))
        }

        fn course(&self, number: &str) -> EntityId {
            self.insert(Entity::Course(Course {
                course_number: number.into(),
                course_name: "Web Development".into(),
            }))
        }
    }

    #[test]
    fn test_instructor_without_sections_is_allowed() {
        let fx = Fixture::new();
        let id = fx.instructor("Kevin", "Trainor");
        assert_eq!(fx.guard().check_deletable(EntityKind::Instructor, id).unwrap(), Deletability::Allowed);
        assert!(fx.guard().ensure_deletable(EntityKind::Instructor, id).is_ok());
    }

    #[test]
    fn test_instructor_with_section_is_refused() {
        let fx = Fixture::new();
        let john = fx.instructor("John", "Doe");
        let semester = fx.semester();
        let course = fx.course("IS439");
        let section = fx.section("A", semester, course, john);

        let outcome = fx.guard().check_deletable(EntityKind::Instructor, john).unwrap();
        assert_eq!(
            outcome,
            Deletability::Refused(vec![DependentRecord {
                kind: EntityKind::Section,
                id: section,
                label: "IS439 - A (2024 - Spring)".into(),
                path: format!("/api/section/{section}"),
            }])
        );

        let err = fx.guard().ensure_deletable(EntityKind::Instructor, john).unwrap_err();
        match err {
            Error::DeletionRefused(refused) => {
                assert_eq!(refused.to_string(), "You may not delete instructor Doe, John.");
                assert_eq!(refused.dependents.len(), 1);
            }
            other => panic!("expected refusal, got {other:?}"),
        }
    }

    #[test]
    fn test_inspect_carries_label() {
        let fx = Fixture::new();
        let john = fx.instructor("John", "Doe");
        let check = fx.guard().inspect(EntityKind::Instructor, john).unwrap();
        assert_eq!(check.label, "Doe, John");
        assert!(check.deletability.is_allowed());
        assert!(check.into_refusal().is_none());

        let semester = fx.semester();
        let course = fx.course("IS439");
        fx.section("A", semester, course, john);
        let refused = fx
            .guard()
            .inspect(EntityKind::Instructor, john)
            .unwrap()
            .into_refusal()
            .unwrap();
        assert_eq!(refused.label, "Doe, John");
        assert_eq!(refused.dependents.len(), 1);
    }

    #[test]
    fn test_dependents_in_natural_order() {
        let fx = Fixture::new();
        let instructor = fx.instructor("Kevin", "Trainor");
        let semester = fx.semester();
        let later = fx.course("IS490");
        let earlier = fx.course("IS101");
        fx.section("B", semester, later, instructor);
        fx.section("A", semester, earlier, instructor);

        let labels: Vec<_> = fx
            .guard()
            .dependents(EntityKind::Instructor, instructor)
            .unwrap()
            .into_iter()
            .map(|d| d.label)
            .collect();
        assert_eq!(labels, vec!["IS101 - A (2024 - Spring)", "IS490 - B (2024 - Spring)"]);
    }

    #[test]
    fn test_year_blocked_by_semester() {
        let fx = Fixture::new();
        let semester = fx.semester();
        let Some(Entity::Semester(s)) = fx.engine.fetch(EntityKind::Semester, semester).unwrap() else {
            panic!("semester missing");
        };

        let outcome = fx.guard().check_deletable(EntityKind::Year, s.year).unwrap();
        assert_eq!(outcome.dependents().len(), 1);
        assert_eq!(outcome.dependents()[0].kind, EntityKind::Semester);
        assert_eq!(outcome.dependents()[0].label, "2024 - Spring");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.guard().check_deletable(EntityKind::Course, EntityId(404)),
            Err(Error::NotFound { kind: EntityKind::Course, .. })
        ));
    }
}
