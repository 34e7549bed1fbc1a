//! Schema bundle - the full set of entities, relations, and constraints.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ConstraintDef, EntityDef, EntityKind, FieldDef, OrderBy, RelationDef};

/// Snapshot of the entire schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaBundle {
    /// Entity definitions keyed by kind.
    pub entities: BTreeMap<EntityKind, EntityDef>,
    /// Relation definitions, in dependent-scan order.
    pub relations: Vec<RelationDef>,
    /// Constraint definitions.
    pub constraints: Vec<ConstraintDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            relations: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.kind, entity);
        self
    }

    /// Add a relation to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Add a constraint to the schema.
    pub fn with_constraint(mut self, constraint: ConstraintDef) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// The course-registration schema.
    pub fn courseinfo() -> Self {
        use EntityKind::*;

        let person = |kind| {
            EntityDef::new(kind)
                .with_field(FieldDef::text("first_name", 45))
                .with_field(FieldDef::text("last_name", 45))
                .with_field(FieldDef::text("disambiguator", 45).not_required())
                .with_default_order([
                    OrderBy::asc("last_name"),
                    OrderBy::asc("first_name"),
                    OrderBy::asc("disambiguator"),
                ])
        };

        Self::new()
            .with_entity(
                EntityDef::new(Year)
                    .with_field(FieldDef::integer("year"))
                    .with_default_order([OrderBy::asc("year")]),
            )
            .with_entity(
                EntityDef::new(Period)
                    .with_field(FieldDef::integer("period_sequence"))
                    .with_field(FieldDef::text("period_name", 45))
                    .with_default_order([OrderBy::asc("period_sequence")]),
            )
            .with_entity(
                EntityDef::new(Semester)
                    .with_field(FieldDef::reference("year", Year))
                    .with_field(FieldDef::reference("period", Period))
                    .with_default_order([OrderBy::asc("year"), OrderBy::asc("period")]),
            )
            .with_entity(
                EntityDef::new(Course)
                    .with_field(FieldDef::text("course_number", 20))
                    .with_field(FieldDef::text("course_name", 225))
                    .with_default_order([OrderBy::asc("course_number"), OrderBy::asc("course_name")]),
            )
            .with_entity(person(Instructor))
            .with_entity(person(Student))
            .with_entity(
                EntityDef::new(Section)
                    .with_field(FieldDef::text("section_name", 10))
                    .with_field(FieldDef::reference("semester", Semester))
                    .with_field(FieldDef::reference("course", Course))
                    .with_field(FieldDef::reference("instructor", Instructor))
                    .with_default_order([
                        OrderBy::asc("course"),
                        OrderBy::asc("section_name"),
                        OrderBy::asc("semester"),
                    ]),
            )
            .with_entity(
                EntityDef::new(Registration)
                    .with_field(FieldDef::reference("student", Student))
                    .with_field(FieldDef::reference("section", Section))
                    .with_default_order([OrderBy::asc("section"), OrderBy::asc("student")]),
            )
            .with_relation(RelationDef::many_to_one("semester_year", Semester, "year", Year))
            .with_relation(RelationDef::many_to_one("semester_period", Semester, "period", Period))
            .with_relation(RelationDef::many_to_one("section_semester", Section, "semester", Semester))
            .with_relation(RelationDef::many_to_one("section_course", Section, "course", Course))
            .with_relation(RelationDef::many_to_one("section_instructor", Section, "instructor", Instructor))
            .with_relation(RelationDef::many_to_one("registration_student", Registration, "student", Student))
            .with_relation(RelationDef::many_to_one("registration_section", Registration, "section", Section))
            .with_constraint(ConstraintDef::unique("unique_year", Year, "year"))
            .with_constraint(ConstraintDef::unique_composite(
                "unique_period",
                Period,
                ["period_sequence", "period_name"],
            ))
            .with_constraint(ConstraintDef::unique_composite("unique_semester", Semester, ["year", "period"]))
            .with_constraint(ConstraintDef::unique("unique_course_number", Course, "course_number"))
            .with_constraint(ConstraintDef::unique_composite(
                "unique_instructor",
                Instructor,
                ["first_name", "last_name", "disambiguator"],
            ))
            .with_constraint(ConstraintDef::unique_composite(
                "unique_student",
                Student,
                ["first_name", "last_name", "disambiguator"],
            ))
            .with_constraint(ConstraintDef::unique_composite(
                "unique_section",
                Section,
                ["section_name", "semester", "course", "instructor"],
            ))
            .with_constraint(ConstraintDef::unique_composite(
                "unique_registration",
                Registration,
                ["student", "section"],
            ))
    }

    /// Get an entity by kind.
    pub fn get_entity(&self, kind: EntityKind) -> Option<&EntityDef> {
        self.entities.get(&kind)
    }

    /// Get all relations whose source is the given kind.
    pub fn relations_from(&self, kind: EntityKind) -> impl Iterator<Item = &RelationDef> {
        self.relations.iter().filter(move |r| r.from_entity == kind)
    }

    /// Get all relations whose target is the given kind.
    pub fn relations_to(&self, kind: EntityKind) -> impl Iterator<Item = &RelationDef> {
        self.relations.iter().filter(move |r| r.to_entity == kind)
    }

    /// Get all constraints for a kind.
    pub fn constraints_for(&self, kind: EntityKind) -> impl Iterator<Item = &ConstraintDef> {
        self.constraints.iter().filter(move |c| c.entity == kind)
    }
}

impl Default for SchemaBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_defined() {
        let schema = SchemaBundle::courseinfo();
        for kind in EntityKind::ALL {
            let entity = schema.get_entity(kind).unwrap();
            assert!(!entity.default_order.is_empty(), "{kind} has no default order");
            assert_eq!(schema.constraints_for(kind).count(), 1, "{kind} needs one unique constraint");
        }
    }

    #[test]
    fn test_relations_match_reference_fields() {
        let schema = SchemaBundle::courseinfo();
        for entity in schema.entities.values() {
            for field in entity.reference_fields() {
                let relation = schema
                    .relations_from(entity.kind)
                    .find(|r| r.from_field == field.name)
                    .unwrap_or_else(|| panic!("no relation for {}.{}", entity.kind, field.name));
                assert_eq!(Some(relation.to_entity), field.field_type.referenced_kind());
            }
        }
    }

    #[test]
    fn test_dependents_table() {
        let schema = SchemaBundle::courseinfo();
        let dependents = |kind| {
            schema
                .relations_to(kind)
                .map(|r| (r.from_entity, r.from_field.as_str()))
                .collect::<Vec<_>>()
        };

        assert_eq!(dependents(EntityKind::Instructor), vec![(EntityKind::Section, "instructor")]);
        assert_eq!(dependents(EntityKind::Section), vec![(EntityKind::Registration, "section")]);
        assert_eq!(dependents(EntityKind::Year), vec![(EntityKind::Semester, "year")]);
        assert!(dependents(EntityKind::Registration).is_empty());
    }

    #[test]
    fn test_constraint_fields_exist() {
        let schema = SchemaBundle::courseinfo();
        for constraint in &schema.constraints {
            let entity = schema.get_entity(constraint.entity).unwrap();
            for field in &constraint.fields {
                assert!(entity.get_field(field).is_some(), "{}.{field}", constraint.entity);
            }
        }
    }
}
