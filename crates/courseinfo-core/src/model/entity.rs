//! Typed records for every entity kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityId, FieldValue};
use crate::catalog::EntityKind;
use crate::error::Error;

/// An academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    pub year: i32,
}

/// A named period within a year (Spring, Summer, Fall).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub period_sequence: i32,
    pub period_name: String,
}

/// A period of a particular year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub year: EntityId,
    pub period: EntityId,
}

/// A course offered by the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_number: String,
    pub course_name: String,
}

/// A person teaching sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub disambiguator: String,
}

/// A person registering for sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub disambiguator: String,
}

/// An offering of a course in a semester, taught by one instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_name: String,
    pub semester: EntityId,
    pub course: EntityId,
    pub instructor: EntityId,
}

/// A student enrolled in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub student: EntityId,
    pub section: EntityId,
}

/// A record of any kind.
///
/// Serializes as the bare field object; the kind travels separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Year(Year),
    Period(Period),
    Semester(Semester),
    Course(Course),
    Instructor(Instructor),
    Student(Student),
    Section(Section),
    Registration(Registration),
}

impl Entity {
    /// Kind of this record.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Year(_) => EntityKind::Year,
            Entity::Period(_) => EntityKind::Period,
            Entity::Semester(_) => EntityKind::Semester,
            Entity::Course(_) => EntityKind::Course,
            Entity::Instructor(_) => EntityKind::Instructor,
            Entity::Student(_) => EntityKind::Student,
            Entity::Section(_) => EntityKind::Section,
            Entity::Registration(_) => EntityKind::Registration,
        }
    }

    /// Value of a named field, or `None` if the kind has no such field.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        let text = |s: &String| Some(FieldValue::Text(s.clone()));
        let int = |i: i32| Some(FieldValue::Integer(i64::from(i)));
        let reference = |id: EntityId| Some(FieldValue::Reference(id));

        match (self, name) {
            (Entity::Year(y), "year") => int(y.year),
            (Entity::Period(p), "period_sequence") => int(p.period_sequence),
            (Entity::Period(p), "period_name") => text(&p.period_name),
            (Entity::Semester(s), "year") => reference(s.year),
            (Entity::Semester(s), "period") => reference(s.period),
            (Entity::Course(c), "course_number") => text(&c.course_number),
            (Entity::Course(c), "course_name") => text(&c.course_name),
            (Entity::Instructor(p), _) => person_field(&p.first_name, &p.last_name, &p.disambiguator, name),
            (Entity::Student(p), _) => person_field(&p.first_name, &p.last_name, &p.disambiguator, name),
            (Entity::Section(s), "section_name") => text(&s.section_name),
            (Entity::Section(s), "semester") => reference(s.semester),
            (Entity::Section(s), "course") => reference(s.course),
            (Entity::Section(s), "instructor") => reference(s.instructor),
            (Entity::Registration(r), "student") => reference(r.student),
            (Entity::Registration(r), "section") => reference(r.section),
            _ => None,
        }
    }

    /// Build a record from a normalized field map.
    pub fn from_fields(kind: EntityKind, fields: &BTreeMap<String, FieldValue>) -> Result<Self, Error> {
        let f = Fields { kind, fields };
        let entity = match kind {
            EntityKind::Year => Entity::Year(Year {
                year: f.integer("year")?,
            }),
            EntityKind::Period => Entity::Period(Period {
                period_sequence: f.integer("period_sequence")?,
                period_name: f.text("period_name")?,
            }),
            EntityKind::Semester => Entity::Semester(Semester {
                year: f.reference("year")?,
                period: f.reference("period")?,
            }),
            EntityKind::Course => Entity::Course(Course {
                course_number: f.text("course_number")?,
                course_name: f.text("course_name")?,
            }),
            EntityKind::Instructor => Entity::Instructor(Instructor {
                first_name: f.text("first_name")?,
                last_name: f.text("last_name")?,
                disambiguator: f.optional_text("disambiguator")?,
            }),
            EntityKind::Student => Entity::Student(Student {
                first_name: f.text("first_name")?,
                last_name: f.text("last_name")?,
                disambiguator: f.optional_text("disambiguator")?,
            }),
            EntityKind::Section => Entity::Section(Section {
                section_name: f.text("section_name")?,
                semester: f.reference("semester")?,
                course: f.reference("course")?,
                instructor: f.reference("instructor")?,
            }),
            EntityKind::Registration => Entity::Registration(Registration {
                student: f.reference("student")?,
                section: f.reference("section")?,
            }),
        };
        Ok(entity)
    }

    /// Encode the field payload as JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Decode a field payload stored for `kind`.
    pub fn decode(kind: EntityKind, bytes: &[u8]) -> Result<Self, Error> {
        fn parse<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, Error> {
            serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
        }

        Ok(match kind {
            EntityKind::Year => Entity::Year(parse(bytes)?),
            EntityKind::Period => Entity::Period(parse(bytes)?),
            EntityKind::Semester => Entity::Semester(parse(bytes)?),
            EntityKind::Course => Entity::Course(parse(bytes)?),
            EntityKind::Instructor => Entity::Instructor(parse(bytes)?),
            EntityKind::Student => Entity::Student(parse(bytes)?),
            EntityKind::Section => Entity::Section(parse(bytes)?),
            EntityKind::Registration => Entity::Registration(parse(bytes)?),
        })
    }
}

fn person_field(first: &str, last: &str, disambiguator: &str, name: &str) -> Option<FieldValue> {
    let value = match name {
        "first_name" => first,
        "last_name" => last,
        "disambiguator" => disambiguator,
        _ => return None,
    };
    Some(FieldValue::Text(value.to_string()))
}

struct Fields<'a> {
    kind: EntityKind,
    fields: &'a BTreeMap<String, FieldValue>,
}

impl Fields<'_> {
    fn missing(&self, name: &str) -> Error {
        Error::InvalidData(format!("{} field {name} is missing or has the wrong type", self.kind))
    }

    fn text(&self, name: &str) -> Result<String, Error> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_text)
            .map(str::to_string)
            .ok_or_else(|| self.missing(name))
    }

    fn optional_text(&self, name: &str) -> Result<String, Error> {
        match self.fields.get(name) {
            None => Ok(String::new()),
            Some(_) => self.text(name),
        }
    }

    fn integer(&self, name: &str) -> Result<i32, Error> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_integer)
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| self.missing(name))
    }

    fn reference(&self, name: &str) -> Result<EntityId, Error> {
        self.fields
            .get(name)
            .and_then(FieldValue::as_reference)
            .ok_or_else(|| self.missing(name))
    }
}
