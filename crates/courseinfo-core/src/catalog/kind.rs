//! The closed set of entity kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag selecting one of the course-registration entity kinds.
///
/// Every operation in the crate dispatches on this tag instead of on a
/// runtime type name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Academic year.
    Year,
    /// Period within a year (Spring, Summer, ...).
    Period,
    /// A (year, period) pair.
    Semester,
    /// Catalog course.
    Course,
    /// Person teaching sections.
    Instructor,
    /// Person registering for sections.
    Student,
    /// Offering of a course in a semester by an instructor.
    Section,
    /// A student enrolled in a section.
    Registration,
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind: {0}")]
pub struct ParseKindError(pub String);

impl EntityKind {
    /// All kinds, in dependency order (referenced kinds first).
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Year,
        EntityKind::Period,
        EntityKind::Semester,
        EntityKind::Course,
        EntityKind::Instructor,
        EntityKind::Student,
        EntityKind::Section,
        EntityKind::Registration,
    ];

    /// Lowercase name used in paths, permission codenames, and storage keys.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Year => "year",
            EntityKind::Period => "period",
            EntityKind::Semester => "semester",
            EntityKind::Course => "course",
            EntityKind::Instructor => "instructor",
            EntityKind::Student => "student",
            EntityKind::Section => "section",
            EntityKind::Registration => "registration",
        }
    }

    /// Capitalized name for messages.
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Year => "Year",
            EntityKind::Period => "Period",
            EntityKind::Semester => "Semester",
            EntityKind::Course => "Course",
            EntityKind::Instructor => "Instructor",
            EntityKind::Student => "Student",
            EntityKind::Section => "Section",
            EntityKind::Registration => "Registration",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}
