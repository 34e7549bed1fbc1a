//! Semantic catalog for courseinfo.
//!
//! The catalog stores metadata about entities, relations, and uniqueness
//! constraints. The relation table doubles as the deletion guard's list of
//! (dependent kind, foreign key field) pairs to scan.

mod catalog;
mod constraint;
mod entity;
mod field;
mod kind;
mod relation;
mod schema;
mod types;

pub use catalog::Catalog;
pub use constraint::ConstraintDef;
pub use entity::{EntityDef, OrderBy, OrderDirection};
pub use field::FieldDef;
pub use kind::{EntityKind, ParseKindError};
pub use relation::RelationDef;
pub use schema::SchemaBundle;
pub use types::FieldType;
