//! Record model: ids, field values, typed entities and their presentation.

mod display;
mod entity;
mod id;
mod value;

pub use display::{Lookup, Presenter};
pub use entity::{
    Course, Entity, Instructor, Period, Registration, Section, Semester, Student, Year,
};
pub use id::{record_path, EntityId};
pub use value::FieldValue;
