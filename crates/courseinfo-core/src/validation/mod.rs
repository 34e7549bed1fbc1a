//! Input validation.
//!
//! Raw JSON submissions are trimmed, parsed, and reference-checked against
//! the catalog before anything reaches storage.

mod error;
mod form;

pub use error::{
    ValidationError, INVALID_CHOICE, INVALID_INTEGER, INVALID_VALUE, NULL_CHARACTERS, REQUIRED,
};
pub use form::{normalize_and_validate, NormalizedForm};
