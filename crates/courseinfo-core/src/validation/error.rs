//! Field-level validation errors.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::catalog::EntityKind;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_INTEGER: &str = "Enter a whole number.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_VALUE: &str = "Enter a valid value.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";

/// Input rejected by validation, with every failing field's messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Kind whose input was rejected.
    pub kind: EntityKind,
    /// Messages keyed by field name.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Empty error for `kind`; fill with [`add`](Self::add).
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            errors: BTreeMap::new(),
        }
    }

    /// Error with a single field message.
    pub fn field(kind: EntityKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new(kind);
        err.add(field, message);
        err
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}", self.kind)?;
        let mut sep = ": ";
        for (field, messages) in &self.errors {
            for message in messages {
                write!(f, "{sep}{field}: {message}")?;
                sep = "; ";
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
