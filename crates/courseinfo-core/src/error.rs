//! Core error types.

use thiserror::Error;

use crate::catalog::EntityKind;
use crate::guard::DeletionRefused;
use crate::model::EntityId;
use crate::security::SecurityError;
use crate::validation::ValidationError;

/// Core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Key decoding error.
    #[error("invalid key format")]
    InvalidKey,

    /// Record not found.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind that was looked up.
        kind: EntityKind,
        /// Id that was looked up.
        id: EntityId,
    },

    /// Input failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Write rejected by a storage constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[from] ConstraintError),

    /// Delete refused because dependents exist.
    #[error(transparent)]
    DeletionRefused(#[from] DeletionRefused),

    /// Permission check failed.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Shorthand for a missing record.
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Error::NotFound { kind, id }
    }
}

/// Constraint errors raised at the storage boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// Unique constraint violated.
    #[error("{entity} with this {} already exists ({value})", fields.join(", "))]
    UniqueViolation {
        /// Constraint name.
        constraint: String,
        /// Entity kind.
        entity: EntityKind,
        /// Fields covered by the constraint.
        fields: Vec<String>,
        /// Conflicting value tuple.
        value: String,
    },
}

impl ConstraintError {
    /// Name of the violated constraint.
    pub fn constraint(&self) -> &str {
        match self {
            ConstraintError::UniqueViolation { constraint, .. } => constraint,
        }
    }
}
