//! HTTP route handlers.

pub mod entities;
pub mod health;
pub mod kinds;

use courseinfo_core::{EntityId, EntityKind};

use crate::error::AppError;

/// Parse the `:kind` path segment.
pub(crate) fn parse_kind(kind: &str) -> Result<EntityKind, AppError> {
    kind.parse()
        .map_err(|e: courseinfo_core::catalog::ParseKindError| AppError::BadRequest(e.to_string()))
}

/// Parse the `:id` path segment.
pub(crate) fn parse_id(id: &str) -> Result<EntityId, AppError> {
    id.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid record id: {id}")))
}
