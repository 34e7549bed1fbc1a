//! Error handling for the gateway.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courseinfo_core::{Error as CoreError, SecurityError};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error raised by the registry.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Missing or unknown credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Map<String, Value>) {
        let mut extra = Map::new();
        let (status, code) = match self {
            AppError::Core(CoreError::Validation(err)) => {
                extra.insert("fields".into(), json!(err.errors));
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            AppError::Core(CoreError::ConstraintViolation(err)) => {
                extra.insert("constraint".into(), json!(err.constraint()));
                (StatusCode::CONFLICT, "DUPLICATE")
            }
            AppError::Core(CoreError::DeletionRefused(refused)) => {
                extra.insert("dependents".into(), json!(refused.dependents));
                (StatusCode::CONFLICT, "DELETION_REFUSED")
            }
            AppError::Core(CoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Core(CoreError::Security(SecurityError::AuthenticationFailed(_))) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            AppError::Core(CoreError::Security(_)) => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            AppError::Core(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };
        (status, code, extra)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, mut body) = self.parts();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        body.insert("code".into(), json!(code));
        body.insert("message".into(), json!(self.to_string()));

        let body = json!({
            "success": false,
            "error": body,
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use courseinfo_core::{EntityId, EntityKind, ValidationError};

    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(CoreError::from(ValidationError::field(EntityKind::Year, "year", "This field is required."))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(CoreError::not_found(EntityKind::Year, EntityId(1))),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(CoreError::from(SecurityError::PermissionDenied("x".into()))),
                StatusCode::FORBIDDEN,
            ),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::from(CoreError::InvalidData("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
