//! Security-specific error types.

use thiserror::Error;

/// Security-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// Permission denied for the requested operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid permission string format.
    #[error("invalid permission format: {0}")]
    InvalidPermissionFormat(String),
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SecurityError::PermissionDenied("guest lacks delete_section".to_string());
        assert_eq!(err.to_string(), "permission denied: guest lacks delete_section");

        let err = SecurityError::InvalidPermissionFormat("frobnicate_year".into());
        assert!(err.to_string().contains("frobnicate_year"));
    }
}
