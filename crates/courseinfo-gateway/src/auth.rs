//! API key authentication.
//!
//! Each key maps to a username and a list of grants. Grants are permission
//! codenames (`view_year`, `delete_*`) or `admin` for a superuser.
//!
//! # Configuration
//!
//! Set `COURSEINFO_API_KEYS` (or `--api-keys`) with format:
//! ```text
//! username:key:grant,grant;username:key:grant
//! ```
//!
//! # Example
//!
//! ```text
//! COURSEINFO_API_KEYS="registrar:r-key:view_*,add_*,change_*;root:root-key:admin"
//! ```

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use courseinfo_core::{ActorAuthenticator, ActorContext, SecurityError};
use courseinfo_core::security::SecurityResult;
use parking_lot::RwLock;

use crate::error::AppError;
use crate::AppState;

/// Header carrying a bare API key.
pub const API_KEY_HEADER: &str = "x-api-key";

struct KeyEntry {
    username: String,
    grants: Vec<String>,
}

/// Authenticator that resolves API keys to actors.
pub struct ApiKeyAuthenticator {
    keys: RwLock<HashMap<String, KeyEntry>>,
}

impl ApiKeyAuthenticator {
    /// Create an empty authenticator.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Register an API key for `username` with its grants.
    ///
    /// Grants are checked here so a bad configuration fails at startup.
    pub fn register_key(
        &self,
        username: impl Into<String>,
        key: impl Into<String>,
        grants: Vec<String>,
    ) -> SecurityResult<()> {
        let username = username.into();
        ActorContext::from_grants(username.clone(), &grants)?;
        self.keys.write().insert(key.into(), KeyEntry { username, grants });
        Ok(())
    }

    /// Parse a `username:key:grant,grant;...` specification.
    pub fn parse(spec: &str) -> SecurityResult<Self> {
        let auth = Self::new();
        for entry in spec.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let mut parts = entry.splitn(3, ':');
            let (Some(username), Some(key), Some(grants)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(SecurityError::InvalidPermissionFormat(format!(
                    "expected username:key:grants, got '{entry}'"
                )));
            };
            let (username, key) = (username.trim(), key.trim());
            if username.is_empty() || key.is_empty() {
                return Err(SecurityError::InvalidPermissionFormat(format!(
                    "empty username or key in '{entry}'"
                )));
            }

            let grants = grants
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
            auth.register_key(username, key, grants)?;
        }
        Ok(auth)
    }

    /// Check if a key is registered.
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.read().contains_key(key)
    }

    /// Number of registered keys.
    pub fn key_count(&self) -> usize {
        self.keys.read().len()
    }
}

impl Default for ApiKeyAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorAuthenticator for ApiKeyAuthenticator {
    fn authenticate(&self, credential: &str) -> SecurityResult<ActorContext> {
        let keys = self.keys.read();
        match keys.get(credential) {
            Some(entry) => ActorContext::from_grants(entry.username.clone(), &entry.grants),
            None => Err(SecurityError::AuthenticationFailed("unknown API key".to_string())),
        }
    }
}

/// The authenticated caller of a request.
///
/// Reads `Authorization: Bearer <key>` or `X-Api-Key: <key>`. Requests
/// without a known key are rejected with 401.
pub struct Actor(pub ActorContext);

#[axum::async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credential = bearer_token(parts)
            .or_else(|| header_value(parts, API_KEY_HEADER))
            .ok_or_else(|| AppError::Unauthorized("missing API key".to_string()))?;

        state
            .authenticator
            .authenticate(credential)
            .map(Actor)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    header_value(parts, AUTHORIZATION.as_str())?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use courseinfo_core::{Action, EntityKind};

    use super::*;

    #[test]
    fn test_parse_and_authenticate() {
        let auth = ApiKeyAuthenticator::parse("clerk:k1:view_*,add_student; root:k2:admin").unwrap();
        assert_eq!(auth.key_count(), 2);
        assert!(auth.has_key("k1"));

        let clerk = auth.authenticate("k1").unwrap();
        assert_eq!(clerk.username, "clerk");
        assert!(clerk.can(Action::View, EntityKind::Section));
        assert!(clerk.can(Action::Add, EntityKind::Student));
        assert!(!clerk.can(Action::Delete, EntityKind::Student));

        let root = auth.authenticate("k2").unwrap();
        assert!(root.superuser);
    }

    #[test]
    fn test_unknown_key() {
        let auth = ApiKeyAuthenticator::parse("clerk:k1:view_year").unwrap();
        assert!(matches!(
            auth.authenticate("nope"),
            Err(SecurityError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn test_malformed_spec() {
        assert!(ApiKeyAuthenticator::parse("just-a-key").is_err());
        assert!(ApiKeyAuthenticator::parse("clerk:k1:fly_year").is_err());
    }
}
