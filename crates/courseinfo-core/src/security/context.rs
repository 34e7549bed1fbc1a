//! Caller identity passed explicitly to every operation.

use super::error::{SecurityError, SecurityResult};
use super::permission::{Action, Permission, PermissionSet};
use crate::catalog::EntityKind;

/// Grant string that marks a superuser.
pub const SUPERUSER_GRANT: &str = "admin";

/// Identity and granted permissions of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    /// Username, used in logs and denial messages.
    pub username: String,
    /// Granted permissions.
    pub permissions: PermissionSet,
    /// Superusers hold every permission.
    pub superuser: bool,
}

impl ActorContext {
    /// Create a context with the given permissions.
    pub fn new(username: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            username: username.into(),
            permissions,
            superuser: false,
        }
    }

    /// Create a context with every permission.
    pub fn superuser(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            permissions: PermissionSet::new(),
            superuser: true,
        }
    }

    /// Create a context with no permissions.
    pub fn anonymous() -> Self {
        Self::new("anonymous", PermissionSet::new())
    }

    /// Build a context from grant strings; `admin` makes a superuser.
    pub fn from_grants<S: AsRef<str>>(username: impl Into<String>, grants: &[S]) -> SecurityResult<Self> {
        let superuser = grants.iter().any(|g| g.as_ref().trim() == SUPERUSER_GRANT);
        let permissions: Vec<&str> = grants
            .iter()
            .map(|g| g.as_ref().trim())
            .filter(|g| *g != SUPERUSER_GRANT && !g.is_empty())
            .collect();
        Ok(Self {
            username: username.into(),
            permissions: PermissionSet::from_strings(&permissions)?,
            superuser,
        })
    }

    /// Check if the actor may perform `action` on `kind`.
    pub fn can(&self, action: Action, kind: EntityKind) -> bool {
        self.superuser || self.permissions.allows(action, kind)
    }

    /// Fail with `PermissionDenied` unless the actor may perform `action` on `kind`.
    pub fn require(&self, action: Action, kind: EntityKind) -> SecurityResult<()> {
        if self.can(action, kind) {
            Ok(())
        } else {
            Err(SecurityError::PermissionDenied(format!(
                "{} lacks {}",
                self.username,
                Permission::new(action, kind)
            )))
        }
    }
}

/// Resolves a presented credential to an actor.
pub trait ActorAuthenticator: Send + Sync {
    /// Authenticate a credential and return the caller's context.
    fn authenticate(&self, credential: &str) -> SecurityResult<ActorContext>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superuser_can_everything() {
        let admin = ActorContext::superuser("root");
        for kind in EntityKind::ALL {
            assert!(admin.require(Action::Delete, kind).is_ok());
        }
    }

    #[test]
    fn test_anonymous_is_denied() {
        let err = ActorContext::anonymous()
            .require(Action::View, EntityKind::Year)
            .unwrap_err();
        assert_eq!(err, SecurityError::PermissionDenied("anonymous lacks view_year".into()));
    }

    #[test]
    fn test_from_grants() {
        let ctx = ActorContext::from_grants("registrar", &["view_*", " add_student ", ""]).unwrap();
        assert!(!ctx.superuser);
        assert!(ctx.can(Action::View, EntityKind::Section));
        assert!(ctx.can(Action::Add, EntityKind::Student));
        assert!(!ctx.can(Action::Add, EntityKind::Instructor));

        let ctx = ActorContext::from_grants("root", &["admin"]).unwrap();
        assert!(ctx.superuser);
        assert!(ctx.permissions.is_empty());

        assert!(ActorContext::from_grants("x", &["nope"]).is_err());
    }
}
