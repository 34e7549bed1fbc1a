//! Per-kind permissions in `<action>_<kind>` form.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::{SecurityError, SecurityResult};
use crate::catalog::EntityKind;

/// Operation class a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// List and detail.
    View,
    /// Create.
    Add,
    /// Update.
    Change,
    /// Delete and check-deletable.
    Delete,
}

impl Action {
    /// Codename prefix.
    pub fn name(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Action::View),
            "add" => Some(Action::Add),
            "change" => Some(Action::Change),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kinds a permission covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindScope {
    /// Every kind (`view_*`).
    All,
    /// A single kind.
    Kind(EntityKind),
}

impl KindScope {
    /// Check if this scope covers the kind.
    pub fn matches(&self, kind: EntityKind) -> bool {
        match self {
            KindScope::All => true,
            KindScope::Kind(k) => *k == kind,
        }
    }
}

/// A single grant such as `change_instructor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub action: Action,
    pub scope: KindScope,
}

impl Permission {
    /// Permission for one action on one kind.
    pub fn new(action: Action, kind: EntityKind) -> Self {
        Self {
            action,
            scope: KindScope::Kind(kind),
        }
    }

    /// Permission for one action on every kind.
    pub fn all(action: Action) -> Self {
        Self {
            action,
            scope: KindScope::All,
        }
    }

    /// Parse a codename.
    ///
    /// Examples:
    /// - `view_year` - list and detail years
    /// - `delete_section` - delete sections
    /// - `add_*` - create records of every kind
    pub fn parse(s: &str) -> SecurityResult<Self> {
        let invalid = || SecurityError::InvalidPermissionFormat(s.to_string());
        let (action, scope) = s.trim().split_once('_').ok_or_else(invalid)?;
        let action = Action::parse(action).ok_or_else(invalid)?;
        let scope = match scope {
            "*" => KindScope::All,
            kind => KindScope::Kind(kind.parse().map_err(|_| invalid())?),
        };
        Ok(Self { action, scope })
    }

    /// Check if this permission allows `action` on `kind`.
    pub fn allows(&self, action: Action, kind: EntityKind) -> bool {
        self.action == action && self.scope.matches(kind)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            KindScope::All => write!(f, "{}_*", self.action),
            KindScope::Kind(kind) => write!(f, "{}_{kind}", self.action),
        }
    }
}

/// A set of permissions with efficient lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse permissions from codenames.
    pub fn from_strings<S: AsRef<str>>(strings: &[S]) -> SecurityResult<Self> {
        let permissions = strings
            .iter()
            .map(|s| Permission::parse(s.as_ref()))
            .collect::<SecurityResult<HashSet<_>>>()?;
        Ok(Self { permissions })
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, permission: Permission) -> Self {
        self.add(permission);
        self
    }

    /// Check if any permission allows `action` on `kind`.
    pub fn allows(&self, action: Action, kind: EntityKind) -> bool {
        self.permissions.iter().any(|p| p.allows(action, kind))
    }

    /// Codenames in sorted order.
    pub fn to_strings(&self) -> Vec<String> {
        let mut names: Vec<_> = self.permissions.iter().map(ToString::to_string).collect();
        names.sort();
        names
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Get the number of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }
}
