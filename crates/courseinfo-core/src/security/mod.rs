//! Security module for courseinfo.
//!
//! Every registry operation takes an [`ActorContext`] and checks the
//! matching permission before reading or writing any record:
//!
//! | Operation | Permission |
//! |---|---|
//! | list, detail | `view_<kind>` |
//! | create | `add_<kind>` |
//! | update | `change_<kind>` |
//! | delete, check-deletable | `delete_<kind>` |
//!
//! # Example
//!
//! ```
//! use courseinfo_core::catalog::EntityKind;
//! use courseinfo_core::security::{Action, ActorContext};
//!
//! let ctx = ActorContext::from_grants("registrar", &["view_*", "add_student"]).unwrap();
//! assert!(ctx.can(Action::Add, EntityKind::Student));
//! assert!(ctx.require(Action::Delete, EntityKind::Student).is_err());
//! ```

pub mod context;
pub mod error;
pub mod permission;

pub use context::{ActorAuthenticator, ActorContext, SUPERUSER_GRANT};
pub use error::{SecurityError, SecurityResult};
pub use permission::{Action, KindScope, Permission, PermissionSet};
