//! courseinfo core - catalog, validation, storage, and the deletion guard
//! for course-registration records.
//!
//! The [`Registry`] is the entry point: every operation takes an
//! [`ActorContext`], checks the matching permission, and then validates,
//! lists, or writes through the sled-backed [`StorageEngine`].

pub mod catalog;
pub mod constraint;
pub mod error;
pub mod guard;
pub mod model;
pub mod query;
pub mod registry;
pub mod security;
pub mod storage;
pub mod validation;

pub use catalog::{Catalog, EntityKind, OrderBy, OrderDirection, SchemaBundle};
pub use constraint::{ConstraintValidator, UniqueIndex};
pub use error::{ConstraintError, Error};
pub use guard::{Deletability, DeletionCheck, DeletionGuard, DeletionRefused, DependentRecord};
pub use model::{Entity, EntityId, FieldValue};
pub use query::{DetailView, ListRequest, Page, PageLimits, RecordView};
pub use registry::Registry;
pub use security::{Action, ActorAuthenticator, ActorContext, PermissionSet, SecurityError};
pub use storage::{Record, StorageConfig, StorageEngine};
pub use validation::{normalize_and_validate, NormalizedForm, ValidationError};
