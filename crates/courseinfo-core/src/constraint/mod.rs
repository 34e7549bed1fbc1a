//! Constraint enforcement module.
//!
//! Unique constraints (single and composite) are kept in a dedicated sled
//! tree and checked inside the same transaction that writes the record.

mod unique_index;
mod validator;

pub use unique_index::{UniqueIndex, UniqueKey, UNIQUE_INDEX_TREE};
pub use validator::ConstraintValidator;
