//! Secondary index for enforcing unique constraints.
//!
//! The unique index is a separate sled tree mapping each claimed value tuple
//! to the id of the record holding it. Writes go through the storage
//! transaction; this type only reads.

use sled::Tree;

use crate::catalog::EntityKind;
use crate::error::{ConstraintError, Error};
use crate::model::{EntityId, FieldValue};

/// Tree name for unique constraint index.
pub const UNIQUE_INDEX_TREE: &str = "index:unique";

/// One value tuple claimed under a unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    /// Kind owning the constraint.
    pub kind: EntityKind,
    /// Constraint name.
    pub constraint: String,
    /// Constrained fields, in declaration order.
    pub fields: Vec<String>,
    /// Values of those fields.
    pub values: Vec<FieldValue>,
}

impl UniqueKey {
    /// Index key bytes.
    ///
    /// Format: `kind\0constraint\0` then each value as a big-endian `u32`
    /// byte length followed by its bytes, so no tuple can alias another.
    pub fn encode(&self) -> Vec<u8> {
        let mut key = Vec::new();
        key.extend_from_slice(self.kind.name().as_bytes());
        key.push(0);
        key.extend_from_slice(self.constraint.as_bytes());
        key.push(0);
        for value in &self.values {
            let bytes = value.to_string().into_bytes();
            key.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            key.extend_from_slice(&bytes);
        }
        key
    }

    /// The error reported when another record already holds this tuple.
    pub fn violation(&self) -> ConstraintError {
        ConstraintError::UniqueViolation {
            constraint: self.constraint.clone(),
            entity: self.kind,
            fields: self.fields.clone(),
            value: self
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Read access to the unique index.
#[derive(Clone)]
pub struct UniqueIndex {
    tree: Tree,
}

impl UniqueIndex {
    /// Create a new unique index backed by the given tree.
    pub fn new(tree: Tree) -> Self {
        Self { tree }
    }

    /// Open or create the unique index from a sled database.
    pub fn open(db: &sled::Db) -> Result<Self, Error> {
        let tree = db.open_tree(UNIQUE_INDEX_TREE)?;
        Ok(Self { tree })
    }

    /// Look up the record holding a value tuple.
    pub fn lookup(&self, key: &UniqueKey) -> Result<Option<EntityId>, Error> {
        match self.tree.get(key.encode())? {
            Some(bytes) => EntityId::from_be_slice(&bytes).map(Some).ok_or(Error::InvalidKey),
            None => Ok(None),
        }
    }

    pub(crate) fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
