//! Atomic writes of records together with their unique-index entries.

use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use sled::Transactional;

use super::key::RecordKey;
use super::{Record, StorageEngine};
use crate::catalog::{Catalog, EntityKind};
use crate::constraint::{ConstraintValidator, UniqueKey};
use crate::error::Error;
use crate::model::{Entity, EntityId};

type TxResult<T> = Result<T, ConflictableTransactionError<Error>>;

/// A pending operation in a transaction.
#[derive(Debug, Clone)]
pub enum TransactionOp {
    /// Create a record under a fresh id.
    Insert {
        /// Id allocated for the record.
        id: EntityId,
        /// Record fields.
        entity: Entity,
    },
    /// Replace an existing record's fields.
    Update {
        /// Id of the record.
        id: EntityId,
        /// New record fields.
        entity: Entity,
    },
    /// Remove a record.
    Delete {
        /// Kind of the record.
        kind: EntityKind,
        /// Id of the record.
        id: EntityId,
    },
}

/// Op with its payload and claims computed ahead of the sled transaction.
struct PreparedOp {
    key: RecordKey,
    mode: Mode,
    payload: Option<Vec<u8>>,
    claims: Vec<UniqueKey>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Insert,
    Update,
    Delete,
}

/// A transaction for atomic multi-record writes.
///
/// Operations are collected and executed atomically on commit. Every record
/// write also releases the unique keys of the previous version and claims
/// the keys of the new one; a claim held by another record aborts the whole
/// transaction with a constraint violation.
pub struct Transaction<'a> {
    engine: &'a StorageEngine,
    catalog: &'a Catalog,
    ops: Vec<TransactionOp>,
}

impl<'a> Transaction<'a> {
    /// Create a new transaction.
    pub(crate) fn new(engine: &'a StorageEngine, catalog: &'a Catalog) -> Self {
        Self {
            engine,
            catalog,
            ops: Vec::new(),
        }
    }

    /// Queue an insert operation.
    pub fn insert(&mut self, id: EntityId, entity: Entity) -> &mut Self {
        self.ops.push(TransactionOp::Insert { id, entity });
        self
    }

    /// Queue an update operation.
    pub fn update(&mut self, id: EntityId, entity: Entity) -> &mut Self {
        self.ops.push(TransactionOp::Update { id, entity });
        self
    }

    /// Queue a delete operation.
    pub fn delete(&mut self, kind: EntityKind, id: EntityId) -> &mut Self {
        self.ops.push(TransactionOp::Delete { kind, id });
        self
    }

    /// Get the pending operations.
    pub fn operations(&self) -> &[TransactionOp] {
        &self.ops
    }

    /// Commit the transaction atomically.
    ///
    /// All operations succeed or none do.
    pub fn commit(self) -> Result<(), Error> {
        if self.ops.is_empty() {
            return Ok(());
        }

        let validator = ConstraintValidator::new(self.catalog);
        let prepared = self.prepare(&validator)?;

        let records_tree = self.engine.records_tree();
        let unique_tree = self.engine.unique_index().tree();

        let result: Result<(), TransactionError<Error>> =
            (records_tree, unique_tree).transaction(|(data_tx, unique_tx)| {
                for op in &prepared {
                    Self::execute(data_tx, unique_tx, &validator, op)?;
                }
                Ok(())
            });

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(Error::Storage(e)),
        }
    }

    fn prepare(&self, validator: &ConstraintValidator<'_>) -> Result<Vec<PreparedOp>, Error> {
        self.ops
            .iter()
            .map(|op| {
                Ok(match op {
                    TransactionOp::Insert { id, entity } | TransactionOp::Update { id, entity } => {
                        let mode = match op {
                            TransactionOp::Insert { .. } => Mode::Insert,
                            _ => Mode::Update,
                        };
                        PreparedOp {
                            key: RecordKey::new(entity.kind(), *id),
                            mode,
                            payload: Some(entity.encode()?),
                            claims: validator.unique_keys(entity)?,
                        }
                    }
                    TransactionOp::Delete { kind, id } => PreparedOp {
                        key: RecordKey::new(*kind, *id),
                        mode: Mode::Delete,
                        payload: None,
                        claims: Vec::new(),
                    },
                })
            })
            .collect()
    }

    fn execute(
        data_tx: &TransactionalTree,
        unique_tx: &TransactionalTree,
        validator: &ConstraintValidator<'_>,
        op: &PreparedOp,
    ) -> TxResult<()> {
        let key = op.key.encode();
        let id_bytes = op.key.id.to_be_bytes();

        let previous = match data_tx.get(&key)? {
            Some(bytes) => {
                let record = Record::from_bytes(&bytes).map_err(abort)?;
                let entity = Entity::decode(op.key.kind, &record.data).map_err(abort)?;
                Some((record, entity))
            }
            None => None,
        };

        match (op.mode, &previous) {
            (Mode::Insert, Some(_)) => {
                return Err(abort(Error::InvalidData(format!(
                    "{} {} already exists",
                    op.key.kind, op.key.id
                ))));
            }
            (Mode::Update | Mode::Delete, None) => {
                return Err(abort(Error::not_found(op.key.kind, op.key.id)));
            }
            _ => {}
        }

        // Release the previous version's claims before taking new ones, so an
        // update that keeps its own values does not collide with itself.
        if let Some((_, entity)) = &previous {
            for released in validator.unique_keys(entity).map_err(abort)? {
                unique_tx.remove(released.encode())?;
            }
        }

        for claim in &op.claims {
            let claim_key = claim.encode();
            if let Some(holder) = unique_tx.get(&claim_key)? {
                if holder.as_ref() != id_bytes.as_slice() {
                    return Err(abort(Error::ConstraintViolation(claim.violation())));
                }
            }
            unique_tx.insert(claim_key, id_bytes.as_slice())?;
        }

        match &op.payload {
            Some(payload) => {
                let record = match &previous {
                    Some((record, _)) => record.revise(payload.clone()),
                    None => Record::new(payload.clone()),
                };
                data_tx.insert(key, record.to_bytes().map_err(abort)?)?;
            }
            None => {
                data_tx.remove(key)?;
            }
        }

        Ok(())
    }
}

fn abort(e: Error) -> ConflictableTransactionError<Error> {
    ConflictableTransactionError::Abort(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintError;
    use crate::model::{Instructor, Year};
    use crate::storage::StorageConfig;

    fn engine() -> StorageEngine {
        StorageEngine::open(StorageConfig::temporary()).unwrap()
    }

    fn instructor(first: &str, last: &str) -> Entity {
        Entity::Instructor(Instructor {
            first_name: first.into(),
            last_name: last.into(),
            disambiguator: String::new(),
        })
    }

    fn insert(engine: &StorageEngine, catalog: &Catalog, entity: Entity) -> Result<EntityId, Error> {
        let id = engine.generate_id()?;
        let mut tx = engine.transaction(catalog);
        tx.insert(id, entity);
        tx.commit()?;
        Ok(id)
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let engine = engine();
        let catalog = Catalog::courseinfo();
        insert(&engine, &catalog, instructor("Swiftwind", "Hoson")).unwrap();

        let err = insert(&engine, &catalog, instructor("Swiftwind", "Hoson")).unwrap_err();
        assert!(matches!(
            err,
            Error::ConstraintViolation(ConstraintError::UniqueViolation { ref constraint, .. })
                if constraint == "unique_instructor"
        ));
        assert_eq!(engine.count(EntityKind::Instructor).unwrap(), 1);
    }

    #[test]
    fn test_update_keeping_values_is_not_a_duplicate() {
        let engine = engine();
        let catalog = Catalog::courseinfo();
        let id = insert(&engine, &catalog, Entity::Year(Year { year: 2024 })).unwrap();
        let created = engine.get(EntityKind::Year, id).unwrap().unwrap().created_at;

        let mut tx = engine.transaction(&catalog);
        tx.update(id, Entity::Year(Year { year: 2024 }));
        tx.commit().unwrap();

        assert_eq!(engine.get(EntityKind::Year, id).unwrap().unwrap().created_at, created);
    }

    #[test]
    fn test_update_releases_old_value() {
        let engine = engine();
        let catalog = Catalog::courseinfo();
        let id = insert(&engine, &catalog, Entity::Year(Year { year: 2024 })).unwrap();

        let mut tx = engine.transaction(&catalog);
        tx.update(id, Entity::Year(Year { year: 2025 }));
        tx.commit().unwrap();

        insert(&engine, &catalog, Entity::Year(Year { year: 2024 })).unwrap();
        assert!(insert(&engine, &catalog, Entity::Year(Year { year: 2025 })).is_err());
        assert_eq!(engine.unique_index().len(), 2);
    }

    #[test]
    fn test_update_into_taken_value_changes_nothing() {
        let engine = engine();
        let catalog = Catalog::courseinfo();
        insert(&engine, &catalog, Entity::Year(Year { year: 2024 })).unwrap();
        let id = insert(&engine, &catalog, Entity::Year(Year { year: 2025 })).unwrap();

        let mut tx = engine.transaction(&catalog);
        tx.update(id, Entity::Year(Year { year: 2024 }));
        assert!(matches!(tx.commit(), Err(Error::ConstraintViolation(_))));

        assert_eq!(engine.fetch(EntityKind::Year, id).unwrap(), Some(Entity::Year(Year { year: 2025 })));
        let key = ConstraintValidator::new(&catalog)
            .unique_keys(&Entity::Year(Year { year: 2025 }))
            .unwrap();
        assert_eq!(engine.unique_index().lookup(&key[0]).unwrap(), Some(id));
    }

    #[test]
    fn test_delete_frees_unique_values() {
        let engine = engine();
        let catalog = Catalog::courseinfo();
        let id = insert(&engine, &catalog, instructor("John", "Doe")).unwrap();

        let mut tx = engine.transaction(&catalog);
        tx.delete(EntityKind::Instructor, id);
        tx.commit().unwrap();

        assert!(engine.unique_index().is_empty());
        assert!(!engine.exists(EntityKind::Instructor, id).unwrap());
        insert(&engine, &catalog, instructor("John", "Doe")).unwrap();
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let engine = engine();
        let catalog = Catalog::courseinfo();

        let mut tx = engine.transaction(&catalog);
        tx.delete(EntityKind::Year, EntityId(99));
        assert!(matches!(tx.commit(), Err(Error::NotFound { .. })));

        let mut tx = engine.transaction(&catalog);
        tx.update(EntityId(99), Entity::Year(Year { year: 1 }));
        assert!(matches!(tx.commit(), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let engine = engine();
        let catalog = Catalog::courseinfo();

        let mut tx = engine.transaction(&catalog);
        tx.insert(engine.generate_id().unwrap(), Entity::Year(Year { year: 2030 }))
            .insert(engine.generate_id().unwrap(), Entity::Year(Year { year: 2030 }));
        assert_eq!(tx.operations().len(), 2);
        assert!(tx.commit().is_err());
        assert_eq!(engine.count(EntityKind::Year).unwrap(), 0);
    }
}
