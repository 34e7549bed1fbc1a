//! Storage engine implementation.

use sled::{Db, Tree};

use super::key::RecordKey;
use super::{Record, StorageConfig, Transaction};
use crate::catalog::{Catalog, EntityKind};
use crate::constraint::UniqueIndex;
use crate::error::Error;
use crate::model::{Entity, EntityId, Lookup};

/// Tree name for entity records.
const RECORDS_TREE: &str = "records";

/// The main storage engine wrapping sled.
pub struct StorageEngine {
    /// The underlying sled database.
    db: Db,

    /// Tree for entity records (`kind\0id` -> record envelope).
    records_tree: Tree,

    /// Unique constraint index.
    unique_index: UniqueIndex,
}

impl StorageEngine {
    /// Open or create a storage engine with the given configuration.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let records_tree = db.open_tree(RECORDS_TREE)?;
        let unique_index = UniqueIndex::open(&db)?;

        tracing::debug!(
            path = %config.path.display(),
            temporary = config.temporary,
            recovered = db.was_recovered(),
            "storage opened"
        );

        Ok(Self {
            db,
            records_tree,
            unique_index,
        })
    }

    /// Check if the database was recovered from a previous run.
    pub fn was_recovered(&self) -> bool {
        self.db.was_recovered()
    }

    /// Allocate a fresh record id. Ids start at 1.
    pub fn generate_id(&self) -> Result<EntityId, Error> {
        Ok(EntityId(self.db.generate_id()? + 1))
    }

    /// Get the stored envelope of a record.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<Option<Record>, Error> {
        match self.records_tree.get(RecordKey::new(kind, id).encode())? {
            Some(bytes) => Ok(Some(Record::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a decoded record.
    pub fn fetch(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>, Error> {
        match self.get(kind, id)? {
            Some(record) => Ok(Some(Entity::decode(kind, &record.data)?)),
            None => Ok(None),
        }
    }

    /// Check whether a record exists.
    pub fn exists(&self, kind: EntityKind, id: EntityId) -> Result<bool, Error> {
        Ok(self.records_tree.contains_key(RecordKey::new(kind, id).encode())?)
    }

    /// Scan every record of a kind in id order.
    pub fn scan(&self, kind: EntityKind) -> impl Iterator<Item = Result<(EntityId, Entity), Error>> + '_ {
        self.records_tree
            .scan_prefix(RecordKey::kind_prefix(kind))
            .map(move |result| {
                let (key_bytes, value_bytes) = result?;
                let key = RecordKey::decode(&key_bytes).ok_or(Error::InvalidKey)?;
                let record = Record::from_bytes(&value_bytes)?;
                Ok((key.id, Entity::decode(kind, &record.data)?))
            })
    }

    /// Number of records of a kind.
    pub fn count(&self, kind: EntityKind) -> Result<usize, Error> {
        let mut count = 0;
        for entry in self.records_tree.scan_prefix(RecordKey::kind_prefix(kind)).keys() {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Begin a transaction checked against the catalog's constraints.
    pub fn transaction<'a>(&'a self, catalog: &'a Catalog) -> Transaction<'a> {
        Transaction::new(self, catalog)
    }

    /// Unique constraint index.
    pub fn unique_index(&self) -> &UniqueIndex {
        &self.unique_index
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the size of the database on disk.
    pub fn size_on_disk(&self) -> Result<u64, Error> {
        Ok(self.db.size_on_disk()?)
    }

    pub(crate) fn records_tree(&self) -> &Tree {
        &self.records_tree
    }

    /// Get a reference to the underlying sled database.
    pub fn db(&self) -> &Db {
        &self.db
    }
}

impl Lookup for StorageEngine {
    fn lookup(&self, kind: EntityKind, id: EntityId) -> Result<Option<Entity>, Error> {
        self.fetch(kind, id)
    }
}
