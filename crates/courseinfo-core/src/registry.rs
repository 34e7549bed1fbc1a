//! Registry facade: the permission-checked operations on every kind.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, EntityKind};
use crate::error::Error;
use crate::guard::{Deletability, DeletionCheck, DeletionGuard};
use crate::model::{Entity, EntityId, Presenter};
use crate::query::{DetailView, ListRequest, ListingExecutor, Page, PageLimits, RecordView};
use crate::security::{Action, ActorContext};
use crate::storage::{StorageConfig, StorageEngine};
use crate::validation::normalize_and_validate;

/// Course-registration records with validation, uniqueness and the
/// deletion guard applied to every write.
///
/// Writes are serialized by a single lock held from validation through
/// commit, so references checked during validation and dependents scanned by
/// the guard cannot change before the write lands. Reads take no lock.
pub struct Registry {
    catalog: Catalog,
    engine: StorageEngine,
    limits: PageLimits,
    write_lock: Mutex<()>,
}

impl Registry {
    /// Open a registry over the given storage.
    pub fn open(config: StorageConfig) -> Result<Self, Error> {
        Ok(Self::new(Catalog::courseinfo(), StorageEngine::open(config)?))
    }

    /// Open a registry backed by a temporary store.
    pub fn temporary() -> Result<Self, Error> {
        Self::open(StorageConfig::temporary())
    }

    /// Create a registry from parts.
    pub fn new(catalog: Catalog, engine: StorageEngine) -> Self {
        Self {
            catalog,
            engine,
            limits: PageLimits::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Set page size limits for listings.
    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The schema catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The storage engine.
    pub fn engine(&self) -> &StorageEngine {
        &self.engine
    }

    /// Page size limits for listings.
    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    fn listing(&self) -> ListingExecutor<'_> {
        ListingExecutor::new(&self.catalog, &self.engine, self.limits)
    }

    fn guard(&self) -> DeletionGuard<'_> {
        DeletionGuard::new(&self.catalog, &self.engine)
    }

    /// List one page of records. Requires `view_<kind>`.
    pub fn list(&self, ctx: &ActorContext, kind: EntityKind, request: &ListRequest) -> Result<Page<RecordView>, Error> {
        ctx.require(Action::View, kind)?;
        self.listing().list(kind, request)
    }

    /// A record and its dependents. Requires `view_<kind>`.
    pub fn detail(&self, ctx: &ActorContext, kind: EntityKind, id: EntityId) -> Result<DetailView, Error> {
        ctx.require(Action::View, kind)?;
        self.listing().detail(kind, id)
    }

    /// Validate and store a new record. Requires `add_<kind>`.
    pub fn create(&self, ctx: &ActorContext, kind: EntityKind, input: &Map<String, Value>) -> Result<RecordView, Error> {
        ctx.require(Action::Add, kind)?;
        let _write = self.write_lock.lock();

        let form = normalize_and_validate(&self.catalog, &self.engine, kind, input)?;
        let entity = form.into_entity()?;
        let id = self.engine.generate_id()?;

        let mut tx = self.engine.transaction(&self.catalog);
        tx.insert(id, entity.clone());
        tx.commit()?;

        info!(kind = %kind, id = %id, actor = %ctx.username, "record created");
        self.present(id, entity)
    }

    /// Validate and replace an existing record's fields. Requires `change_<kind>`.
    pub fn update(
        &self,
        ctx: &ActorContext,
        kind: EntityKind,
        id: EntityId,
        input: &Map<String, Value>,
    ) -> Result<RecordView, Error> {
        ctx.require(Action::Change, kind)?;
        let _write = self.write_lock.lock();

        if !self.engine.exists(kind, id)? {
            return Err(Error::not_found(kind, id));
        }
        let form = normalize_and_validate(&self.catalog, &self.engine, kind, input)?;
        let entity = form.into_entity()?;

        let mut tx = self.engine.transaction(&self.catalog);
        tx.update(id, entity.clone());
        tx.commit()?;

        info!(kind = %kind, id = %id, actor = %ctx.username, "record updated");
        self.present(id, entity)
    }

    /// Whether a record may be deleted. Requires `delete_<kind>`.
    pub fn check_deletable(&self, ctx: &ActorContext, kind: EntityKind, id: EntityId) -> Result<Deletability, Error> {
        ctx.require(Action::Delete, kind)?;
        self.guard().check_deletable(kind, id)
    }

    /// The record's label and whether it may be deleted. Requires `delete_<kind>`.
    pub fn deletion_check(&self, ctx: &ActorContext, kind: EntityKind, id: EntityId) -> Result<DeletionCheck, Error> {
        ctx.require(Action::Delete, kind)?;
        self.guard().inspect(kind, id)
    }

    /// Delete a record with no dependents. Requires `delete_<kind>`.
    ///
    /// A refused delete returns [`Error::DeletionRefused`] and leaves storage
    /// untouched.
    pub fn delete(&self, ctx: &ActorContext, kind: EntityKind, id: EntityId) -> Result<(), Error> {
        ctx.require(Action::Delete, kind)?;
        let _write = self.write_lock.lock();

        if let Err(e) = self.guard().ensure_deletable(kind, id) {
            if let Error::DeletionRefused(refused) = &e {
                warn!(
                    kind = %kind,
                    id = %id,
                    actor = %ctx.username,
                    dependents = refused.dependents.len(),
                    "delete refused"
                );
            }
            return Err(e);
        }

        let mut tx = self.engine.transaction(&self.catalog);
        tx.delete(kind, id);
        tx.commit()?;

        info!(kind = %kind, id = %id, actor = %ctx.username, "record deleted");
        Ok(())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        debug!("flushing registry");
        self.engine.flush()
    }

    fn present(&self, id: EntityId, entity: Entity) -> Result<RecordView, Error> {
        let presenter = Presenter::new(&self.catalog, &self.engine);
        self.listing().view(id, entity, &presenter)
    }
}
