//! Ordered, paginated listing and single-record detail.

use std::cmp::Ordering;

use super::pagination::{paginate, ListRequest, Page, PageLimits};
use super::view::{DetailView, RecordView};
use crate::catalog::{Catalog, EntityKind, OrderBy, OrderDirection};
use crate::error::Error;
use crate::guard::DeletionGuard;
use crate::model::{record_path, Entity, EntityId, FieldValue, Presenter};
use crate::storage::StorageEngine;
use crate::validation::ValidationError;

/// A loaded record with its precomputed sort keys.
struct SortRow {
    id: EntityId,
    entity: Entity,
    order_keys: Vec<Vec<FieldValue>>,
    natural_key: Vec<FieldValue>,
}

/// Executes list and detail reads against storage.
pub struct ListingExecutor<'a> {
    catalog: &'a Catalog,
    engine: &'a StorageEngine,
    limits: PageLimits,
}

impl<'a> ListingExecutor<'a> {
    /// Create a new listing executor.
    pub fn new(catalog: &'a Catalog, engine: &'a StorageEngine, limits: PageLimits) -> Self {
        Self {
            catalog,
            engine,
            limits,
        }
    }

    /// List one page of `kind`.
    ///
    /// Records are sorted by the requested fields (references by the target's
    /// natural key), then by the kind's natural key, then by id.
    pub fn list(&self, kind: EntityKind, request: &ListRequest) -> Result<Page<RecordView>, Error> {
        let (page, page_size) = request.resolve_page(kind, &self.limits)?;
        self.check_order(kind, &request.order_by)?;

        let presenter = Presenter::new(self.catalog, self.engine);
        let mut rows = Vec::new();
        for entry in self.engine.scan(kind) {
            let (id, entity) = entry?;
            let order_keys = request
                .order_by
                .iter()
                .map(|order| presenter.field_key(&entity, &order.field))
                .collect::<Result<Vec<_>, _>>()?;
            let natural_key = presenter.natural_key(&entity)?;
            rows.push(SortRow {
                id,
                entity,
                order_keys,
                natural_key,
            });
        }

        rows.sort_by(|a, b| compare_rows(&request.order_by, a, b));

        paginate(rows, page, page_size).try_map(|row| self.view(row.id, row.entity, &presenter))
    }

    /// A single record and its dependents.
    pub fn detail(&self, kind: EntityKind, id: EntityId) -> Result<DetailView, Error> {
        let entity = self
            .engine
            .fetch(kind, id)?
            .ok_or_else(|| Error::not_found(kind, id))?;
        let presenter = Presenter::new(self.catalog, self.engine);
        let record = self.view(id, entity, &presenter)?;
        let dependents = DeletionGuard::new(self.catalog, self.engine).dependents(kind, id)?;
        Ok(DetailView { record, dependents })
    }

    /// Present one record.
    pub fn view(
        &self,
        id: EntityId,
        entity: Entity,
        presenter: &Presenter<'_, StorageEngine>,
    ) -> Result<RecordView, Error> {
        let kind = entity.kind();
        Ok(RecordView {
            kind,
            id,
            label: presenter.label(&entity)?,
            path: record_path(kind, id),
            fields: entity,
        })
    }

    fn check_order(&self, kind: EntityKind, order_by: &[OrderBy]) -> Result<(), Error> {
        let def = self.catalog.entity(kind)?;
        let mut errors = ValidationError::new(kind);
        for order in order_by {
            if def.get_field(&order.field).is_none() {
                errors.add("order_by", format!("Cannot order by unknown field '{}'.", order.field));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

fn compare_rows(order_by: &[OrderBy], a: &SortRow, b: &SortRow) -> Ordering {
    for (i, order) in order_by.iter().enumerate() {
        let ordering = a.order_keys[i].cmp(&b.order_keys[i]);
        let ordering = match order.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.natural_key
        .cmp(&b.natural_key)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instructor, Period, Year};
    use crate::storage::StorageConfig;

    struct Fixture {
        catalog: Catalog,
        engine: StorageEngine,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Catalog::courseinfo(),
                engine: StorageEngine::open(StorageConfig::temporary()).unwrap(),
            }
        }

        fn insert(&self, entity: Entity) -> EntityId {
            let id = self.engine.generate_id().unwrap();
            let mut tx = self.engine.transaction(&self.catalog);
            tx.insert(id, entity);
            tx.commit().unwrap();
            id
        }

        fn executor(&self) -> ListingExecutor<'_> {
            ListingExecutor::new(&self.catalog, &self.engine, PageLimits::default())
        }

        fn labels(&self, kind: EntityKind, request: ListRequest) -> Vec<String> {
            self.executor()
                .list(kind, &request)
                .unwrap()
                .items
                .into_iter()
                .map(|v| v.label)
                .collect()
        }
    }

    fn person(first: &str, last: &str, disambiguator: &str) -> Entity {
        Entity::Instructor(Instructor {
            first_name: first.into(),
            last_name: last.into(),
            disambiguator: disambiguator.into(),
        })
    }

    #[test]
    fn test_years_ascending() {
        let fx = Fixture::new();
        for year in [2025, 2023, 2024] {
            fx.insert(Entity::Year(Year { year }));
        }
        assert_eq!(fx.labels(EntityKind::Year, ListRequest::new()), vec!["2023", "2024", "2025"]);
    }

    #[test]
    fn test_periods_by_sequence() {
        let fx = Fixture::new();
        for (seq, name) in [(3, "Fall"), (1, "Spring"), (2, "Summer")] {
            fx.insert(Entity::Period(Period {
                period_sequence: seq,
                period_name: name.into(),
            }));
        }
        assert_eq!(
            fx.labels(EntityKind::Period, ListRequest::new()),
            vec!["Spring", "Summer", "Fall"]
        );
    }

    #[test]
    fn test_caller_order_with_descending_and_tiebreak() {
        let fx = Fixture::new();
        fx.insert(person("Ann", "Smith", ""));
        fx.insert(person("Bob", "Smith", ""));
        fx.insert(person("Cy", "Adams", ""));
        fx.insert(person("Bob", "Smith", "Jr."));

        let request = ListRequest::new().with_order(OrderBy::parse_list("-last_name"));
        assert_eq!(
            fx.labels(EntityKind::Instructor, request),
            vec!["Smith, Ann", "Smith, Bob", "Smith, Bob (Jr.)", "Adams, Cy"]
        );
    }

    #[test]
    fn test_unknown_order_field() {
        let fx = Fixture::new();
        let err = fx
            .executor()
            .list(EntityKind::Year, &ListRequest::new().with_order([OrderBy::asc("color")]))
            .unwrap_err();
        match err {
            Error::Validation(err) => {
                assert_eq!(err.messages("order_by"), ["Cannot order by unknown field 'color'."]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_pagination_totals() {
        let fx = Fixture::new();
        for year in 2000..2005 {
            fx.insert(Entity::Year(Year { year }));
        }

        let page = fx
            .executor()
            .list(EntityKind::Year, &ListRequest::new().with_page(2).with_page_size(2))
            .unwrap();
        assert_eq!(page.items.iter().map(|v| v.label.as_str()).collect::<Vec<_>>(), ["2002", "2003"]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.page_count, 3);

        let past = fx
            .executor()
            .list(EntityKind::Year, &ListRequest::new().with_page(7).with_page_size(2))
            .unwrap();
        assert!(past.items.is_empty());
        assert_eq!(past.total_count, 5);
    }

    #[test]
    fn test_detail() {
        let fx = Fixture::new();
        let id = fx.insert(Entity::Year(Year { year: 2024 }));
        let detail = fx.executor().detail(EntityKind::Year, id).unwrap();
        assert_eq!(detail.record.label, "2024");
        assert_eq!(detail.record.path, format!("/api/year/{id}"));
        assert!(detail.dependents.is_empty());

        assert!(matches!(
            fx.executor().detail(EntityKind::Period, id),
            Err(Error::NotFound { .. })
        ));
    }
}
