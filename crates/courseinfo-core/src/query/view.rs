//! Presentation shapes returned by list and detail.

use serde::Serialize;

use crate::catalog::EntityKind;
use crate::guard::DependentRecord;
use crate::model::{Entity, EntityId};

/// A record with its label and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub path: String,
    pub fields: Entity,
}

/// A record together with the records that depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub record: RecordView,
    pub dependents: Vec<DependentRecord>,
}
