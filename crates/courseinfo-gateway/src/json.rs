//! JSON request and response types for the HTTP gateway.

use courseinfo_core::catalog::{ConstraintDef, EntityDef, FieldDef, OrderBy, RelationDef};
use courseinfo_core::{Catalog, Deletability, DeletionCheck, DependentRecord, EntityKind, ListRequest};
use serde::{Deserialize, Serialize};

/// Generic success response wrapper.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    /// Success flag.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Create a new success response.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Whether the store answered a read.
    pub storage_ok: bool,
}

/// Listing query string: `?page=2&page_size=10&order_by=-last_name,first_name`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub order_by: Option<String>,
}

impl ListParams {
    /// Convert to a core listing request.
    pub fn into_request(self) -> ListRequest {
        let mut request = ListRequest::new();
        if let Some(order_by) = self.order_by.as_deref() {
            request = request.with_order(OrderBy::parse_list(order_by));
        }
        request.page = self.page;
        request.page_size = self.page_size;
        request
    }
}

/// Schema of one kind as exposed by `/api/kinds`.
#[derive(Debug, Serialize)]
pub struct KindSummary {
    pub kind: EntityKind,
    pub title: &'static str,
    pub path: String,
    pub fields: Vec<FieldDef>,
    pub default_order: Vec<OrderBy>,
    pub unique: Vec<ConstraintDef>,
    /// Relations from other kinds that block deleting this kind.
    pub dependents: Vec<RelationDef>,
}

impl KindSummary {
    /// Summarize `def` from the catalog.
    pub fn new(catalog: &Catalog, def: &EntityDef) -> Self {
        Self {
            kind: def.kind,
            title: def.kind.title(),
            path: format!("/api/{}", def.kind),
            fields: def.fields.clone(),
            default_order: def.default_order.clone(),
            unique: catalog.constraints_for(def.kind).cloned().collect(),
            dependents: catalog.dependents_of(def.kind).cloned().collect(),
        }
    }
}

/// Answer to "may this record be deleted?".
#[derive(Debug, Serialize)]
pub struct DeletableResponse {
    pub deletable: bool,
    /// Present when refused, e.g. "You may not delete instructor Doe, John."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub dependents: Vec<DependentRecord>,
}

impl From<DeletionCheck> for DeletableResponse {
    fn from(check: DeletionCheck) -> Self {
        let DeletionCheck {
            kind,
            label,
            deletability,
            ..
        } = check;
        match deletability {
            Deletability::Allowed => Self {
                deletable: true,
                message: None,
                dependents: Vec::new(),
            },
            Deletability::Refused(dependents) => Self {
                deletable: false,
                message: Some(format!("You may not delete {kind} {label}.")),
                dependents,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use courseinfo_core::OrderDirection;

    use super::*;

    #[test]
    fn test_list_params_into_request() {
        let params = ListParams {
            page: Some(2),
            page_size: None,
            order_by: Some("-last_name,first_name".into()),
        };
        let request = params.into_request();
        assert_eq!(request.page, Some(2));
        assert_eq!(request.page_size, None);
        assert_eq!(request.order_by.len(), 2);
        assert_eq!(request.order_by[0].field, "last_name");
        assert_eq!(request.order_by[0].direction, OrderDirection::Desc);
    }

    #[test]
    fn test_kind_summary() {
        let catalog = Catalog::courseinfo();
        let def = catalog.entity(EntityKind::Instructor).unwrap();
        let summary = KindSummary::new(&catalog, def);
        assert_eq!(summary.path, "/api/instructor");
        assert!(summary
            .dependents
            .iter()
            .any(|r| r.from_entity == EntityKind::Section));
    }
}
