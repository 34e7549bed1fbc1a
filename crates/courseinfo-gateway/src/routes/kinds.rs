//! Schema introspection endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use courseinfo_core::EntityKind;

use super::parse_kind;
use crate::error::AppError;
use crate::json::{KindSummary, SuccessResponse};
use crate::AppState;

/// Schema routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/kinds", get(list_kinds))
        .route("/api/kinds/:kind", get(get_kind))
}

/// Every kind with its fields, ordering, unique constraints, and dependents.
async fn list_kinds(State(state): State<AppState>) -> Result<Json<SuccessResponse<Vec<KindSummary>>>, AppError> {
    let catalog = state.registry.catalog();
    let kinds = EntityKind::ALL
        .iter()
        .map(|kind| catalog.entity(*kind).map(|def| KindSummary::new(catalog, def)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(SuccessResponse::new(kinds)))
}

/// A single kind.
async fn get_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<SuccessResponse<KindSummary>>, AppError> {
    let kind = parse_kind(&kind)?;
    let catalog = state.registry.catalog();
    let def = catalog.entity(kind)?;
    Ok(Json(SuccessResponse::new(KindSummary::new(catalog, def))))
}
