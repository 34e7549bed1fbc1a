//! Record endpoints: list, detail, create, update, delete.
//!
//! Every handler authenticates the caller first; the registry then checks the
//! permission for the kind before touching storage.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use courseinfo_core::{DetailView, Page, RecordView};
use serde_json::{Map, Value};
use tracing::debug;

use super::{parse_id, parse_kind};
use crate::auth::Actor;
use crate::error::AppError;
use crate::json::{DeletableResponse, ListParams, SuccessResponse};
use crate::AppState;

/// Record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/:kind", get(list_records).post(create_record))
        .route(
            "/api/:kind/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/api/:kind/:id/delete", get(check_delete))
}

/// One page of records, ordered by `order_by` then the kind's natural key.
async fn list_records(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(kind): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<SuccessResponse<Page<RecordView>>>, AppError> {
    let kind = parse_kind(&kind)?;
    let page = state.registry.list(&ctx, kind, &params.into_request())?;
    debug!(kind = %kind, page = page.page, items = page.items.len(), "listed records");
    Ok(Json(SuccessResponse::new(page)))
}

/// A record with its dependents.
async fn get_record(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<DetailView>>, AppError> {
    let (kind, id) = (parse_kind(&kind)?, parse_id(&id)?);
    let detail = state.registry.detail(&ctx, kind, id)?;
    Ok(Json(SuccessResponse::new(detail)))
}

async fn create_record(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path(kind): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessResponse<RecordView>>), AppError> {
    let kind = parse_kind(&kind)?;
    let Json(body) = body?;
    let input = object_body(body)?;
    let view = state.registry.create(&ctx, kind, &input)?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(view))))
}

async fn update_record(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path((kind, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SuccessResponse<RecordView>>, AppError> {
    let (kind, id) = (parse_kind(&kind)?, parse_id(&id)?);
    let Json(body) = body?;
    let input = object_body(body)?;
    let view = state.registry.update(&ctx, kind, id, &input)?;
    Ok(Json(SuccessResponse::new(view)))
}

/// Whether the record may be deleted, listing what blocks it.
async fn check_delete(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<DeletableResponse>>, AppError> {
    let (kind, id) = (parse_kind(&kind)?, parse_id(&id)?);
    let check = state.registry.deletion_check(&ctx, kind, id)?;
    Ok(Json(SuccessResponse::new(DeletableResponse::from(check))))
}

async fn delete_record(
    State(state): State<AppState>,
    Actor(ctx): Actor,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (kind, id) = (parse_kind(&kind)?, parse_id(&id)?);
    state.registry.delete(&ctx, kind, id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn object_body(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(AppError::BadRequest(format!(
            "expected a JSON object of field values, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
