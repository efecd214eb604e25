// Resource API - one generic handler set, mounted once per resource kind

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;

use crate::db::{Record, StoreError};
use crate::error::{ApiError, ApiResult, MessageBody};
use crate::resource::{Operation, ResourceKind};
use crate::security::with_security_headers;
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Keep raw store error text out of 500 responses
    pub redact_store_errors: bool,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            redact_store_errors: false,
        }
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_store_errors = redact;
        self
    }
}

/// State seen by the handlers of a single resource kind
#[derive(Clone)]
struct ResourceState {
    kind: ResourceKind,
    app: AppState,
}

impl ResourceState {
    fn store_error(&self, op: Operation, source: StoreError) -> ApiError {
        ApiError::store(self.kind, op, source, self.app.redact_store_errors)
    }
}

/// Full application router: every resource kind plus the ambient layers
pub fn create_router(state: AppState) -> Router {
    let api = ResourceKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.merge(resource_router(kind, state.clone()))
        });

    with_security_headers(api).layer(TraceLayer::new_for_http())
}

/// Routes for one resource kind, e.g. `/api/zoos` and `/api/zoos/:id`
pub fn resource_router(kind: ResourceKind, app: AppState) -> Router {
    Router::new()
        .route(&kind.collection_path(), get(list_records).post(create_record))
        .route(
            &kind.item_path(),
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(ResourceState { kind, app })
}

// ============================================================================
// Request parsing
// ============================================================================

/// Body as a JSON object; anything unparseable reads as an empty object
fn parse_body(raw: &Bytes) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// `name` if it is a non-empty string
fn required_name(body: &Map<String, Value>) -> Option<&str> {
    body.get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Ids are integers; any other path segment names no record
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/:resource
async fn create_record(State(state): State<ResourceState>, body: Bytes) -> ApiResult<Json<Record>> {
    let kind = state.kind;
    let body = parse_body(&body);
    let name = required_name(&body)
        .ok_or_else(|| ApiError::Validation(kind.missing_name_on_create()))?;

    // Only `name` is inserted; other body fields are ignored
    let record = state
        .app
        .store
        .create(kind, name)
        .map_err(|e| state.store_error(Operation::Create, e))?;

    Ok(Json(record))
}

/// GET /api/:resource
async fn list_records(State(state): State<ResourceState>) -> ApiResult<Json<Vec<Record>>> {
    let records = state
        .app
        .store
        .list(state.kind)
        .map_err(|e| state.store_error(Operation::List, e))?;

    Ok(Json(records))
}

/// GET /api/:resource/:id
async fn get_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    let kind = state.kind;
    let id = parse_id(&id).ok_or_else(|| ApiError::NotFound(kind.not_found()))?;

    state
        .app
        .store
        .get(kind, id)
        .map_err(|e| state.store_error(Operation::Get, e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(kind.not_found()))
}

/// PUT /api/:resource/:id
///
/// Only `name` is validated, but the whole body (minus `id`) is written.
async fn update_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<MessageBody>> {
    let kind = state.kind;
    let changes = parse_body(&body);
    if required_name(&changes).is_none() {
        return Err(ApiError::Validation(kind.missing_name_on_update()));
    }
    let id = parse_id(&id).ok_or_else(|| ApiError::NotFound(kind.not_found()))?;

    let count = state
        .app
        .store
        .update(kind, id, &changes)
        .map_err(|e| state.store_error(Operation::Update, e))?;

    if count == 0 {
        return Err(ApiError::NotFound(kind.not_found()));
    }
    Ok(Json(MessageBody {
        message: kind.updated(),
    }))
}

/// DELETE /api/:resource/:id
async fn delete_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    let kind = state.kind;
    let id = parse_id(&id).ok_or_else(|| ApiError::NotFound(kind.not_found()))?;

    let count = state
        .app
        .store
        .delete(kind, id)
        .map_err(|e| state.store_error(Operation::Delete, e))?;

    if count == 0 {
        return Err(ApiError::NotFound(kind.not_found()));
    }
    Ok(Json(MessageBody {
        message: kind.deleted(),
    }))
}
