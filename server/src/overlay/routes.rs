//! HTTP route handlers for overlay API

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::model::{self, DEFAULT_STREAM_ID};
use super::types::{
    MessageResponse, OverlayError, OverlayListResponse, OverlayPayload,
    OverlayResponse, StreamDeleteResponse,
};
use crate::store::{OverlayStore, StoreError};

/// Application state containing the overlay store
#[derive(Clone)]
pub struct OverlayAppState {
    pub store: Arc<dyn OverlayStore>,
}

/// Error response for overlay API
#[derive(Debug, Serialize)]
pub struct OverlayErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl OverlayErrorResponse {
    /// Response for a request an extractor refused, keeping its status
    fn rejected(status: StatusCode, code: &str, error: String) -> Self {
        Self {
            error,
            code: code.to_string(),
            status,
        }
    }
}

impl From<OverlayError> for OverlayErrorResponse {
    fn from(e: OverlayError) -> Self {
        let (code, status) = match &e {
            OverlayError::Validation(_) => ("validation", StatusCode::BAD_REQUEST),
            OverlayError::InvalidId(_) => ("invalid_id", StatusCode::BAD_REQUEST),
            OverlayError::InvalidBody(_) => ("invalid_body", StatusCode::BAD_REQUEST),
            OverlayError::NotFound(_) => ("not_found", StatusCode::NOT_FOUND),
            OverlayError::Storage(_) => ("storage", StatusCode::INTERNAL_SERVER_ERROR),
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for OverlayErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Log a store failure and turn it into a 500 response
fn store_failure(action: &str, e: StoreError) -> OverlayErrorResponse {
    tracing::error!("Failed to {}: {}", action, e);
    OverlayErrorResponse::from(OverlayError::from(e))
}

fn invalid_body(rejection: JsonRejection) -> OverlayErrorResponse {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    OverlayErrorResponse::rejected(
        rejection.status(),
        "invalid_body",
        rejection.body_text(),
    )
}

fn invalid_path(rejection: PathRejection) -> OverlayErrorResponse {
    tracing::debug!("Rejected request path: {}", rejection.body_text());
    OverlayErrorResponse::rejected(
        rejection.status(),
        "invalid_path",
        rejection.body_text(),
    )
}

fn invalid_query(rejection: QueryRejection) -> OverlayErrorResponse {
    tracing::debug!("Rejected query string: {}", rejection.body_text());
    OverlayErrorResponse::rejected(
        rejection.status(),
        "invalid_query",
        rejection.body_text(),
    )
}

/// First `streamId` in the query string; later repeats are ignored
fn first_stream_id(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == "streamId")
        .map(|(_, value)| value)
}

fn parse_id(raw: &str) -> Result<ObjectId, OverlayErrorResponse> {
    model::parse_overlay_id(raw).map_err(|e| {
        tracing::debug!("Malformed overlay id {:?}", raw);
        OverlayErrorResponse::from(e)
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// GET /api/health - Liveness of the API
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Livestream API is running",
    })
}

/// POST /api/overlays - Create an overlay
pub async fn create_overlay(
    State(state): State<OverlayAppState>,
    payload: Result<Json<OverlayPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<OverlayResponse>), OverlayErrorResponse> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let validated = model::validate(payload).map_err(|e| {
        tracing::debug!("Rejected overlay: {}", e);
        OverlayErrorResponse::from(e)
    })?;
    let mut document = model::build_document(validated, Utc::now())?;

    let id = state
        .store
        .insert(document.clone())
        .await
        .map_err(|e| store_failure("create overlay", e))?;
    document.insert("_id", id);

    tracing::info!("Created overlay {}", id);

    Ok((
        StatusCode::CREATED,
        Json(OverlayResponse {
            message: Some("Overlay created successfully"),
            overlay: model::serialize_document(document),
        }),
    ))
}

/// GET /api/overlays?streamId=... - List the overlays of a stream
pub async fn list_overlays(
    State(state): State<OverlayAppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<OverlayListResponse>, OverlayErrorResponse> {
    let Query(params) = params.map_err(invalid_query)?;
    let stream_id =
        first_stream_id(params).unwrap_or_else(|| DEFAULT_STREAM_ID.to_string());

    let documents = state
        .store
        .find_by_stream(&stream_id)
        .await
        .map_err(|e| store_failure("list overlays", e))?;

    let overlays: Vec<Value> = documents
        .into_iter()
        .map(model::serialize_document)
        .collect();
    let count = overlays.len();

    tracing::debug!("Listed {} overlays for stream {}", count, stream_id);

    Ok(Json(OverlayListResponse { overlays, count }))
}

/// GET /api/overlays/:id - Get one overlay
pub async fn get_overlay(
    State(state): State<OverlayAppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<OverlayResponse>, OverlayErrorResponse> {
    let Path(id) = id.map_err(invalid_path)?;
    let oid = parse_id(&id)?;

    let document = state
        .store
        .find_by_id(oid)
        .await
        .map_err(|e| store_failure("get overlay", e))?;

    let overlay = model::serialize(document).ok_or_else(|| {
        tracing::debug!("Overlay {} not found", id);
        OverlayErrorResponse::from(OverlayError::NotFound(id.clone()))
    })?;

    Ok(Json(OverlayResponse {
        message: None,
        overlay,
    }))
}

/// PUT /api/overlays/:id - Overwrite fields of an overlay
pub async fn update_overlay(
    State(state): State<OverlayAppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<OverlayResponse>, OverlayErrorResponse> {
    let Path(id) = id.map_err(invalid_path)?;
    let oid = parse_id(&id)?;
    let Json(body) = body.map_err(invalid_body)?;

    let fields = model::update_document(body, Utc::now())?;

    let matched = state
        .store
        .update_fields(oid, fields)
        .await
        .map_err(|e| store_failure("update overlay", e))?;
    if !matched {
        tracing::debug!("Overlay {} not found for update", id);
        return Err(OverlayError::NotFound(id).into());
    }

    let document = state
        .store
        .find_by_id(oid)
        .await
        .map_err(|e| store_failure("reload overlay", e))?;

    // Deleted between the update and the reload
    let overlay = model::serialize(document)
        .ok_or_else(|| OverlayErrorResponse::from(OverlayError::NotFound(id.clone())))?;

    tracing::info!("Updated overlay {}", id);

    Ok(Json(OverlayResponse {
        message: Some("Overlay updated successfully"),
        overlay,
    }))
}

/// DELETE /api/overlays/:id - Delete one overlay
pub async fn delete_overlay(
    State(state): State<OverlayAppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, OverlayErrorResponse> {
    let Path(id) = id.map_err(invalid_path)?;
    let oid = parse_id(&id)?;

    let deleted = state
        .store
        .delete_by_id(oid)
        .await
        .map_err(|e| store_failure("delete overlay", e))?;
    if !deleted {
        tracing::debug!("Overlay {} not found for delete", id);
        return Err(OverlayError::NotFound(id).into());
    }

    tracing::info!("Deleted overlay {}", id);

    Ok(Json(MessageResponse {
        message: "Overlay deleted successfully".to_string(),
    }))
}

/// DELETE /api/overlays/stream/:stream_id - Delete every overlay of a stream
pub async fn delete_stream_overlays(
    State(state): State<OverlayAppState>,
    stream_id: Result<Path<String>, PathRejection>,
) -> Result<Json<StreamDeleteResponse>, OverlayErrorResponse> {
    let Path(stream_id) = stream_id.map_err(invalid_path)?;
    let count = state
        .store
        .delete_by_stream(&stream_id)
        .await
        .map_err(|e| store_failure("delete stream overlays", e))?;

    tracing::info!("Deleted {} overlays for stream {}", count, stream_id);

    Ok(Json(StreamDeleteResponse {
        message: format!("Deleted {} overlays", count),
        count,
    }))
}

/// Build overlay API routes (mounted under `/api`)
pub fn overlay_routes(state: OverlayAppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/overlays", get(list_overlays).post(create_overlay))
        .route(
            "/overlays/:id",
            get(get_overlay).put(update_overlay).delete(delete_overlay),
        )
        .route("/overlays/stream/:stream_id", delete(delete_stream_overlays))
        .with_state(state)
}
