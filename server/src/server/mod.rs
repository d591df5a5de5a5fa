//! Application assembly: root endpoint, cross-origin policy and router.

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsConfig;
use crate::overlay::{OverlayAppState, overlay_routes};
use crate::store::OverlayStore;

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    status: &'static str,
}

/// GET / - Basic liveness outside the API prefix
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Livestream API Server",
        status: "running",
    })
}

/// Build the CORS layer for the allow-listed origins.
/// Wildcards and origins that are not valid header values are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) if origin != "*" => Some(value),
            _ => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router around an overlay store
pub fn build_router(store: Arc<dyn OverlayStore>, cors: &CorsConfig) -> Router {
    let api = overlay_routes(OverlayAppState { store }).layer(cors_layer(cors));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}
