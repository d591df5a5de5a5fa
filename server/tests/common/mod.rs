//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use livestream_overlays::config::CorsConfig;
use livestream_overlays::server::build_router;
use livestream_overlays::store::{OverlayStore, StoreError};
use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tower::util::ServiceExt;

/// In-memory overlay store with the same observable behavior as the
/// MongoDB collection
#[derive(Default)]
pub struct MemoryOverlayStore {
    documents: RwLock<Vec<Document>>,
    calls: AtomicUsize,
}

impl MemoryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn has_id(document: &Document, id: ObjectId) -> bool {
    document.get_object_id("_id").map(|d| d == id).unwrap_or(false)
}

fn in_stream(document: &Document, stream_id: &str) -> bool {
    document.get("streamId") == Some(&Bson::String(stream_id.to_string()))
}

#[async_trait]
impl OverlayStore for MemoryOverlayStore {
    async fn insert(&self, mut document: Document) -> Result<ObjectId, StoreError> {
        self.record_call();
        let id = ObjectId::new();
        document.insert("_id", id);
        self.documents.write().await.push(document);
        Ok(id)
    }

    async fn find_by_stream(&self, stream_id: &str) -> Result<Vec<Document>, StoreError> {
        self.record_call();
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| in_stream(d, stream_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        self.record_call();
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| has_id(d, id)).cloned())
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool, StoreError> {
        self.record_call();
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| has_id(d, id)) {
            Some(document) => {
                for (key, value) in fields {
                    document.insert(key, value);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.record_call();
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !has_id(d, id));
        Ok(documents.len() < before)
    }

    async fn delete_by_stream(&self, stream_id: &str) -> Result<u64, StoreError> {
        self.record_call();
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !in_stream(d, stream_id));
        Ok((before - documents.len()) as u64)
    }
}

/// Store whose every operation fails, for exercising the 500 path
pub struct FailingOverlayStore;

fn unavailable() -> StoreError {
    StoreError::Backend("database unavailable".to_string())
}

#[async_trait]
impl OverlayStore for FailingOverlayStore {
    async fn insert(&self, _document: Document) -> Result<ObjectId, StoreError> {
        Err(unavailable())
    }

    async fn find_by_stream(&self, _stream_id: &str) -> Result<Vec<Document>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Document>, StoreError> {
        Err(unavailable())
    }

    async fn update_fields(&self, _id: ObjectId, _fields: Document) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn delete_by_stream(&self, _stream_id: &str) -> Result<u64, StoreError> {
        Err(unavailable())
    }
}

/// Create a test application router with its backing store
pub fn create_test_app_with_store() -> (Router, Arc<MemoryOverlayStore>) {
    let store = Arc::new(MemoryOverlayStore::new());
    let app = build_router(store.clone(), &CorsConfig::default());
    (app, store)
}

/// Create a test application router with all routes configured
pub fn create_test_app() -> Router {
    create_test_app_with_store().0
}

/// Create a test application whose store always fails
pub fn create_failing_app() -> Router {
    build_router(Arc::new(FailingOverlayStore), &CorsConfig::default())
}

/// Send a request and parse the JSON response body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

/// Send a prepared request and parse the JSON response body
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Create an overlay and return its JSON representation
pub async fn create_overlay(app: &Router, payload: Value) -> Value {
    let (status, json) = send(app, "POST", "/api/overlays", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json["overlay"].clone()
}

/// Whether a string looks like a MongoDB ObjectId
pub fn is_object_id(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

/// Initialize test logging for detailed output
pub fn init_test_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livestream_overlays=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
