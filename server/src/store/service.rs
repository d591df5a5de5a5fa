//! OverlayStore trait definition

use async_trait::async_trait;
use mongodb::bson::{Document, oid::ObjectId};

use super::types::StoreError;

/// Trait for overlay document stores
///
/// Implementations hold a handle to a single collection of overlay
/// documents. Documents are passed through untyped so that shallow updates
/// can carry arbitrary fields.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Insert a new document and return the identifier assigned to it
    async fn insert(&self, document: Document) -> Result<ObjectId, StoreError>;

    /// All documents whose `streamId` equals `stream_id`
    async fn find_by_stream(&self, stream_id: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch one document by identifier
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError>;

    /// Overwrite the given top-level fields of a document.
    /// Returns false when no document has this identifier.
    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool, StoreError>;

    /// Delete one document. Returns false when nothing was deleted.
    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError>;

    /// Delete every document of a stream, returning how many were removed
    async fn delete_by_stream(&self, stream_id: &str) -> Result<u64, StoreError>;
}
