//! MongoDB-backed overlay store

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Document, doc, oid::ObjectId},
};
use tracing::{debug, error, info};

use super::service::OverlayStore;
use super::types::StoreError;

/// Database holding the overlay collection
pub const DATABASE_NAME: &str = "livestream";
/// Collection of overlay documents
pub const COLLECTION_NAME: &str = "overlays";

/// Overlay store backed by a MongoDB collection
#[derive(Clone)]
pub struct MongoOverlayStore {
    collection: Collection<Document>,
}

impl MongoOverlayStore {
    /// Open a client for `uri` and verify the server answers a ping.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(StoreError::Connectivity)?;

        if let Err(e) = client.database("admin").run_command(doc! { "ping": 1 }).await {
            error!("MongoDB connection failed: {}", e);
            return Err(StoreError::Connectivity(e));
        }
        info!("MongoDB connected successfully");

        Ok(Self::from_client(&client))
    }

    /// Build a store from an already connected client
    pub fn from_client(client: &Client) -> Self {
        Self {
            collection: client
                .database(DATABASE_NAME)
                .collection(COLLECTION_NAME),
        }
    }
}

#[async_trait]
impl OverlayStore for MongoOverlayStore {
    async fn insert(&self, document: Document) -> Result<ObjectId, StoreError> {
        let result = self.collection.insert_one(document).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Backend(format!(
                "inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;
        debug!("Inserted overlay {}", id);
        Ok(id)
    }

    async fn find_by_stream(&self, stream_id: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(doc! { "streamId": stream_id }).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> Result<bool, StoreError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_by_stream(&self, stream_id: &str) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(doc! { "streamId": stream_id })
            .await?;
        Ok(result.deleted_count)
    }
}
