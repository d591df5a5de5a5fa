//! Storage for overlay documents
//!
//! This module provides:
//! - `OverlayStore` trait for abstracting the document store
//! - `MongoOverlayStore` backed by the `livestream.overlays` collection

mod mongo;
mod service;
mod types;

pub use mongo::{COLLECTION_NAME, DATABASE_NAME, MongoOverlayStore};
pub use service::OverlayStore;
pub use types::StoreError;
