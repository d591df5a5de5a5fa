//! Storage error definitions

use thiserror::Error;

/// Errors that can occur when talking to the overlay store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB connection failed: {0}")]
    Connectivity(#[source] mongodb::error::Error),

    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0}")]
    Backend(String),
}
