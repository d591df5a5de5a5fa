//! Livestream Overlays Server Library
//!
//! This module exports the server components for use in integration tests
//! and the binary.

pub mod config;
pub mod overlay;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use overlay::overlay_routes;
pub use server::build_router;
pub use store::{MongoOverlayStore, OverlayStore, StoreError};
