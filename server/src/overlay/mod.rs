//! Overlay resource module
//!
//! Validation, document shaping and the HTTP handlers for overlay CRUD.

pub mod model;
pub mod routes;
pub mod types;

pub use routes::{OverlayAppState, OverlayErrorResponse, overlay_routes};
pub use types::{OverlayError, OverlayKind, OverlayPayload, Position, Size};
