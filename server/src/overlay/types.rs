//! Overlay-related types and error definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while handling an overlay request
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid overlay ID")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Overlay not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Kind of content an overlay renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Text,
    Image,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Text => "text",
            OverlayKind::Image => "image",
        }
    }

    /// Parse the wire name of a kind
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OverlayKind::Text),
            "image" => Some(OverlayKind::Image),
            _ => None,
        }
    }
}

/// Position of the overlay's top-left corner, relative to the video frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Overlay dimensions, relative to the video frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 0.3,
            height: 0.1,
        }
    }
}

/// Position as sent by a client; either coordinate may be omitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionInput {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl PositionInput {
    /// Fill missing coordinates from the defaults
    pub fn resolve(&self) -> Position {
        let default = Position::default();
        Position {
            x: self.x.unwrap_or(default.x),
            y: self.y.unwrap_or(default.y),
        }
    }
}

/// Size as sent by a client; either dimension may be omitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizeInput {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl SizeInput {
    /// Fill missing dimensions from the defaults
    pub fn resolve(&self) -> Size {
        let default = Size::default();
        Size {
            width: self.width.unwrap_or(default.width),
            height: self.height.unwrap_or(default.height),
        }
    }
}

/// Request body for creating an overlay.
///
/// Every field is optional here; presence of the required ones is checked
/// by [`validate`](super::model::validate) before any defaults are applied.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPayload {
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub content: Option<Value>,
    pub position: Option<PositionInput>,
    pub size: Option<SizeInput>,
    pub style: Option<Map<String, Value>>,
    pub stream_id: Option<String>,
}

/// A payload that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedOverlay {
    pub kind: OverlayKind,
    pub content: Value,
    pub position: Option<PositionInput>,
    pub size: Option<SizeInput>,
    pub style: Option<Map<String, Value>>,
    pub stream_id: Option<String>,
}

/// Response carrying a single overlay
#[derive(Debug, Serialize)]
pub struct OverlayResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub overlay: Value,
}

/// Response for listing the overlays of a stream
#[derive(Debug, Serialize)]
pub struct OverlayListResponse {
    pub overlays: Vec<Value>,
    pub count: usize,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for deleting every overlay of a stream
#[derive(Debug, Serialize)]
pub struct StreamDeleteResponse {
    pub message: String,
    pub count: u64,
}
