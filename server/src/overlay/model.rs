//! Validation and document shaping for overlays
//!
//! These are pure functions: the router calls them around every store call.
//! Timestamps are passed in so callers decide what "now" is.

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use serde_json::{Map, Value};

use super::types::{OverlayError, OverlayKind, OverlayPayload, ValidatedOverlay};

/// Stream used when a request does not name one
pub const DEFAULT_STREAM_ID: &str = "default";

const INVALID_TYPE_MESSAGE: &str = r#"Type must be either "text" or "image""#;

/// Check that a create payload carries `type` and `content`, and that
/// `type` is a known kind. Field contents are not otherwise inspected.
pub fn validate(payload: OverlayPayload) -> Result<ValidatedOverlay, OverlayError> {
    let Some(kind) = payload.kind else {
        return Err(missing_field("type"));
    };
    let Some(content) = payload.content else {
        return Err(missing_field("content"));
    };
    let kind = kind
        .as_str()
        .and_then(OverlayKind::from_name)
        .ok_or_else(|| OverlayError::Validation(INVALID_TYPE_MESSAGE.to_string()))?;

    Ok(ValidatedOverlay {
        kind,
        content,
        position: payload.position,
        size: payload.size,
        style: payload.style,
        stream_id: payload.stream_id,
    })
}

fn missing_field(field: &str) -> OverlayError {
    OverlayError::Validation(format!("Missing required field: {}", field))
}

/// Build the stored document for a new overlay, filling in defaults for
/// every optional field. Both timestamps are set to `now`.
pub fn build_document(
    overlay: ValidatedOverlay,
    now: DateTime<Utc>,
) -> Result<Document, OverlayError> {
    let position = overlay.position.unwrap_or_default().resolve();
    let size = overlay.size.unwrap_or_default().resolve();
    let content = bson::to_bson(&overlay.content).map_err(encode_error)?;
    let style = bson::to_document(&overlay.style.unwrap_or_default()).map_err(encode_error)?;
    let stream_id = overlay
        .stream_id
        .unwrap_or_else(|| DEFAULT_STREAM_ID.to_string());
    let stamp = bson_timestamp(now);

    Ok(doc! {
        "type": overlay.kind.as_str(),
        "content": content,
        "position": { "x": position.x, "y": position.y },
        "size": { "width": size.width, "height": size.height },
        "style": style,
        "streamId": stream_id,
        "createdAt": stamp,
        "updatedAt": stamp,
    })
}

/// Turn an update body into the set of fields to overwrite.
///
/// This is a shallow merge: nested objects replace the stored ones whole,
/// and the result is not re-validated. `_id` is never written and
/// `updatedAt` is always set to `now`.
pub fn update_document(
    body: Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<Document, OverlayError> {
    let mut fields = bson::to_document(&body).map_err(encode_error)?;
    fields.remove("_id");
    fields.insert("updatedAt", bson_timestamp(now));
    Ok(fields)
}

/// Convert a stored document into its JSON form: the identifier becomes a
/// hex string and the timestamps become ISO-8601 strings.
///
/// Returns `None` for a missing document so callers can map it to 404.
pub fn serialize(document: Option<Document>) -> Option<Value> {
    document.map(serialize_document)
}

/// [`serialize`] for a document known to exist
pub fn serialize_document(document: Document) -> Value {
    let mut out = Map::new();
    for (key, value) in document {
        let json = match (key.as_str(), value) {
            ("_id", Bson::ObjectId(id)) => Value::String(id.to_hex()),
            ("createdAt" | "updatedAt", Bson::DateTime(dt)) => {
                Value::String(format_timestamp(dt))
            }
            (_, other) => other.into_relaxed_extjson(),
        };
        out.insert(key, json);
    }
    Value::Object(out)
}

/// Parse an overlay identifier from a path segment
pub fn parse_overlay_id(raw: &str) -> Result<ObjectId, OverlayError> {
    ObjectId::parse_str(raw).map_err(|_| OverlayError::InvalidId(raw.to_string()))
}

fn bson_timestamp(now: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(now.timestamp_millis())
}

fn format_timestamp(dt: bson::DateTime) -> String {
    match DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()) {
        Some(t) => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => dt.to_string(),
    }
}

fn encode_error(e: bson::ser::Error) -> OverlayError {
    OverlayError::InvalidBody(e.to_string())
}
