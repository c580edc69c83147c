//! Relay protocol and board payload codec.
//!
//! Board changes travel inside a `chat` envelope whose `message` field holds
//! the payload as a JSON string:
//!
//! ```json
//! { "type": "chat", "roomId": "r1", "message": "{\"shape\":{\"type\":\"rect\",...}}" }
//! { "type": "chat", "roomId": "r1", "message": "{\"type\":\"update\",\"shapes\":[...]}" }
//! ```

use crate::shapes::{Shape, ShapeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding relay traffic.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is missing `{0}`")]
    MissingField(&'static str),
    #[error("invalid shape: {0}")]
    InvalidShape(#[from] ShapeError),
}

/// Messages exchanged with the relay server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    /// Subscribe to a room
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    /// Unsubscribe from a room
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String },
    /// Board payload for a room, JSON-encoded
    #[serde(rename_all = "camelCase")]
    Chat { message: String, room_id: String },
    /// Error reported by the server
    Error { message: String },
    /// Anything else; ignored by clients
    #[serde(other)]
    Unknown,
}

impl RelayMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A change to a room's shape set.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMessage {
    /// Append one shape.
    Shape(Shape),
    /// Replace the whole set.
    Update(Vec<Shape>),
}

#[derive(Serialize)]
struct ShapePayload<'a> {
    shape: &'a Shape,
}

#[derive(Serialize)]
struct UpdatePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    shapes: &'a [Shape],
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    shape: Option<Shape>,
    #[serde(default)]
    shapes: Option<Vec<Shape>>,
}

const UPDATE: &str = "update";

impl BoardMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            BoardMessage::Shape(shape) => serde_json::to_string(&ShapePayload { shape }),
            BoardMessage::Update(shapes) => serde_json::to_string(&UpdatePayload {
                kind: UPDATE,
                shapes,
            }),
        }
    }

    /// Decode and validate a payload. Rectangles are normalized on the way in.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        let raw: RawPayload = serde_json::from_str(json)?;
        if raw.kind.as_deref() == Some(UPDATE) {
            let shapes = raw
                .shapes
                .ok_or(SyncError::MissingField("shapes"))?
                .into_iter()
                .map(Shape::normalized)
                .collect::<Vec<_>>();
            for shape in &shapes {
                shape.validate()?;
            }
            Ok(BoardMessage::Update(shapes))
        } else {
            let shape = raw.shape.ok_or(SyncError::MissingField("shape"))?.normalized();
            shape.validate()?;
            Ok(BoardMessage::Shape(shape))
        }
    }

    /// Wrap this payload in a `chat` envelope for `room_id`.
    pub fn to_envelope(&self, room_id: &str) -> Result<String, serde_json::Error> {
        RelayMessage::Chat {
            message: self.to_json()?,
            room_id: room_id.to_string(),
        }
        .to_json()
    }

    /// Apply to a plain shape list (append or replace).
    pub fn apply_to(self, shapes: &mut Vec<Shape>) {
        match self {
            BoardMessage::Shape(shape) => shapes.push(shape),
            BoardMessage::Update(replacement) => *shapes = replacement,
        }
    }
}

/// Decode an inbound relay frame for `room_id`.
///
/// Returns `Ok(None)` for frames that are not board traffic for this room.
pub fn decode_inbound(json: &str, room_id: &str) -> Result<Option<BoardMessage>, SyncError> {
    match RelayMessage::from_json(json)? {
        RelayMessage::Chat {
            message,
            room_id: target,
        } => {
            if target != room_id {
                log::debug!("Ignoring chat for room {target}");
                return Ok(None);
            }
            BoardMessage::from_json(&message).map(Some)
        }
        RelayMessage::Error { message } => {
            log::warn!("Relay reported an error: {message}");
            Ok(None)
        }
        other => {
            log::debug!("Ignoring relay message {other:?}");
            Ok(None)
        }
    }
}

/// What an inbound message did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// One shape was appended.
    ShapeAppended,
    /// The whole set was replaced.
    StateReplaced { count: usize },
    /// The frame was not for us.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle};
    use kurbo::Point;
    use serde_json::{Value, json};

    #[test]
    fn test_single_shape_payload() {
        let msg = BoardMessage::Shape(Shape::Rect(Rectangle::new(10.0, 10.0, 40.0, 30.0)));
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"shape": {"type": "rect", "x": 10.0, "y": 10.0, "width": 40.0, "height": 30.0}})
        );
    }

    #[test]
    fn test_update_payload() {
        let msg = BoardMessage::Update(vec![Shape::Circle(Circle::new(Point::new(1.0, 2.0), 3.0))]);
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "update", "shapes": [{"type": "circle", "centerX": 1.0, "centerY": 2.0, "radius": 3.0}]})
        );
    }

    #[test]
    fn test_envelope_carries_payload_as_string() {
        let msg = BoardMessage::Update(Vec::new());
        let envelope: Value = serde_json::from_str(&msg.to_envelope("room-1").unwrap()).unwrap();
        assert_eq!(envelope["type"], "chat");
        assert_eq!(envelope["roomId"], "room-1");
        let inner = envelope["message"].as_str().unwrap();
        assert_eq!(BoardMessage::from_json(inner).unwrap(), msg);
    }

    #[test]
    fn test_join_message_format() {
        let json = RelayMessage::JoinRoom {
            room_id: "abc".to_string(),
        }
        .to_json()
        .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, json!({"type": "join_room", "roomId": "abc"}));
    }

    #[test]
    fn test_decode_inbound_filters() {
        let chat = BoardMessage::Shape(Shape::Rect(Rectangle::new(0.0, 0.0, 5.0, 5.0)))
            .to_envelope("r1")
            .unwrap();
        assert!(decode_inbound(&chat, "r1").unwrap().is_some());
        assert!(decode_inbound(&chat, "r2").unwrap().is_none());
        assert!(decode_inbound(r#"{"type":"presence","users":3}"#, "r1").unwrap().is_none());
        assert!(decode_inbound("not json", "r1").is_err());
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            BoardMessage::from_json(r#"{"type":"update"}"#),
            Err(SyncError::MissingField("shapes"))
        ));
        assert!(matches!(
            BoardMessage::from_json(r#"{}"#),
            Err(SyncError::MissingField("shape"))
        ));
        assert!(matches!(
            BoardMessage::from_json(r#"{"shape":{"type":"circle","centerX":0,"centerY":0,"radius":0}}"#),
            Err(SyncError::InvalidShape(ShapeError::NonPositiveRadius(_)))
        ));
        assert!(matches!(
            BoardMessage::from_json(r#"{"shape":{"type":"eraser"}}"#),
            Err(SyncError::Json(_))
        ));
        let nested = r#"{"shape":{"type":"move","shape":{"type":"rect","x":0,"y":0,"width":1,"height":1},"offsetX":1,"offsetY":1}}"#;
        assert!(matches!(
            BoardMessage::from_json(nested),
            Err(SyncError::InvalidShape(ShapeError::UnresolvedMove))
        ));
    }

    #[test]
    fn test_negative_rect_is_normalized() {
        let msg = BoardMessage::from_json(
            r#"{"shape":{"type":"rect","x":50,"y":40,"width":-40,"height":-30}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            BoardMessage::Shape(Shape::Rect(Rectangle::new(10.0, 10.0, 40.0, 30.0)))
        );
    }

    #[test]
    fn test_apply_to() {
        let mut shapes = Vec::new();
        let rect = Shape::Rect(Rectangle::new(0.0, 0.0, 5.0, 5.0));
        BoardMessage::Shape(rect.clone()).apply_to(&mut shapes);
        BoardMessage::Shape(rect.clone()).apply_to(&mut shapes);
        assert_eq!(shapes.len(), 2);
        BoardMessage::Update(vec![rect.clone()]).apply_to(&mut shapes);
        assert_eq!(shapes, vec![rect]);
    }
}
