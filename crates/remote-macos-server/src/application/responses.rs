//! Records returned by each tool.
//!
//! Field names are the wire names; every record serializes to the JSON
//! object a tool caller receives.

use remote_macos_core::KeyToken;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoResponse {
    pub message: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenCapture {
    pub image_base64: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    pub ok: bool,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickResponse {
    pub ok: bool,
    pub x: i32,
    pub y: i32,
    /// Canonical button name: "left", "middle" or "right".
    pub button: String,
    pub clicks: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollResponse {
    pub ok: bool,
    pub direction: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragResponse {
    pub ok: bool,
    pub start: Point,
    pub end: Point,
    /// Interpolation steps actually used.
    pub steps: u32,
    pub duration_ms: i64,
    pub button: String,
}

/// One input group performed by `send_keys`, in the order performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyAction {
    /// Literal text; `characters` counts Unicode scalar values.
    Text { characters: usize },
    Special { key: KeyToken },
    Combination { keys: Vec<KeyToken> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendKeysResponse {
    pub ok: bool,
    pub actions: Vec<KeyAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenApplicationResponse {
    pub ok: bool,
    pub application: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_actions_serialize_with_type_tag() {
        // Arrange
        let response = SendKeysResponse {
            ok: true,
            actions: vec![
                KeyAction::Text { characters: 5 },
                KeyAction::Special {
                    key: KeyToken::from("return"),
                },
                KeyAction::Combination {
                    keys: vec![KeyToken::from("super"), KeyToken::from("c")],
                },
            ],
        };

        // Act
        let value = serde_json::to_value(&response).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "ok": true,
                "actions": [
                    {"type": "text", "characters": 5},
                    {"type": "special", "key": "return"},
                    {"type": "combination", "keys": ["super", "c"]},
                ]
            })
        );
    }

    #[test]
    fn test_drag_response_nests_points() {
        let response = DragResponse {
            ok: true,
            start: Point { x: 0, y: 0 },
            end: Point { x: 10, y: 10 },
            steps: 4,
            duration_ms: 160,
            button: "left".into(),
        };

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["start"], json!({"x": 0, "y": 0}));
        assert_eq!(value["end"], json!({"x": 10, "y": 10}));
        assert_eq!(value["steps"], 4);
    }
}
