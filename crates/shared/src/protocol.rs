use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::domain::Gesture;

/// Action code as it appears inside JSON bodies.
pub fn encode_action(action: &str) -> String {
    STANDARD.encode(action.as_bytes())
}

pub fn decode_action(action_b64: &str) -> Result<String, String> {
    let bytes = STANDARD
        .decode(action_b64.trim())
        .map_err(|e| format!("invalid base64 action payload: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("action payload is not utf-8: {e}"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireGesture {
    pub directions: String,
    pub action: String,
}

/// Body of `GET /api/gestures`. A missing `success` flag fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureListResponse {
    pub success: bool,
    #[serde(default)]
    pub gestures: BTreeMap<String, WireGesture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GestureListResponse {
    pub fn into_gestures(self) -> Result<Vec<Gesture>, String> {
        self.gestures
            .into_iter()
            .map(|(name, wire)| {
                let action = decode_action(&wire.action)
                    .map_err(|e| format!("gesture \"{name}\": {e}"))?;
                Ok(Gesture {
                    name,
                    directions: wire.directions,
                    action,
                })
            })
            .collect()
    }
}

/// Body of `POST /api/gestures`. `action` fields carry the Base64 form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum GestureRequest {
    Add {
        name: String,
        directions: String,
        action: String,
    },
    Update {
        old_name: String,
        new_name: String,
        directions: String,
        action: String,
    },
    Delete {
        name: String,
    },
}

impl GestureRequest {
    pub fn add(name: &str, directions: &str, action: &str) -> Self {
        Self::Add {
            name: name.to_string(),
            directions: directions.to_string(),
            action: encode_action(action),
        }
    }

    pub fn update(old_name: &str, new_name: &str, directions: &str, action: &str) -> Self {
        Self::Update {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            directions: directions.to_string(),
            action: encode_action(action),
        }
    }

    pub fn delete(name: &str) -> Self {
        Self::Delete {
            name: name.to_string(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// The key the request is about; for an update this is the prior name.
    pub fn target(&self) -> &str {
        match self {
            Self::Add { name, .. } | Self::Delete { name } => name,
            Self::Update { old_name, .. } => old_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestExecuteRequest {
    pub action: String,
}

impl TestExecuteRequest {
    pub fn new(action: &str) -> Self {
        Self {
            action: encode_action(action),
        }
    }
}

/// Reply to every mutating call and to test execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
