//! Wire payloads exchanged with HTTP callers.
//!
//! Field names are part of the contract: requests use `src`/`dst`, responses
//! use capitalised `Message`/`Body`.

use std::path::PathBuf;

use archivist_fsops::{MoveRequest, SizeRequest};
use serde::{Deserialize, Serialize};

/// Body of `POST /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MoveParams {
    /// Directory to move.
    pub src: String,
    /// Target location.
    pub dst: String,
}

impl MoveParams {
    /// Convert into the workflow request.
    #[must_use]
    pub fn into_request(self) -> MoveRequest {
        MoveRequest {
            source: PathBuf::from(self.src),
            destination: PathBuf::from(self.dst),
        }
    }
}

/// Body of `POST /size`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SizeParams {
    /// Path to measure.
    pub src: String,
}

impl SizeParams {
    /// Convert into the workflow request.
    #[must_use]
    pub fn into_request(self) -> SizeRequest {
        SizeRequest {
            source: PathBuf::from(self.src),
        }
    }
}

/// Response envelope shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Human-readable outcome.
    #[serde(rename = "Message")]
    pub message: String,
    /// Error detail or decimal byte count.
    #[serde(rename = "Body")]
    pub body: String,
}

impl Answer {
    /// Build an answer from its two parts.
    #[must_use]
    pub fn new(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn move_params_ignore_unknown_and_default_missing_fields() -> anyhow::Result<()> {
        let params: MoveParams = serde_json::from_value(json!({"src": "/a", "extra": 1}))?;
        assert_eq!(params.src, "/a");
        assert_eq!(params.dst, "");
        let request = params.into_request();
        assert_eq!(request.source, PathBuf::from("/a"));
        Ok(())
    }

    #[test]
    fn answer_uses_capitalised_fields() -> anyhow::Result<()> {
        let rendered = serde_json::to_value(Answer::new("Ready", ""))?;
        assert_eq!(rendered, json!({"Message": "Ready", "Body": ""}));
        Ok(())
    }
}
