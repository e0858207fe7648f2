use serde::{Deserialize, Serialize};
use textgen_model::ErrorKind;

/// The preset outcome of one `generate_content` call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetResponse {
    /// Resolves to this text.
    #[serde(rename = "text")]
    Text(String),
    /// Fails with an error of this kind and message.
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

/// A scripted failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetFailure {
    /// The kind reported by the returned error.
    pub kind: ErrorKind,
    /// The message of the returned error.
    pub message: String,
}

impl PresetResponse {
    /// Creates a successful preset with the given text.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a failing preset.
    #[inline]
    pub fn with_failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(PresetFailure {
            kind,
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let responses = vec![
            PresetResponse::with_text("I have left a message for you."),
            PresetResponse::with_failure(
                ErrorKind::RateLimitExceeded,
                "slow down",
            ),
        ];

        let serialized = serde_json::to_value(&responses).unwrap();
        assert_eq!(
            serialized,
            json!([
                { "type": "text", "data": "I have left a message for you." },
                {
                    "type": "failure",
                    "data": { "kind": "rate_limit_exceeded", "message": "slow down" }
                }
            ])
        );

        let deserialized: Vec<PresetResponse> =
            serde_json::from_value(serialized).unwrap();
        assert_eq!(responses, deserialized);
    }
}
