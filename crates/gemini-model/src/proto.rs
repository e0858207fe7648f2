//! Wire types of the `generateContent` method.
//!
//! The Gemini API and Vertex AI share the same request and response
//! bodies, so this module is public for the Vertex provider to reuse.

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use textgen_model::ErrorKind;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A content part. Only text parts are modeled, other kinds of parts
/// deserialize with `text` left empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// A failure while reading or interpreting a response.
#[derive(Debug)]
pub struct ResponseError {
    pub message: String,
    pub kind: ErrorKind,
    /// The HTTP client error, if the body could not be read.
    pub source: Option<reqwest::Error>,
}

impl ResponseError {
    #[inline]
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            source: None,
        }
    }

    #[inline]
    fn other(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Other)
    }
}

// -----------
// Conversions
// -----------

/// Creates a single-turn request with the prompt as the only user part.
#[inline]
pub fn create_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_owned()),
            parts: vec![Part {
                text: Some(prompt.to_owned()),
            }],
        }],
    }
}

/// Reads the body of an HTTP response, turning non-success statuses
/// into errors carrying the server's message.
pub async fn read_response(
    resp: Response,
) -> Result<GenerateContentResponse, ResponseError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|err| ResponseError {
            message: "failed to read response body".to_owned(),
            kind: ErrorKind::Other,
            source: Some(err),
        })?;
    trace!("got response body: {body}");

    if !status.is_success() {
        return Err(ResponseError::new(
            error_message(status, &body),
            status_kind(status),
        ));
    }

    serde_json::from_str(&body).map_err(|err| {
        ResponseError::other(format!("invalid response payload: {err}"))
    })
}

/// Returns the text of the first candidate, which is the concatenation
/// of all of its text parts.
pub fn response_text(
    resp: GenerateContentResponse,
) -> Result<String, ResponseError> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) =
            resp.prompt_feedback.and_then(|feedback| feedback.block_reason)
        {
            return Err(ResponseError::new(
                format!("prompt was blocked: {reason}"),
                ErrorKind::Moderated,
            ));
        }
        return Err(ResponseError::other("response has no candidates"));
    };

    let mut text: Option<String> = None;
    for part in candidate.content.into_iter().flat_map(|c| c.parts) {
        if let Some(part_text) = part.text {
            text.get_or_insert_default().push_str(&part_text);
        }
    }

    text.ok_or_else(|| match candidate.finish_reason.as_deref() {
        Some("SAFETY") => ResponseError::new(
            "response was blocked: SAFETY",
            ErrorKind::Moderated,
        ),
        reason => ResponseError::other(format!(
            "response has no text (finish reason: {})",
            reason.unwrap_or("unknown")
        )),
    })
}

#[inline]
pub fn status_kind(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::PermissionDenied
        }
        _ => ErrorKind::Other,
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => api_error.error.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body.to_owned(),
    };
    format!("HTTP {}: {message}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_create_request() {
        let request = create_request("Hello\nworld");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "Hello\nworld" }]
                }]
            })
        );
    }

    #[test]
    fn test_text_joins_parts() {
        let resp = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Hello, " },
                        { "functionCall": { "name": "noop", "args": {} } },
                        { "text": "world!" }
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 3 }
        }));
        assert_eq!(response_text(resp).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let resp = parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  padded \n" }] } }]
        }));
        assert_eq!(response_text(resp).unwrap(), "  padded \n");
    }

    #[test]
    fn test_blocked_prompt() {
        let resp = parse(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }));
        let err = response_text(resp).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Moderated);

        let err = response_text(parse(json!({}))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Other);
    }

    #[test]
    fn test_candidate_without_text() {
        let resp = parse(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }));
        assert_eq!(response_text(resp).unwrap_err().kind, ErrorKind::Moderated);

        let resp = parse(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "MAX_TOKENS" }]
        }));
        let err = response_text(resp).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Other);
        assert!(err.message.contains("MAX_TOKENS"));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "HTTP 400: API key not valid."
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "HTTP 502: upstream down"
        );
        assert_eq!(
            status_kind(StatusCode::TOO_MANY_REQUESTS),
            ErrorKind::RateLimitExceeded
        );
        assert_eq!(status_kind(StatusCode::FORBIDDEN), ErrorKind::PermissionDenied);
    }
}
