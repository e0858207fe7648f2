use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use textgen_model::ErrorKind;

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

// -----------
// Conversions
// -----------

/// Creates a single-turn request: the prompt is the only message, with
/// no system message.
#[inline]
pub fn create_request(
    prompt: &str,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![Message::User {
            content: prompt.to_owned(),
        }],
    }
}

/// Returns the content of the first choice.
pub fn completion_text(
    completion: ChatCompletion,
) -> Result<String, Error> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new("completion has no choices", ErrorKind::Other));
    };
    if let Some(content) = choice.message.content {
        return Ok(content);
    }

    if let Some(refusal) = choice.message.refusal {
        return Err(Error::new(
            format!("model refused: {refusal}"),
            ErrorKind::Moderated,
        ));
    }
    match choice.finish_reason.as_deref() {
        Some("content_filter") => Err(Error::new(
            "completion was filtered: content_filter",
            ErrorKind::Moderated,
        )),
        reason => Err(Error::new(
            format!(
                "completion has no content (finish reason: {})",
                reason.unwrap_or("unknown")
            ),
            ErrorKind::Other,
        )),
    }
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

pub fn error_message(status: StatusCode, body: &str) -> String {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => api_error.error.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body.to_owned(),
    };
    format!("HTTP {}: {message}", status.as_u16())
}
