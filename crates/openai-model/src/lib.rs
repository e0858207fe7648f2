//! A model provider for OpenAI-compatible chat completion APIs.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, header};
use textgen_model::{ErrorKind, ModelProvider, ModelProviderError};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use proto::ChatCompletion;

/// The environment variable conventionally holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Error type for [`OpenAIProvider`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
    #[source]
    source: Option<reqwest::Error>,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            source: None,
        }
    }

    fn transport(message: impl Into<String>, err: reqwest::Error) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Other,
            source: Some(err),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        info!(model = %config.model, "created OpenAI provider");
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    #[inline]
    fn env_var_name(&self) -> &'static str {
        OPENAI_API_KEY_ENV
    }

    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(prompt, &self.config);
        debug!(model = %self.config.model, "sending chat completion request");
        let resp_fut = self
            .client
            .post(format!("{}{}", self.config.base_url, "/chat/completions"))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::ACCEPT, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    error!("request failed: {err}");
                    return Err(Error::transport("failed to send request", err));
                }
            };

            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = resp
                .text()
                .await
                .map_err(|err| {
                    Error::transport("failed to read response body", err)
                })?;
            trace!("got response body: {body}");

            if !status.is_success() {
                return Err(Error::new(
                    proto::error_message(status, &body),
                    proto::status_kind(status),
                ));
            }

            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let completion = serde_json::from_str::<ChatCompletion>(&body)
                .map_err(|err| {
                    Error::new(
                        format!("invalid response payload: {err}"),
                        ErrorKind::Other,
                    )
                })?;
            trace!(id = ?completion.id, "got chat completion");
            proto::completion_text(completion)
        }
    }
}
