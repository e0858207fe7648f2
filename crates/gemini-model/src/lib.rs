//! A model provider for the Gemini API, authenticated with an API key.

#[macro_use]
extern crate tracing;

mod config;
pub mod proto;

use std::sync::Arc;

use reqwest::Client;
use textgen_model::{ErrorKind, ModelProvider, ModelProviderError};

pub use config::{GeminiConfig, GeminiConfigBuilder};
use proto::ResponseError;

/// The environment variable conventionally holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Error type for [`GeminiProvider`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
    #[source]
    source: Option<reqwest::Error>,
}

impl Error {
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

impl From<ResponseError> for Error {
    #[inline]
    fn from(err: ResponseError) -> Self {
        Self {
            message: err.message,
            kind: err.kind,
            source: err.source,
        }
    }
}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        info!(model = %config.model, "created Gemini provider");
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;

    #[inline]
    fn env_var_name(&self) -> &'static str {
        GEMINI_API_KEY_ENV
    }

    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(prompt);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        debug!(%url, "sending generateContent request");
        let resp_fut = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&gemini_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    error!("request failed: {err}");
                    return Err(Error::transport("failed to send request", err));
                }
            };
            let gemini_resp = proto::read_response(resp).await?;
            Ok(proto::response_text(gemini_resp)?)
        }
    }
}
