//! A model provider for Gemini models hosted on Google Vertex AI.
//!
//! Unlike the Gemini API, Vertex AI has no API key. Requests are
//! authorized with OAuth tokens, by default obtained from Application
//! Default Credentials (requires the `adc` feature, on by default).

#[macro_use]
extern crate tracing;

mod config;
mod credentials;
mod error;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use reqwest::Client;
use textgen_gemini_model::proto;
use textgen_model::{ErrorKind, ModelProvider};

pub use config::{VertexConfig, VertexConfigBuilder};
pub use credentials::{Credentials, StaticCredentials};
pub use error::{BoxError, Error};

/// The environment variable conventionally holding the Google Cloud
/// project id.
pub const GOOGLE_CLOUD_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Vertex AI model provider.
#[derive(Clone)]
pub struct VertexProvider {
    client: Client,
    config: Arc<VertexConfig>,
    credentials: Arc<dyn Credentials>,
}

impl VertexProvider {
    /// Creates a new `VertexProvider` authenticated with Application
    /// Default Credentials.
    ///
    /// The project id is validated before any credential lookup. If the
    /// credentials are rejected because the Vertex AI API is disabled or
    /// the caller lacks permission, [`Error::AccessDenied`] explains how
    /// to fix the project setup.
    #[cfg(feature = "adc")]
    pub async fn new(config: VertexConfig) -> Result<Self, Error> {
        Self::with_credentials_loader(
            config,
            credentials::adc::ApplicationDefaultCredentials::load,
        )
        .await
    }

    /// Always fails with [`Error::MissingDependency`], since this build
    /// has no Application Default Credentials support. Use
    /// [`with_credentials`](Self::with_credentials) or enable the `adc`
    /// feature.
    #[cfg(not(feature = "adc"))]
    pub async fn new(config: VertexConfig) -> Result<Self, Error> {
        error!(project = %config.project_id, "Vertex AI requires the `adc` feature");
        Err(Error::MissingDependency)
    }

    /// Creates a new `VertexProvider` with credentials produced by
    /// `loader`.
    ///
    /// `loader` is only called once the project id has been validated.
    /// Its failure is reported the same way as in [`new`](Self::new).
    pub async fn with_credentials_loader<F, Fut, E>(
        config: VertexConfig,
        loader: F,
    ) -> Result<Self, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn Credentials>, E>>,
        E: Into<BoxError>,
    {
        error::validate_project_id(&config.project_id)?;

        let credentials = match loader().await {
            Ok(credentials) => credentials,
            Err(err) => {
                let err: BoxError = err.into();
                error!("failed to initialize Vertex AI credentials: {err}");
                return Err(error::classify_init_error(&config.project_id, err));
            }
        };
        Ok(Self::build(config, credentials))
    }

    /// Creates a new `VertexProvider` with the given credentials.
    pub fn with_credentials(
        config: VertexConfig,
        credentials: Arc<dyn Credentials>,
    ) -> Result<Self, Error> {
        error::validate_project_id(&config.project_id)?;
        Ok(Self::build(config, credentials))
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &VertexConfig {
        &self.config
    }

    fn build(config: VertexConfig, credentials: Arc<dyn Credentials>) -> Self {
        info!(
            project = %config.project_id,
            location = %config.location,
            model = %config.model,
            "created Vertex AI provider"
        );
        Self {
            client: Client::new(),
            config: Arc::new(config),
            credentials,
        }
    }
}

impl Debug for VertexProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for VertexProvider {
    type Error = Error;

    #[inline]
    fn env_var_name(&self) -> &'static str {
        GOOGLE_CLOUD_PROJECT_ENV
    }

    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let vertex_req = proto::create_request(prompt);
        let url = self.config.generate_content_url();
        let client = self.client.clone();
        let credentials = Arc::clone(&self.credentials);

        async move {
            let token = credentials.access_token().await.map_err(|err| {
                error!("failed to get access token: {err}");
                Error::Credentials(err)
            })?;

            debug!(%url, "sending generateContent request");
            let resp = client
                .post(url)
                .bearer_auth(token)
                .json(&vertex_req)
                .send()
                .await
                .map_err(|err| {
                    error!("request failed: {err}");
                    Error::Request {
                        message: "failed to send request".to_owned(),
                        kind: ErrorKind::Other,
                        source: Some(err),
                    }
                })?;
            let vertex_resp = proto::read_response(resp).await?;
            Ok(proto::response_text(vertex_resp)?)
        }
    }
}
