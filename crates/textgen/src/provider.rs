use futures_util::{FutureExt, TryFutureExt};
use textgen_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use textgen_model::{ErrorKind, ModelProvider, ModelProviderError};
use textgen_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use textgen_vertex_model::{VertexConfigBuilder, VertexProvider};

use crate::config::{ProviderConfig, ProviderKind};

/// Error type for [`Provider`], wrapping the error of the selected
/// backend unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the Gemini API provider.
    #[error(transparent)]
    Gemini(#[from] textgen_gemini_model::Error),
    /// An error from the Vertex AI provider.
    #[error(transparent)]
    Vertex(#[from] textgen_vertex_model::Error),
    /// An error from the OpenAI provider.
    #[error(transparent)]
    OpenAI(#[from] textgen_openai_model::Error),
}

impl ModelProviderError for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Gemini(err) => err.kind(),
            Error::Vertex(err) => err.kind(),
            Error::OpenAI(err) => err.kind(),
        }
    }
}

/// One of the supported backends.
#[derive(Clone, Debug)]
pub enum Provider {
    /// The Gemini API.
    Gemini(GeminiProvider),
    /// Gemini on Vertex AI.
    Vertex(VertexProvider),
    /// OpenAI-compatible chat completions.
    OpenAI(OpenAIProvider),
}

impl Provider {
    /// Constructs the backend selected by `config`.
    ///
    /// Only Vertex AI can fail here, see
    /// [`VertexProvider::new`](textgen_vertex_model::VertexProvider::new).
    pub async fn from_config(config: ProviderConfig) -> Result<Self, Error> {
        debug!(kind = %config.kind(), "creating provider");
        let provider = match config {
            ProviderConfig::Gemini {
                api_key,
                model,
                base_url,
            } => {
                let mut builder = GeminiConfigBuilder::with_api_key(api_key);
                if let Some(model) = model {
                    builder = builder.with_model(model);
                }
                if let Some(base_url) = base_url {
                    builder = builder.with_base_url(base_url);
                }
                Provider::Gemini(GeminiProvider::new(builder.build()))
            }
            ProviderConfig::Vertex {
                project_id,
                location,
                model,
                base_url,
            } => {
                let mut builder = VertexConfigBuilder::new(project_id, location);
                if let Some(model) = model {
                    builder = builder.with_model(model);
                }
                if let Some(base_url) = base_url {
                    builder = builder.with_base_url(base_url);
                }
                Provider::Vertex(VertexProvider::new(builder.build()).await?)
            }
            ProviderConfig::OpenAI {
                api_key,
                model,
                base_url,
            } => {
                let mut builder = OpenAIConfigBuilder::with_api_key(api_key);
                if let Some(model) = model {
                    builder = builder.with_model(model);
                }
                if let Some(base_url) = base_url {
                    builder = builder.with_base_url(base_url);
                }
                Provider::OpenAI(OpenAIProvider::new(builder.build()))
            }
        };
        Ok(provider)
    }

    /// Returns the backend of this provider.
    #[inline]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Gemini(_) => ProviderKind::Gemini,
            Provider::Vertex(_) => ProviderKind::Vertex,
            Provider::OpenAI(_) => ProviderKind::OpenAI,
        }
    }
}

impl From<GeminiProvider> for Provider {
    #[inline]
    fn from(provider: GeminiProvider) -> Self {
        Provider::Gemini(provider)
    }
}

impl From<VertexProvider> for Provider {
    #[inline]
    fn from(provider: VertexProvider) -> Self {
        Provider::Vertex(provider)
    }
}

impl From<OpenAIProvider> for Provider {
    #[inline]
    fn from(provider: OpenAIProvider) -> Self {
        Provider::OpenAI(provider)
    }
}

impl ModelProvider for Provider {
    type Error = Error;

    #[inline]
    fn env_var_name(&self) -> &'static str {
        match self {
            Provider::Gemini(provider) => provider.env_var_name(),
            Provider::Vertex(provider) => provider.env_var_name(),
            Provider::OpenAI(provider) => provider.env_var_name(),
        }
    }

    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        match self {
            Provider::Gemini(provider) => provider
                .generate_content(prompt)
                .map_err(Error::Gemini)
                .boxed(),
            Provider::Vertex(provider) => provider
                .generate_content(prompt)
                .map_err(Error::Vertex)
                .boxed(),
            Provider::OpenAI(provider) => provider
                .generate_content(prompt)
                .map_err(Error::OpenAI)
                .boxed(),
        }
    }
}
