/// Builder for [`VertexConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexConfigBuilder {
    project_id: String,
    location: String,
    model: Option<String>,
    base_url: Option<String>,
}

impl VertexConfigBuilder {
    /// Creates a builder for the given Google Cloud project and region
    /// (e.g. `us-central1`).
    #[inline]
    pub fn new<P: Into<String>, L: Into<String>>(
        project_id: P,
        location: L,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            model: None,
            base_url: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a custom base URL. Defaults to the regional endpoint.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the configuration.
    ///
    /// The project id is validated when the provider is created, not
    /// here. Trailing slashes of the base URL are removed.
    pub fn build(self) -> VertexConfig {
        let base_url = match self.base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_owned(),
            None => {
                format!("https://{}-aiplatform.googleapis.com", self.location)
            }
        };
        VertexConfig {
            project_id: self.project_id,
            location: self.location,
            model: self
                .model
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            base_url,
        }
    }
}

/// Configuration for the Vertex AI provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexConfig {
    pub(crate) project_id: String,
    pub(crate) location: String,
    pub(crate) model: String,
    pub(crate) base_url: String,
}

impl VertexConfig {
    /// Returns the Google Cloud project id.
    #[inline]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the region.
    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn generate_content_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, self.project_id, self.location, self.model,
        )
    }
}
