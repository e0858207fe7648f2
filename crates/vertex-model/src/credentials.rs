use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;

use crate::BoxError;

/// A source of OAuth access tokens for Vertex AI requests.
///
/// Implementations are expected to cache and refresh tokens themselves,
/// [`access_token`](Self::access_token) is called once per request.
#[async_trait]
pub trait Credentials: Send + Sync {
    /// Returns a bearer token valid for the `cloud-platform` scope.
    async fn access_token(&self) -> Result<String, BoxError>;
}

/// Credentials that always return the same, externally obtained token.
#[derive(Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    /// Creates credentials from an access token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Debug for StaticCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Credentials for StaticCredentials {
    async fn access_token(&self) -> Result<String, BoxError> {
        Ok(self.token.clone())
    }
}

#[cfg(feature = "adc")]
pub(crate) mod adc {
    use std::sync::Arc;

    use gcp_auth::TokenProvider;

    use super::*;

    const SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

    /// Application Default Credentials resolved by `gcp_auth`.
    pub struct ApplicationDefaultCredentials {
        provider: Arc<dyn TokenProvider>,
    }

    impl ApplicationDefaultCredentials {
        /// Resolves the ambient credentials and fetches a first token, so
        /// that access problems surface when the provider is created.
        pub async fn load() -> Result<Arc<dyn Credentials>, BoxError> {
            debug!("resolving application default credentials");
            let provider = gcp_auth::provider().await?;
            provider.token(SCOPES).await?;
            Ok(Arc::new(Self { provider }))
        }
    }

    #[async_trait]
    impl Credentials for ApplicationDefaultCredentials {
        async fn access_token(&self) -> Result<String, BoxError> {
            let token = self.provider.token(SCOPES).await?;
            Ok(token.as_str().to_owned())
        }
    }
}
