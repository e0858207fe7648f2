use std::error::Error;

use crate::error::ErrorKind;

/// The error type for a model provider.
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a model provider, which turns a prompt into
/// the text generated by the backing model.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state (an HTTP connection pool, cached
/// credentials), but callers should not rely on it, and the provider
/// should be prepared for being dropped anytime.
///
/// Implementations must be safe to share between threads, concurrent
/// calls to [`generate_content`](Self::generate_content) on the same
/// instance are allowed.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Returns the name of the environment variable conventionally
    /// holding the credential for this provider.
    ///
    /// This is a discovery aid for callers deciding where to source the
    /// credential from. Providers never read it themselves.
    fn env_var_name(&self) -> &'static str;

    /// Sends the prompt to the model and resolves to the complete text
    /// of its response.
    ///
    /// The prompt is passed to the backend verbatim, and the returned
    /// text is exactly what the backend produced. The returned future
    /// doesn't borrow `self` or the prompt, there is no retry and no
    /// partial result.
    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static;
}
