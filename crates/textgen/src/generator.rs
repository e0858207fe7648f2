use std::fmt::{self, Debug, Formatter};
use std::pin::Pin;
use std::sync::Arc;

use textgen_model::{ModelProvider, ModelProviderError};
use tracing::Instrument;

type GenerateResult = Result<String, Box<dyn ModelProviderError>>;
type BoxedGenerateFuture = Pin<Box<dyn Future<Output = GenerateResult> + Send>>;
type HandlerFn = Arc<dyn Fn(&str) -> BoxedGenerateFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface, so callers don't need to be generic over the provider.
///
/// Cloning is cheap, all clones share the same provider.
#[derive(Clone)]
pub struct TextGenerator {
    env_var_name: &'static str,
    handler_fn: HandlerFn,
}

impl TextGenerator {
    /// Wraps `provider`.
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        let env_var_name = provider.env_var_name();
        // We have to erase the type `P`, since `TextGenerator` doesn't have
        // a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |prompt: &str| {
            let fut = provider.generate_content(prompt);
            let prompt_len = prompt.len();
            Box::pin(
                async move {
                    trace!(prompt_len, "generating content");
                    match fut.await {
                        Ok(text) => {
                            trace!(text_len = text.len(), "generated content");
                            Ok(text)
                        }
                        Err(err) => {
                            error!(kind = ?err.kind(), "got an error: {err}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("generate content", env_var_name)),
            )
        });
        Self {
            env_var_name,
            handler_fn,
        }
    }

    /// Returns the environment variable name of the wrapped provider.
    #[inline]
    pub fn env_var_name(&self) -> &'static str {
        self.env_var_name
    }

    /// Generates text for the prompt with the wrapped provider.
    ///
    /// The error is the provider's own error, boxed.
    #[inline]
    pub async fn generate(&self, prompt: &str) -> GenerateResult {
        (self.handler_fn)(prompt).await
    }
}

impl Debug for TextGenerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextGenerator")
            .field("env_var_name", &self.env_var_name)
            .finish_non_exhaustive()
    }
}
