//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use textgen_model::{ErrorKind, ModelProvider, ModelProviderError};
use tokio::time::sleep;

pub use preset::*;

/// The environment variable name reported by [`TestModelProvider`].
pub const TEST_MODEL_ENV_VAR: &str = "TEST_MODEL_API_KEY";

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct State {
    script: VecDeque<PresetResponse>,
    prompts: Vec<String>,
}

/// A local fake model for testing purpose.
///
/// Before sending prompts, you need to setup the script, which is how the
/// model should respond. Each call consumes the next preset response in
/// order. If there are no enough responses in the script, an error will
/// be returned. Every prompt received is recorded and can be inspected
/// with [`prompts`](Self::prompts).
///
/// Clones share the same script and recorded prompts.
///
/// # Note
///
/// This type is not optimized for production use. You should only use
/// it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    state: Arc<Mutex<State>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends a response to the script.
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.lock().script.push_back(preset);
    }

    /// Sets how long each call waits before responding.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the script from others.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    #[inline]
    fn env_var_name(&self) -> &'static str {
        TEST_MODEL_ENV_VAR
    }

    fn generate_content(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut state = self.lock();
            state.prompts.push(prompt.to_owned());
            state.script.pop_front()
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match preset {
                Some(PresetResponse::Text(text)) => Ok(text),
                Some(PresetResponse::Failure(failure)) => Err(Error {
                    message: failure.message,
                    kind: failure.kind,
                }),
                None => Err(Error {
                    message: "no enough responses".to_owned(),
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
