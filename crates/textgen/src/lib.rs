//! Text generation with hosted LLMs behind a uniform interface.
//!
//! Three backends are supported: the Gemini API (API key), Gemini on
//! Vertex AI (Application Default Credentials) and OpenAI-compatible
//! chat completions (API key). Pick one with a [`ProviderConfig`],
//! build it with [`Provider::from_config`], and call
//! [`generate_content`](textgen_model::ModelProvider::generate_content).
//!
//! [`TextGenerator`] erases the provider type, which is handy when the
//! provider is chosen at runtime or replaced by a fake in tests.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod generator;
mod provider;

pub use config::{ParseProviderKindError, ProviderConfig, ProviderKind};
pub use generator::TextGenerator;
pub use provider::{Error, Provider};

/// Re-exports of [`textgen_model`] crate.
pub mod model {
    pub use textgen_model::*;
}

/// Re-exports of [`textgen_gemini_model`] crate.
pub mod gemini {
    pub use textgen_gemini_model::*;
}

/// Re-exports of [`textgen_vertex_model`] crate.
pub mod vertex {
    pub use textgen_vertex_model::*;
}

/// Re-exports of [`textgen_openai_model`] crate.
pub mod openai {
    pub use textgen_openai_model::*;
}
