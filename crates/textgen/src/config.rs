use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use textgen_gemini_model::GEMINI_API_KEY_ENV;
use textgen_openai_model::OPENAI_API_KEY_ENV;
use textgen_vertex_model::GOOGLE_CLOUD_PROJECT_ENV;

/// The supported backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// The Gemini API, authenticated with an API key.
    #[serde(rename = "gemini")]
    Gemini,
    /// Gemini on Vertex AI, authenticated with cloud credentials.
    #[serde(rename = "vertex", alias = "vertex_ai")]
    Vertex,
    /// OpenAI-compatible chat completions.
    #[serde(rename = "openai")]
    OpenAI,
}

impl ProviderKind {
    /// All supported backends.
    pub const ALL: [ProviderKind; 3] =
        [ProviderKind::Gemini, ProviderKind::Vertex, ProviderKind::OpenAI];

    /// Returns the name of the environment variable conventionally
    /// holding the credential (or project id) for this backend.
    #[inline]
    pub fn env_var_name(self) -> &'static str {
        match self {
            ProviderKind::Gemini => GEMINI_API_KEY_ENV,
            ProviderKind::Vertex => GOOGLE_CLOUD_PROJECT_ENV,
            ProviderKind::OpenAI => OPENAI_API_KEY_ENV,
        }
    }

    /// Returns the canonical name of this backend.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Vertex => "vertex",
            ProviderKind::OpenAI => "openai",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ProviderKind`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider {0:?}, expected one of: gemini, vertex, openai")]
pub struct ParseProviderKindError(String);

/// Accepts the same names as the serialized forms of [`ProviderKind`]
/// and the `provider` tag of [`ProviderConfig`].
impl FromStr for ProviderKind {
    type Err = ParseProviderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ProviderKind::Gemini),
            "vertex" | "vertex_ai" => Ok(ProviderKind::Vertex),
            "openai" => Ok(ProviderKind::OpenAI),
            _ => Err(ParseProviderKindError(s.to_owned())),
        }
    }
}

/// Selects a backend and carries everything needed to construct it.
///
/// The serialized form is tagged by `provider`:
///
/// ```json
/// { "provider": "vertex", "project_id": "acme-prod", "location": "us-central1" }
/// ```
///
/// `model` and `base_url` fall back to each backend's defaults when
/// omitted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ProviderConfig {
    /// The Gemini API.
    #[serde(rename = "gemini")]
    Gemini {
        /// The API key.
        api_key: String,
        /// The model name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        /// A custom base URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    /// Gemini on Vertex AI.
    #[serde(rename = "vertex", alias = "vertex_ai")]
    Vertex {
        /// The Google Cloud project id.
        project_id: String,
        /// The region, e.g. `us-central1`.
        location: String,
        /// The model name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        /// A custom base URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    /// OpenAI-compatible chat completions.
    #[serde(rename = "openai")]
    OpenAI {
        /// The API key.
        api_key: String,
        /// The model name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        /// A custom base URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Returns the backend this configuration selects.
    #[inline]
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::Gemini { .. } => ProviderKind::Gemini,
            ProviderConfig::Vertex { .. } => ProviderKind::Vertex,
            ProviderConfig::OpenAI { .. } => ProviderKind::OpenAI,
        }
    }
}

impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Gemini {
                model, base_url, ..
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"<redacted>")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Vertex {
                project_id,
                location,
                model,
                base_url,
            } => f
                .debug_struct("Vertex")
                .field("project_id", project_id)
                .field("location", location)
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                model, base_url, ..
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"<redacted>")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_kind_env_var_names() {
        assert_eq!(ProviderKind::Gemini.env_var_name(), "GEMINI_API_KEY");
        assert_eq!(ProviderKind::Vertex.env_var_name(), "GOOGLE_CLOUD_PROJECT");
        assert_eq!(ProviderKind::OpenAI.env_var_name(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_kind_from_str() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
        let err = "claude".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("\"claude\""));
    }

    #[test]
    fn test_names_agree_with_serde() {
        let accepted = [
            ("gemini", ProviderKind::Gemini),
            ("vertex", ProviderKind::Vertex),
            ("vertex_ai", ProviderKind::Vertex),
            ("openai", ProviderKind::OpenAI),
        ];
        for (name, kind) in accepted {
            assert_eq!(name.parse::<ProviderKind>().unwrap(), kind);
            let from_serde: ProviderKind =
                serde_json::from_value(json!(name)).unwrap();
            assert_eq!(from_serde, kind);
        }

        for name in ["Vertex", "vertex-ai", "OPENAI", "gemini "] {
            assert!(name.parse::<ProviderKind>().is_err(), "{name}");
            assert!(
                serde_json::from_value::<ProviderKind>(json!(name)).is_err(),
                "{name}"
            );
            let config = serde_json::from_value::<ProviderConfig>(json!({
                "provider": name,
                "project_id": "acme-prod",
                "location": "us-central1"
            }));
            assert!(config.is_err(), "{name}");
        }
    }

    #[test]
    fn test_deserialize_config() {
        let config: ProviderConfig = serde_json::from_value(json!({
            "provider": "vertex_ai",
            "project_id": "acme-prod",
            "location": "us-central1"
        }))
        .unwrap();
        assert_eq!(config.kind(), ProviderKind::Vertex);
        assert_eq!(
            config,
            ProviderConfig::Vertex {
                project_id: "acme-prod".to_owned(),
                location: "us-central1".to_owned(),
                model: None,
                base_url: None,
            }
        );

        let config: ProviderConfig = serde_json::from_value(json!({
            "provider": "openai",
            "api_key": "sk-secret",
            "model": "gpt-4.1"
        }))
        .unwrap();
        assert_eq!(config.kind(), ProviderKind::OpenAI);

        let result = serde_json::from_value::<ProviderConfig>(json!({
            "provider": "gemini"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "AIza-secret".to_owned(),
            model: Some("gemini-1.5-pro".to_owned()),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("gemini-1.5-pro"));
    }
}
