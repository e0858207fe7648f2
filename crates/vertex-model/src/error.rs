use std::error::Error as StdError;

use textgen_gemini_model::proto::ResponseError;
use textgen_model::{ErrorKind, ModelProviderError};

use crate::GOOGLE_CLOUD_PROJECT_ENV;

/// A type-erased error, as produced by credential sources.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Project ids copied verbatim from sample configurations.
const PLACEHOLDER_PROJECT_IDS: &[&str] = &["your-gcp-project-id"];

/// Substrings of initialization errors caused by a disabled API or a
/// missing IAM grant. These match message text, so they may stop
/// matching if the upstream wording changes.
const ACCESS_DENIED_SIGNATURES: &[&str] =
    &["403", "CONSUMER_INVALID", "Permission denied"];

/// Error type for [`VertexProvider`](crate::VertexProvider).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The crate was built without Application Default Credentials
    /// support.
    #[error(
        "Vertex AI support requires the `adc` feature of \
         `textgen-vertex-model`, which pulls in `gcp_auth`. Enable it in \
         Cargo.toml: textgen-vertex-model = {{ features = [\"adc\"] }}"
    )]
    MissingDependency,

    /// The project id is empty or a placeholder.
    #[error(
        "invalid Google Cloud project id {project_id:?}: set {} or the \
         `project_id` of the Vertex AI configuration to your real project id",
        GOOGLE_CLOUD_PROJECT_ENV
    )]
    InvalidProjectId {
        /// The rejected value.
        project_id: String,
    },

    /// Initialization was rejected because the Vertex AI API is not
    /// enabled or the caller lacks permission.
    ///
    /// The message only carries the remediation steps, the rejection
    /// itself is the [`source`](StdError::source).
    #[error("{}", access_denied_message(.project_id))]
    AccessDenied {
        /// The project the credentials were initialized for.
        project_id: String,
        /// The original initialization error.
        #[source]
        source: BoxError,
    },

    /// Any other initialization failure, as reported by the credential
    /// source.
    #[error(transparent)]
    Initialization(BoxError),

    /// The credential source failed to produce a token for a request.
    #[error(transparent)]
    Credentials(BoxError),

    /// The request failed or the response could not be used.
    #[error("{message}")]
    Request {
        /// The error message.
        message: String,
        /// The kind of this error.
        kind: ErrorKind,
        /// The HTTP client error, if the request never got a usable
        /// response.
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl From<ResponseError> for Error {
    #[inline]
    fn from(err: ResponseError) -> Self {
        Error::Request {
            message: err.message,
            kind: err.kind,
            source: err.source,
        }
    }
}

impl ModelProviderError for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingDependency
            | Error::InvalidProjectId { .. }
            | Error::AccessDenied { .. } => ErrorKind::Configuration,
            Error::Initialization(_) | Error::Credentials(_) => {
                ErrorKind::Other
            }
            Error::Request { kind, .. } => *kind,
        }
    }
}

pub(crate) fn validate_project_id(project_id: &str) -> Result<(), Error> {
    let trimmed = project_id.trim();
    if trimmed.is_empty() || PLACEHOLDER_PROJECT_IDS.contains(&trimmed) {
        return Err(Error::InvalidProjectId {
            project_id: project_id.to_owned(),
        });
    }
    Ok(())
}

pub(crate) fn classify_init_error(project_id: &str, err: BoxError) -> Error {
    let text = err.to_string();
    if ACCESS_DENIED_SIGNATURES
        .iter()
        .any(|signature| text.contains(signature))
    {
        Error::AccessDenied {
            project_id: project_id.to_owned(),
            source: err,
        }
    } else {
        Error::Initialization(err)
    }
}

fn access_denied_message(project_id: &str) -> String {
    format!(
        "Vertex AI access was denied for project \"{project_id}\"\n\
         To fix this:\n  \
         1. Enable the Vertex AI API (aiplatform.googleapis.com):\n       \
         gcloud services enable aiplatform.googleapis.com --project={project_id}\n  \
         2. Grant the calling identity the Vertex AI User role (roles/aiplatform.user).\n  \
         3. Check the Application Default Credentials:\n       \
         gcloud auth application-default login"
    )
}
