use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The provider is misconfigured or missing a required component.
    /// Retrying without changing the configuration will not help.
    Configuration,
    /// The credentials were rejected by the backend.
    PermissionDenied,
    /// The content is moderated.
    Moderated,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}

impl ErrorKind {
    /// Returns `true` if this error was raised while constructing a
    /// provider rather than while serving a request.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, ErrorKind::Configuration)
    }
}
