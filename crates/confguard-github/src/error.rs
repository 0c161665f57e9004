//! Error types for repository service access.

use thiserror::Error;

/// Result type for repository service operations.
pub type Result<T> = std::result::Result<T, GitHubError>;

/// Errors that can occur when talking to the repository service.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The requested resource does not exist (or is not visible).
    #[error("not found: {0}")]
    NotFound(String),

    /// The write was rejected because the expected base is stale.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The service answered with an unexpected status.
    #[error("api error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A request URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The response body could not be parsed.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// File content could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// An organization lookup was requested without an organization.
    #[error("no organization found in payload")]
    MissingOrganization,
}

impl GitHubError {
    /// Build an error from a non-success HTTP status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Api { status, message },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Api { status, .. } => *status,
            Self::Network(_) => 502,
            Self::InvalidUrl(_) => 500,
            Self::InvalidResponse(_) => 502,
            Self::Decode(_) => 422,
            Self::MissingOrganization => 422,
        }
    }

    /// Check if this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(GitHubError::from_status(404, "missing".into()).is_not_found());
        assert!(matches!(
            GitHubError::from_status(409, "stale".into()),
            GitHubError::Conflict(_)
        ));
        assert_eq!(GitHubError::from_status(500, "boom".into()).status_code(), 500);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(GitHubError::MissingOrganization.status_code(), 422);
        assert_eq!(GitHubError::Network("down".into()).status_code(), 502);
    }
}
