//! Errors returned by the source clients.

use std::fmt;

use thiserror::Error;

/// Upstream service a request was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GitHub,
    Linear,
}

impl Service {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::Linear => "Linear",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source client errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provided token was invalid.
    #[error("invalid {service} token: {reason}")]
    InvalidToken {
        service: Service,
        reason: &'static str,
    },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service returned an error status or GraphQL errors.
    #[error("{service} API error: {message}")]
    Api { service: Service, message: String },
    /// Failed to parse response.
    #[error("invalid {service} response: {message}")]
    InvalidResponse { service: Service, message: String },
}

/// Rejects empty and whitespace-only tokens.
pub(crate) fn validate_token(service: Service, token: &str) -> Result<(), SourceError> {
    if token.is_empty() {
        return Err(SourceError::InvalidToken {
            service,
            reason: "token cannot be empty",
        });
    }
    if token.trim().is_empty() {
        return Err(SourceError::InvalidToken {
            service,
            reason: "token cannot be whitespace-only",
        });
    }
    Ok(())
}
