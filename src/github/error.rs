//! Error types exposed by the repository scan.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while configuring a scan or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The account name used for basic authentication was missing.
    #[error("GitHub user name is required")]
    MissingUser,

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The credentials were rejected by GitHub.
    #[error("GitHub rejected the credentials: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// Rate limit exceeded - the API declined further requests.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from response headers.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// The requested resource does not exist.
    #[error("GitHub resource not found: {message}")]
    NotFound {
        /// Description of the missing resource.
        message: String,
    },

    /// GitHub answered with any other non-success status.
    #[error("GitHub API error (status {status}): {message}")]
    Upstream {
        /// HTTP status code returned by GitHub.
        status: u16,
        /// Response message from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A request did not complete before its deadline.
    #[error("request timed out: {message}")]
    Timeout {
        /// The request that expired.
        message: String,
    },

    /// A response body did not match the expected schema.
    #[error("malformed GitHub response: {message}")]
    MalformedResponse {
        /// Details about the schema mismatch.
        message: String,
    },

    /// A page number could not be extracted from a pagination link.
    #[error("unable to read page number from pagination link: {message}")]
    PaginationParse {
        /// The offending link and reason.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl ScanError {
    /// Returns true when the failure is transient and the request may be
    /// repeated.
    ///
    /// Malformed responses and pagination parse failures indicate an API
    /// contract change and are never retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Rate limit details attached to a rate limit failure.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::RateLimitExceeded {
                rate_limit: Some(info),
                ..
            } => Some(info),
            _ => None,
        }
    }
}
