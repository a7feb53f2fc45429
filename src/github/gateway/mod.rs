//! The single chokepoint for GitHub network access.
//!
//! Every component of the scan issues its requests through a
//! [`QueryGateway`], so authentication, error translation, deadlines and
//! retries are governed in one place. The trait-based design enables mocking
//! in tests while the Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod query;
mod retry;

pub use query::OctocrabQueryGateway;
pub use retry::{RetryPolicy, RetryingGateway};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::github::error::ScanError;
use crate::github::links::PageLinks;
use crate::github::rate_limit::RateLimitInfo;

/// A successful response: the raw body plus pagination and rate limit
/// metadata read from its headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    body: String,
    links: PageLinks,
    rate_limit: Option<RateLimitInfo>,
}

impl ApiResponse {
    /// Creates a response with the given body and no pagination links.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            links: PageLinks::default(),
            rate_limit: None,
        }
    }

    /// Attaches pagination links.
    #[must_use]
    pub fn with_links(mut self, links: PageLinks) -> Self {
        self.links = links;
        self
    }

    /// Attaches rate limit information.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: Option<RateLimitInfo>) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// The raw response body.
    #[must_use]
    pub const fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Pagination relations from the `Link` header.
    #[must_use]
    pub const fn links(&self) -> &PageLinks {
        &self.links
    }

    /// Rate limit headers, when GitHub sent them.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MalformedResponse`] naming `operation` when the
    /// body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self, operation: &str) -> Result<T, ScanError> {
        serde_json::from_str(&self.body).map_err(|error| ScanError::MalformedResponse {
            message: format!("{operation} response deserialisation failed: {error}"),
        })
    }
}

/// Gateway that performs authenticated `GET` requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Fetches an absolute URL.
    ///
    /// Non-success statuses fail with the upstream status and message; the
    /// caller does not retry.
    async fn query(&self, url: &Url) -> Result<ApiResponse, ScanError>;
}
