//! Octocrab implementation of the query gateway.

use std::time::Duration;

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use tracing::debug;
use url::{Origin, Url};

use crate::github::credentials::Credentials;
use crate::github::error::ScanError;
use crate::github::links::PageLinks;
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::{ApiResponse, QueryGateway};

/// Octocrab-backed gateway issuing raw `GET`s with basic authentication.
///
/// Octocrab only attaches credentials to requests without an authority, so
/// URLs on the configured API origin are sent as `path?query` and resolved
/// against the client's base URI. URLs on any other origin are sent as-is
/// and never carry credentials.
pub struct OctocrabQueryGateway {
    client: Octocrab,
    origin: Origin,
    timeout: Duration,
}

impl OctocrabQueryGateway {
    /// Creates a new gateway from an Octocrab client configured for
    /// `api_base` and a per-request deadline.
    #[must_use]
    pub fn new(client: Octocrab, api_base: &Url, timeout: Duration) -> Self {
        Self {
            client,
            origin: api_base.origin(),
            timeout,
        }
    }

    /// Builds an Octocrab client for the given credentials and API base URL.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidUrl` when the base URI cannot be parsed or
    /// `ScanError::Configuration` when Octocrab fails to construct a client.
    pub fn for_credentials(
        credentials: &Credentials,
        api_base: &Url,
        timeout: Duration,
    ) -> Result<Self, ScanError> {
        let octocrab = build_octocrab_client(credentials, api_base)?;
        Ok(Self::new(octocrab, api_base, timeout))
    }

    fn request_uri(&self, url: &Url) -> Result<Uri, ScanError> {
        let target = if url.origin() == self.origin {
            relative_target(url)
        } else {
            url.as_str().to_owned()
        };
        target
            .parse::<Uri>()
            .map_err(|error| ScanError::InvalidUrl(format!("{url}: {error}")))
    }

    async fn fetch(&self, url: &Url) -> Result<ApiResponse, ScanError> {
        let operation = format!("GET {path}", path = url.path());
        let uri = self.request_uri(url)?;

        let response = self
            .client
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(&operation, &error))?;

        let status = response.status();
        let links = PageLinks::from_headers(response.headers());
        let rate_limit = RateLimitInfo::from_headers(response.headers());

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| ScanError::Network {
                message: format!("{operation} response decode failed: {error}"),
            })?;

        if !status.is_success() {
            return Err(map_http_error(&operation, status, rate_limit, &body));
        }

        debug!(%url, %status, remaining = rate_limit.map(|info| info.remaining()), "query succeeded");
        Ok(ApiResponse::new(body)
            .with_links(links)
            .with_rate_limit(rate_limit))
    }
}

fn relative_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{path}?{query}", path = url.path()),
        None => url.path().to_owned(),
    }
}

#[async_trait]
impl QueryGateway for OctocrabQueryGateway {
    async fn query(&self, url: &Url) -> Result<ApiResponse, ScanError> {
        tokio::time::timeout(self.timeout, self.fetch(url))
            .await
            .map_err(|_elapsed| ScanError::Timeout {
                message: format!(
                    "GET {url} did not complete within {timeout:?}",
                    timeout = self.timeout
                ),
            })?
    }
}
