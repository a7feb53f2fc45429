//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::credentials::Credentials;
use crate::github::error::ScanError;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client using basic authentication against the given
/// API base URL.
///
/// # Errors
///
/// Returns `ScanError::InvalidUrl` when the base URI cannot be parsed or
/// `ScanError::Configuration` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    credentials: &Credentials,
    api_base: &Url,
) -> Result<Octocrab, ScanError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| ScanError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .basic_auth(
            credentials.user().as_str().to_owned(),
            credentials.token().value().to_owned(),
        )
        .base_uri(base_uri)
        .map_err(|error| ScanError::Configuration {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
