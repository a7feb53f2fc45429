//! Dominant language resolution from a repository's language breakdown.

use serde_json::{Map, Value};
use url::Url;

use crate::github::{QueryGateway, ScanError};

/// Resolves the language with the most bytes.
pub struct LanguageResolver<'client, Gateway>
where
    Gateway: QueryGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> LanguageResolver<'client, Gateway>
where
    Gateway: QueryGateway,
{
    /// Create a resolver issuing requests through `client`.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Fetches `languages_url` and returns its dominant language, or an
    /// empty string when no language was detected.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidUrl`] for an unusable URL,
    /// [`ScanError::MalformedResponse`] when the body is not a
    /// `{language: bytes}` object, and propagates gateway failures.
    pub async fn resolve(&self, languages_url: &str) -> Result<String, ScanError> {
        let url = Url::parse(languages_url)
            .map_err(|error| ScanError::InvalidUrl(format!("{languages_url}: {error}")))?;
        let response = self.client.query(&url).await?;
        let breakdown: Map<String, Value> = response.json("languages")?;
        dominant_language(&breakdown)
    }
}

/// Picks the language with the strictly greatest byte count.
///
/// Keys are visited in the order they appear in the response body, so a
/// tie keeps the language listed first. Languages with zero bytes are never
/// chosen.
///
/// # Errors
///
/// Returns [`ScanError::MalformedResponse`] when a byte count is not a
/// non-negative integer.
///
/// # Example
///
/// ```
/// use stargazer::scan::dominant_language;
///
/// let breakdown = serde_json::json!({ "Go": 500, "Python": 1200, "C": 1199 });
/// let languages = breakdown.as_object().cloned().unwrap_or_default();
/// assert_eq!(dominant_language(&languages).ok().as_deref(), Some("Python"));
/// ```
pub fn dominant_language(breakdown: &Map<String, Value>) -> Result<String, ScanError> {
    let mut dominant: Option<&str> = None;
    let mut most_bytes = 0_u64;

    for (language, bytes) in breakdown {
        let size = bytes.as_u64().ok_or_else(|| ScanError::MalformedResponse {
            message: format!("languages: byte count for {language} is not an integer: {bytes}"),
        })?;
        if size > most_bytes {
            most_bytes = size;
            dominant = Some(language.as_str());
        }
    }

    Ok(dominant.unwrap_or_default().to_owned())
}
