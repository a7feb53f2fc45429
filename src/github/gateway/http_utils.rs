//! Shared HTTP utilities for gateway implementations.

use serde::Deserialize;

/// The error document GitHub returns alongside non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(super) struct GitHubErrorBody {
    pub(super) message: Option<String>,
    pub(super) documentation_url: Option<String>,
}

pub(super) fn parse_github_error(body: &str) -> GitHubErrorBody {
    serde_json::from_str(body).unwrap_or_default()
}

/// Falls back to a shortened raw body when GitHub sent no JSON message.
pub(super) fn summarise_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_owned();
    }
    trimmed.chars().take(MAX_CHARS).collect()
}
