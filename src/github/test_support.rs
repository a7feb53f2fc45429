//! Scripted in-memory gateway for exercising the scan without a network.
//!
//! Routes are matched on scheme, host, path and the *set* of query pairs, so
//! tests do not depend on the order in which parameters were appended.
//!
//! # Examples
//!
//! ```
//! use stargazer::github::ApiResponse;
//! use stargazer::github::test_support::RecordingGateway;
//!
//! let gateway = RecordingGateway::new();
//! gateway.respond("https://api.github.com/repos/o/r/languages", ApiResponse::new("{}"));
//! assert_eq!(gateway.call_count(), 0);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use url::Url;

use super::error::ScanError;
use super::gateway::{ApiResponse, QueryGateway};
use super::models::RawRepository;

/// Gateway that answers from a route table and records every request.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    routes: Mutex<HashMap<String, Result<ApiResponse, ScanError>>>,
    calls: Mutex<Vec<Url>>,
}

impl RecordingGateway {
    /// Creates a gateway with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests for `url` with `response`.
    ///
    /// # Panics
    ///
    /// Panics when `url` does not parse.
    pub fn respond(&self, url: &str, response: ApiResponse) {
        self.insert(url, Ok(response));
    }

    /// Fails requests for `url` with `error`.
    ///
    /// # Panics
    ///
    /// Panics when `url` does not parse.
    pub fn fail(&self, url: &str, error: ScanError) {
        self.insert(url, Err(error));
    }

    fn insert(&self, url: &str, outcome: Result<ApiResponse, ScanError>) {
        let parsed = Url::parse(url).unwrap_or_else(|error| panic!("invalid route {url}: {error}"));
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route_key(&parsed), outcome);
    }

    /// Every URL requested so far, in request order.
    #[must_use]
    pub fn calls(&self) -> Vec<Url> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests issued.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of requests whose path ends with `suffix`.
    #[must_use]
    pub fn calls_ending_with(&self, suffix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.path().ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl QueryGateway for RecordingGateway {
    async fn query(&self, url: &Url) -> Result<ApiResponse, ScanError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.clone());

        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&route_key(url))
            .cloned()
            .unwrap_or_else(|| {
                Err(ScanError::NotFound {
                    message: format!("no scripted response for {url}"),
                })
            })
    }
}

fn route_key(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.sort();
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{scheme}://{host}{port}{path}?{query}",
        scheme = url.scheme(),
        host = url.host_str().unwrap_or_default(),
        port = url.port().map(|port| format!(":{port}")).unwrap_or_default(),
        path = url.path(),
    )
}

/// Search result item for `owner/name` whose sub-resources live under
/// `api_base`, shaped the way GitHub serialises it.
#[must_use]
pub fn repository_json(
    api_base: &str,
    owner: &str,
    name: &str,
    stars: u64,
    has_issues: bool,
) -> serde_json::Value {
    let api_base = api_base.trim_end_matches('/');
    serde_json::json!({
        "owner": { "login": owner },
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "html_url": format!("https://github.com/{owner}/{name}"),
        "stargazers_count": stars,
        "has_issues": has_issues,
        "languages_url": format!("{api_base}/repos/{owner}/{name}/languages"),
        "issues_url": format!("{api_base}/repos/{owner}/{name}/issues{{/number}}"),
        "pulls_url": format!("{api_base}/repos/{owner}/{name}/pulls{{/number}}"),
    })
}

/// Typed counterpart of [`repository_json`].
///
/// # Panics
///
/// Panics if the generated JSON no longer matches [`RawRepository`].
#[must_use]
pub fn raw_repository(
    api_base: &str,
    owner: &str,
    name: &str,
    stars: u64,
    has_issues: bool,
) -> RawRepository {
    serde_json::from_value(repository_json(api_base, owner, name, stars, has_issues))
        .unwrap_or_else(|error| panic!("fixture repository should deserialise: {error}"))
}

/// A JSON array of `count` placeholder issue or pull request objects.
#[must_use]
pub fn items_json(count: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=count)
        .map(|number| serde_json::json!({ "number": number }))
        .collect();
    serde_json::Value::Array(items).to_string()
}
