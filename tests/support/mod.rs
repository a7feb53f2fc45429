//! Shared helpers for scan integration tests: a Wiremock server scripted
//! with GitHub's search, languages, issues and pulls endpoints.

use std::time::Duration;

use stargazer::github::test_support::{items_json, repository_json};
use stargazer::{Credentials, OctocrabQueryGateway, RetryPolicy, RetryingGateway};
use url::Url;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `Authorization` value for `octocat:ghp_example`.
pub const BASIC_AUTH: &str = "Basic b2N0b2NhdDpnaHBfZXhhbXBsZQ==";

/// Login owning every scripted repository.
pub const OWNER: &str = "octo";

/// A scripted repository: language bytes plus issue and pull totals.
pub struct ScriptedRepository<'a> {
    pub name: &'a str,
    pub language: &'a str,
    pub has_issues: bool,
    pub issues: usize,
    pub pulls: usize,
}

/// Mock GitHub API.
pub struct GitHubFixture {
    pub server: MockServer,
}

impl GitHubFixture {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api_base(&self) -> Url {
        Url::parse(&self.server.uri())
            .unwrap_or_else(|error| panic!("mock server URL should parse: {error}"))
    }

    /// Octocrab gateway with a fast retry policy.
    pub fn gateway(&self, max_retries: usize) -> RetryingGateway<OctocrabQueryGateway> {
        let credentials = Credentials::parse("octocat", "ghp_example")
            .unwrap_or_else(|error| panic!("credentials should be valid: {error}"));
        let inner =
            OctocrabQueryGateway::for_credentials(&credentials, &self.api_base(), Duration::from_secs(5))
                .unwrap_or_else(|error| panic!("gateway should build: {error}"));
        RetryingGateway::new(
            inner,
            RetryPolicy {
                max_retries,
                min_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(10),
                max_rate_limit_wait: Duration::from_secs(1),
            },
        )
    }

    /// Serves one search page. `page` 1 answers the initial request; later
    /// pages are reached through `next` links.
    pub async fn mount_search_page(&self, page: u32, repositories: &[ScriptedRepository<'_>], has_next: bool) {
        let items: Vec<serde_json::Value> = repositories
            .iter()
            .map(|repository| repository_json(&self.server.uri(), OWNER, repository.name, 1000, repository.has_issues))
            .collect();
        let mut response = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": items.len(),
            "incomplete_results": false,
            "items": items
        }));
        if has_next {
            let next = format!(
                "{}/search/repositories?q=stars%3A100&page={}",
                self.server.uri(),
                page + 1
            );
            response = response.insert_header("Link", format!("<{next}>; rel=\"next\""));
        }

        let mock = Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(header("authorization", BASIC_AUTH));
        let mock = if page == 1 {
            mock.and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", page.to_string()))
        };
        mock.respond_with(response).mount(&self.server).await;
    }

    /// Serves a repository's languages, pulls and issues.
    pub async fn mount_repository(&self, repository: &ScriptedRepository<'_>) {
        let base = format!("/repos/{OWNER}/{name}", name = repository.name);
        Mock::given(method("GET"))
            .and(path(format!("{base}/languages")))
            .and(header("authorization", BASIC_AUTH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ repository.language: 4096, "Shell": 12 })),
            )
            .mount(&self.server)
            .await;
        self.mount_collection(&format!("{base}/pulls"), repository.pulls).await;
        self.mount_collection(&format!("{base}/issues"), repository.issues).await;
    }

    /// Serves `total` items at 30 per page, answering only the first and
    /// last pages the way GitHub paginates them.
    pub async fn mount_collection(&self, collection: &str, total: usize) {
        let last_page = total.div_ceil(30).max(1);
        let on_last_page = total - 30 * (last_page - 1);

        let mut first = ResponseTemplate::new(200)
            .set_body_raw(items_json(total.min(30)), "application/json");
        if last_page > 1 {
            let uri = self.server.uri();
            first = first.insert_header(
                "Link",
                format!(
                    "<{uri}{collection}?state=all&page=2&per_page=30>; rel=\"next\", \
                     <{uri}{collection}?state=all&page={last_page}&per_page=30>; rel=\"last\""
                ),
            );
            Mock::given(method("GET"))
                .and(path(collection))
                .and(query_param("page", last_page.to_string()))
                .and(header("authorization", BASIC_AUTH))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_raw(items_json(on_last_page), "application/json"),
                )
                .mount(&self.server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path(collection))
            .and(query_param("state", "all"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "30"))
            .and(header("authorization", BASIC_AUTH))
            .respond_with(first)
            .mount(&self.server)
            .await;
    }
}
