//! Data models for the parts of GitHub's repository search payload the scan
//! reads.

use serde::Deserialize;

/// Repository owner as embedded in a search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryOwner {
    /// Owner login.
    pub login: String,
}

/// A repository record returned by the search endpoint.
///
/// This is a read-only snapshot; derived data lives in
/// [`crate::scan::EnrichedRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRepository {
    /// Owning account.
    pub owner: RepositoryOwner,
    /// Repository name.
    pub name: String,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Star count at search time.
    pub stargazers_count: u64,
    /// Whether the issue tracker is enabled.
    #[serde(default = "issues_enabled_by_default")]
    pub has_issues: bool,
    /// Language breakdown resource (`{language: bytes}`).
    pub languages_url: String,
    /// Issues collection, usually carrying a `{/number}` URL template suffix.
    pub issues_url: String,
    /// Pull request collection, usually carrying a `{/number}` URL template
    /// suffix.
    pub pulls_url: String,
}

const fn issues_enabled_by_default() -> bool {
    true
}

impl RawRepository {
    /// `owner/name` identifier used in log output.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

/// One page of `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Total number of matches reported by GitHub.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Whether GitHub gave up before finding every match.
    #[serde(default)]
    pub incomplete_results: bool,
    /// Repositories on this page.
    pub items: Vec<RawRepository>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{RawRepository, SearchPage};

    #[rstest]
    fn deserialises_search_page_fields() {
        let page: SearchPage = serde_json::from_value(json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [{
                "owner": { "login": "octo", "id": 1 },
                "name": "repo",
                "full_name": "octo/repo",
                "html_url": "https://github.com/octo/repo",
                "stargazers_count": 1500,
                "has_issues": false,
                "languages_url": "https://api.github.com/repos/octo/repo/languages",
                "issues_url": "https://api.github.com/repos/octo/repo/issues{/number}",
                "pulls_url": "https://api.github.com/repos/octo/repo/pulls{/number}"
            }]
        }))
        .expect("search page should deserialise");

        assert_eq!(page.total_count, Some(2));
        let repository = page.items.first().expect("one item expected");
        assert_eq!(repository.full_name(), "octo/repo");
        assert_eq!(repository.stargazers_count, 1500);
        assert!(!repository.has_issues, "has_issues should be false");
    }

    #[rstest]
    fn has_issues_defaults_to_enabled() {
        let repository: RawRepository = serde_json::from_value(json!({
            "owner": { "login": "octo" },
            "name": "repo",
            "html_url": "https://github.com/octo/repo",
            "stargazers_count": 1,
            "languages_url": "https://api.github.com/repos/octo/repo/languages",
            "issues_url": "https://api.github.com/repos/octo/repo/issues{/number}",
            "pulls_url": "https://api.github.com/repos/octo/repo/pulls{/number}"
        }))
        .expect("repository should deserialise");

        assert!(repository.has_issues, "has_issues should default to true");
    }

    #[rstest]
    fn search_page_without_items_is_rejected() {
        let result = serde_json::from_value::<SearchPage>(json!({ "total_count": 0 }));

        assert!(result.is_err(), "missing items must not deserialise");
    }
}
