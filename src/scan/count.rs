//! Exact item counts for paginated sub-resources in at most two requests.
//!
//! The first page is fetched with a fixed page size. When GitHub reports a
//! `last` relation with page `L`, only that final page is fetched as well and
//! the total is `page_size * (L - 1) + items_on_last_page`. Items added or
//! removed between the two requests can skew the result slightly; that
//! window is accepted rather than walking every page.

use serde::de::IgnoredAny;
use tracing::debug;
use url::Url;

use crate::github::{ApiResponse, QueryGateway, ScanError, page_number};

/// Page size for issue and pull request collections (GitHub's default).
pub const SUB_RESOURCE_PAGE_SIZE: u32 = 30;

/// Counts the items of issue and pull request collections.
pub struct CountEstimator<'client, Gateway>
where
    Gateway: QueryGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> CountEstimator<'client, Gateway>
where
    Gateway: QueryGateway,
{
    /// Create an estimator issuing requests through `client`.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Counts the items of `collection_url`, narrowed by `filters`.
    ///
    /// A `{/number}` style URL template suffix is stripped first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidUrl`] for an unusable collection URL,
    /// [`ScanError::PaginationParse`] when the `last` link carries no page
    /// number, [`ScanError::MalformedResponse`] when a page is not a JSON
    /// array, and propagates gateway failures.
    pub async fn estimate(
        &self,
        collection_url: &str,
        filters: &[(&str, &str)],
    ) -> Result<u64, ScanError> {
        let first_page = first_page_url(collection_url, filters)?;
        let response = self.client.query(&first_page).await?;
        let first_count = count_items(&response, collection_url)?;

        let Some(last) = response.links().last() else {
            debug!(url = %first_page, count = first_count, "collection fits on one page");
            return Ok(first_count);
        };

        let last_page = page_number(last)?;
        if last_page <= 1 {
            return Ok(first_count);
        }

        let last_response = self.client.query(last).await?;
        let last_count = count_items(&last_response, collection_url)?;
        let count = u64::from(SUB_RESOURCE_PAGE_SIZE)
            .saturating_mul(u64::from(last_page - 1))
            .saturating_add(last_count);

        debug!(url = %first_page, last_page, last_count, count, "estimated collection size");
        Ok(count)
    }
}

/// Removes a URI template suffix such as `{/number}` from a GitHub URL.
///
/// # Example
///
/// ```
/// use stargazer::scan::strip_url_template;
///
/// assert_eq!(
///     strip_url_template("https://api.github.com/repos/o/r/issues{/number}"),
///     "https://api.github.com/repos/o/r/issues"
/// );
/// ```
#[must_use]
pub fn strip_url_template(url: &str) -> &str {
    url.split_once('{').map_or(url, |(base, _template)| base)
}

fn first_page_url(collection_url: &str, filters: &[(&str, &str)]) -> Result<Url, ScanError> {
    let base = strip_url_template(collection_url);
    let mut url = Url::parse(base)
        .map_err(|error| ScanError::InvalidUrl(format!("{base}: {error}")))?;

    let page_size = SUB_RESOURCE_PAGE_SIZE.to_string();
    url.query_pairs_mut()
        .extend_pairs(filters.iter().copied())
        .append_pair("page", "1")
        .append_pair("per_page", &page_size);
    Ok(url)
}

fn count_items(response: &ApiResponse, collection_url: &str) -> Result<u64, ScanError> {
    let items: Vec<IgnoredAny> = response.json(strip_url_template(collection_url))?;
    Ok(u64::try_from(items.len()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use url::Url;

    use super::{CountEstimator, strip_url_template};
    use crate::github::test_support::{RecordingGateway, items_json};
    use crate::github::{ApiResponse, MockQueryGateway, PageLinks, ScanError};

    const ISSUES: &str = "https://api.github.com/repos/octo/repo/issues";
    const STATE_ALL: &[(&str, &str)] = &[("state", "all")];

    fn page_url(page: u32) -> String {
        format!("{ISSUES}?state=all&page={page}&per_page=30")
    }

    fn last_link(page: u32) -> PageLinks {
        PageLinks::parse(&format!(
            "<{next}>; rel=\"next\", <{last}>; rel=\"last\"",
            next = page_url(2),
            last = page_url(page)
        ))
    }

    #[fixture]
    fn gateway() -> RecordingGateway {
        RecordingGateway::new()
    }

    #[rstest]
    #[tokio::test]
    async fn single_page_counts_returned_items(gateway: RecordingGateway) {
        gateway.respond(&page_url(1), ApiResponse::new(items_json(7)));

        let count = CountEstimator::new(&gateway)
            .estimate(&format!("{ISSUES}{{/number}}"), STATE_ALL)
            .await
            .expect("estimate should succeed");

        assert_eq!(count, 7);
        assert_eq!(gateway.call_count(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn last_link_adds_full_pages_and_final_page(gateway: RecordingGateway) {
        gateway.respond(
            &page_url(1),
            ApiResponse::new(items_json(30)).with_links(last_link(4)),
        );
        gateway.respond(&page_url(4), ApiResponse::new(items_json(12)));

        let count = CountEstimator::new(&gateway)
            .estimate(ISSUES, STATE_ALL)
            .await
            .expect("estimate should succeed");

        assert_eq!(count, 30 * 3 + 12);
        assert_eq!(gateway.call_count(), 2, "only the first and last pages are fetched");
    }

    #[rstest]
    #[tokio::test]
    async fn empty_collections_count_zero(gateway: RecordingGateway) {
        gateway.respond(&page_url(1), ApiResponse::new("[]"));

        let count = CountEstimator::new(&gateway)
            .estimate(ISSUES, STATE_ALL)
            .await
            .expect("estimate should succeed");

        assert_eq!(count, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn last_link_without_page_number_is_a_pagination_error(gateway: RecordingGateway) {
        let links = PageLinks::parse(&format!("<{ISSUES}?state=all>; rel=\"last\""));
        gateway.respond(&page_url(1), ApiResponse::new(items_json(30)).with_links(links));

        let result = CountEstimator::new(&gateway).estimate(ISSUES, STATE_ALL).await;

        assert!(
            matches!(result, Err(ScanError::PaginationParse { .. })),
            "expected PaginationParse, got {result:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn non_array_pages_are_malformed() {
        let mut gateway = MockQueryGateway::new();
        gateway
            .expect_query()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(r#"{"message":"oops"}"#)));

        let result = CountEstimator::new(&gateway).estimate(ISSUES, &[]).await;

        assert!(
            matches!(result, Err(ScanError::MalformedResponse { .. })),
            "expected MalformedResponse, got {result:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn first_request_carries_filters_and_page_size() {
        let mut gateway = MockQueryGateway::new();
        gateway
            .expect_query()
            .withf(|url: &Url| {
                let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
                url.path() == "/repos/octo/repo/pulls"
                    && pairs
                        == [
                            ("state".to_owned(), "all".to_owned()),
                            ("page".to_owned(), "1".to_owned()),
                            ("per_page".to_owned(), "30".to_owned()),
                        ]
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new("[]")));

        let count = CountEstimator::new(&gateway)
            .estimate("https://api.github.com/repos/octo/repo/pulls{/number}", STATE_ALL)
            .await
            .expect("estimate should succeed");

        assert_eq!(count, 0);
    }

    #[rstest]
    #[case::template(
        "https://api.github.com/repos/o/r/pulls{/number}",
        "https://api.github.com/repos/o/r/pulls"
    )]
    #[case::plain("https://api.github.com/repos/o/r/pulls", "https://api.github.com/repos/o/r/pulls")]
    fn strips_uri_templates(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_url_template(input), expected);
    }
}
