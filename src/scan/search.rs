//! Repository search query construction and page traversal.

use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, warn};
use url::Url;

use super::criteria::SearchCriteria;
use crate::github::{QueryGateway, RawRepository, ScanError, SearchPage};

/// Fixed predicate every search starts from.
pub const BASE_PREDICATE: &str = "stars:100 pushed:>2017-01-01";

/// Page size for the search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// The repository search request: a fixed predicate, optionally narrowed to
/// one language, sorted by stars descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    language: Option<String>,
}

impl SearchQuery {
    /// Creates a query, narrowed to `language` when given.
    #[must_use]
    pub fn new(language: Option<&str>) -> Self {
        Self {
            language: language.map(str::to_owned),
        }
    }

    /// The `q` parameter.
    ///
    /// # Example
    ///
    /// ```
    /// use stargazer::scan::SearchQuery;
    ///
    /// assert_eq!(
    ///     SearchQuery::new(Some("Rust")).terms(),
    ///     "stars:100 pushed:>2017-01-01 language:Rust"
    /// );
    /// ```
    #[must_use]
    pub fn terms(&self) -> String {
        match &self.language {
            Some(language) => format!("{BASE_PREDICATE} language:{language}"),
            None => BASE_PREDICATE.to_owned(),
        }
    }

    /// First page URL under `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidUrl`] when `api_base` cannot carry a
    /// path.
    pub fn first_page(&self, api_base: &Url) -> Result<Url, ScanError> {
        let mut url = api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ScanError::InvalidUrl(format!("{api_base}: not a base URL")))?
            .pop_if_empty()
            .extend(["search", "repositories"]);

        let page_size = SEARCH_PAGE_SIZE.to_string();
        url.query_pairs_mut()
            .clear()
            .append_pair("q", &self.terms())
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("per_page", &page_size);
        Ok(url)
    }
}

impl From<&SearchCriteria> for SearchQuery {
    fn from(criteria: &SearchCriteria) -> Self {
        Self::new(criteria.language())
    }
}

/// Walks the search result pages by following `next` links.
pub struct SearchPager<'client, Gateway>
where
    Gateway: QueryGateway,
{
    client: &'client Gateway,
    first_page: Url,
}

impl<'client, Gateway> SearchPager<'client, Gateway>
where
    Gateway: QueryGateway,
{
    /// Create a pager starting at `first_page`.
    #[must_use]
    pub const fn new(client: &'client Gateway, first_page: Url) -> Self {
        Self { client, first_page }
    }

    /// Lazily fetches one page per poll until no `next` link remains.
    ///
    /// The stream ends after the first error.
    pub fn pages(&self) -> impl Stream<Item = Result<SearchPage, ScanError>> + '_ {
        stream::try_unfold(Some(self.first_page.clone()), move |next| async move {
            let Some(url) = next else {
                return Ok::<_, ScanError>(None);
            };

            let response = self.client.query(&url).await?;
            let page: SearchPage = response.json("repository search")?;
            if page.incomplete_results {
                warn!(%url, "search results are incomplete");
            }
            debug!(
                %url,
                items = page.items.len(),
                total = ?page.total_count,
                "fetched search page"
            );

            Ok(Some((page, response.links().next().cloned())))
        })
    }

    /// Repositories across every page, in search order.
    ///
    /// Only one page is held in memory at a time.
    pub fn repositories(&self) -> impl Stream<Item = Result<RawRepository, ScanError>> + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<_, ScanError>)))
            .try_flatten()
    }
}
