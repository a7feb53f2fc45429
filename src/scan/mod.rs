//! The paginated query and enrichment engine.
//!
//! A [`SearchPager`] walks the repository search, a [`RepositoryEnricher`]
//! derives each result's language and counts through the
//! [`LanguageResolver`] and [`CountEstimator`], and the [`ScanPipeline`]
//! filters the enriched records against [`SearchCriteria`] before streaming
//! them out through a [`ReportWriter`].

mod count;
mod criteria;
mod enrich;
mod language;
mod model;
mod pipeline;
mod report;
mod search;

pub use count::{CountEstimator, SUB_RESOURCE_PAGE_SIZE, strip_url_template};
pub use criteria::SearchCriteria;
pub use enrich::RepositoryEnricher;
pub use language::{LanguageResolver, dominant_language};
pub use model::{EnrichedRepository, IssueTally};
pub use pipeline::{DEFAULT_CONCURRENCY, RunSummary, ScanPipeline};
pub use report::{DELIMITER, HEADER, ReportRow, ReportWriter};
pub use search::{BASE_PREDICATE, SEARCH_PAGE_SIZE, SearchPager, SearchQuery};
