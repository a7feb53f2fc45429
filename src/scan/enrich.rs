//! Attaches language, pull request and issue counts to a search result.

use tracing::{debug, warn};

use crate::github::{QueryGateway, RawRepository, ScanError};

use super::count::CountEstimator;
use super::criteria::SearchCriteria;
use super::language::LanguageResolver;
use super::model::{EnrichedRepository, IssueTally};

const ALL_STATES: &[(&str, &str)] = &[("state", "all")];

/// Combines the language resolver and count estimator for one repository.
pub struct RepositoryEnricher<'client, Gateway>
where
    Gateway: QueryGateway,
{
    languages: LanguageResolver<'client, Gateway>,
    counts: CountEstimator<'client, Gateway>,
}

impl<'client, Gateway> RepositoryEnricher<'client, Gateway>
where
    Gateway: QueryGateway,
{
    /// Create an enricher issuing requests through `client`.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self {
            languages: LanguageResolver::new(client),
            counts: CountEstimator::new(client),
        }
    }

    /// Builds the derived record for `repository`.
    ///
    /// Requests run in order: languages, pull requests, then issues. The
    /// issues resource is skipped when `criteria` sets an issue threshold and
    /// the repository's tracker is disabled. Pull requests are subtracted
    /// from the issue estimate because GitHub lists them as issues; a
    /// negative result is clamped to zero and logged.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the language or count lookups.
    pub async fn enrich(
        &self,
        repository: &RawRepository,
        criteria: &SearchCriteria,
    ) -> Result<EnrichedRepository, ScanError> {
        let name = repository.full_name();
        let language = self.languages.resolve(&repository.languages_url).await?;
        let pulls = self
            .counts
            .estimate(&repository.pulls_url, ALL_STATES)
            .await?;

        let issues = if criteria.requires_issues() && !repository.has_issues {
            debug!(repository = %name, "issue tracker disabled; skipping issue count");
            IssueTally::IssuesDisabled
        } else {
            let raw_issues = self
                .counts
                .estimate(&repository.issues_url, ALL_STATES)
                .await?;
            let tally = IssueTally::corrected(raw_issues, pulls);
            if tally.is_clamped() {
                warn!(
                    repository = %name,
                    raw_issues,
                    pulls,
                    "pull requests exceed issues; clamping issue count to zero"
                );
            }
            tally
        };

        debug!(repository = %name, %language, pulls, issues = ?issues.count(), "enriched");
        Ok(EnrichedRepository::new(
            repository.clone(),
            language,
            pulls,
            issues,
        ))
    }
}
