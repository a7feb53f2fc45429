//! Admission thresholds for enriched repositories.

use super::model::EnrichedRepository;

/// Thresholds supplied by the caller for one run.
///
/// The language filter narrows the search query itself; it is not
/// re-checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    min_issues: u64,
    min_pulls: u64,
    language: Option<String>,
}

impl SearchCriteria {
    /// Creates criteria with the given thresholds and no language filter.
    #[must_use]
    pub const fn new(min_issues: u64, min_pulls: u64) -> Self {
        Self {
            min_issues,
            min_pulls,
            language: None,
        }
    }

    /// Restricts the search to one language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Minimum number of genuine issues.
    #[must_use]
    pub const fn min_issues(&self) -> u64 {
        self.min_issues
    }

    /// Minimum number of pull requests.
    #[must_use]
    pub const fn min_pulls(&self) -> u64 {
        self.min_pulls
    }

    /// Language filter, when configured.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Whether an issue threshold is set. Repositories with a disabled
    /// tracker cannot meet one.
    #[must_use]
    pub const fn requires_issues(&self) -> bool {
        self.min_issues > 0
    }

    /// Admits a repository that meets both thresholds and has a language.
    ///
    /// Repositories whose issues were skipped never pass.
    #[must_use]
    pub fn admits(&self, repository: &EnrichedRepository) -> bool {
        let enough_issues = repository
            .issues()
            .count()
            .is_some_and(|issues| issues >= self.min_issues);

        enough_issues
            && repository.pull_count() >= self.min_pulls
            && !repository.language().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::SearchCriteria;
    use crate::github::RawRepository;
    use crate::github::test_support::raw_repository;
    use crate::scan::model::{EnrichedRepository, IssueTally};

    #[fixture]
    fn repository() -> RawRepository {
        raw_repository("https://api.github.com", "octo", "repo", 900, true)
    }

    fn enriched(
        repository: &RawRepository,
        language: &str,
        pulls: u64,
        issues: IssueTally,
    ) -> EnrichedRepository {
        EnrichedRepository::new(repository.clone(), language.to_owned(), pulls, issues)
    }

    #[rstest]
    #[case::meets_both(5, 1, "Rust", 2, IssueTally::Counted(5), true)]
    #[case::too_few_issues(5, 1, "Rust", 2, IssueTally::Counted(4), false)]
    #[case::too_few_pulls(5, 3, "Rust", 2, IssueTally::Counted(9), false)]
    #[case::no_language(0, 0, "", 2, IssueTally::Counted(9), false)]
    #[case::issues_skipped(1, 0, "Rust", 2, IssueTally::IssuesDisabled, false)]
    #[case::clamped_meets_zero(0, 0, "Go", 9, IssueTally::Clamped { raw_issues: 1, pulls: 9 }, true)]
    fn admission_follows_thresholds(
        repository: RawRepository,
        #[case] min_issues: u64,
        #[case] min_pulls: u64,
        #[case] language: &str,
        #[case] pulls: u64,
        #[case] issues: IssueTally,
        #[case] admitted: bool,
    ) {
        let criteria = SearchCriteria::new(min_issues, min_pulls);

        assert_eq!(
            criteria.admits(&enriched(&repository, language, pulls, issues)),
            admitted
        );
    }

    #[rstest]
    fn raising_thresholds_never_admits_more(repository: RawRepository) {
        let candidates: Vec<EnrichedRepository> = (0..6_u64)
            .flat_map(|pulls| {
                (0..6_u64).map(move |issues| (pulls, IssueTally::Counted(issues)))
            })
            .map(|(pulls, issues)| enriched(&repository, "Rust", pulls, issues))
            .collect();

        let admitted = |criteria: &SearchCriteria| -> Vec<&EnrichedRepository> {
            candidates
                .iter()
                .filter(|candidate| criteria.admits(candidate))
                .collect()
        };

        for min_issues in 0..6_u64 {
            for min_pulls in 0..6_u64 {
                let base = admitted(&SearchCriteria::new(min_issues, min_pulls));
                let stricter_issues = admitted(&SearchCriteria::new(min_issues + 1, min_pulls));
                let stricter_pulls = admitted(&SearchCriteria::new(min_issues, min_pulls + 1));

                assert!(
                    stricter_issues.iter().all(|candidate| base.contains(candidate)),
                    "raising min_issues admitted a new repository"
                );
                assert!(
                    stricter_pulls.iter().all(|candidate| base.contains(candidate)),
                    "raising min_pulls admitted a new repository"
                );
            }
        }
    }

    #[rstest]
    fn language_filter_is_kept_for_query_construction() {
        let criteria = SearchCriteria::new(0, 0).with_language("Rust");

        assert_eq!(criteria.language(), Some("Rust"));
        assert!(!criteria.requires_issues(), "no issue threshold configured");
    }
}
