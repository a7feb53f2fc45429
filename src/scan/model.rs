//! Derived repository records produced by enrichment.

use crate::github::RawRepository;

/// Outcome of the issue count step for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTally {
    /// Issues remaining after subtracting pull requests.
    Counted(u64),
    /// The pull request count exceeded the raw issue count; the tally is
    /// clamped to zero.
    Clamped {
        /// Raw issue estimate, pull requests included.
        raw_issues: u64,
        /// Pull request estimate that was subtracted.
        pulls: u64,
    },
    /// The issue tracker is disabled and an issue threshold is set, so the
    /// issues resource was never queried.
    IssuesDisabled,
}

impl IssueTally {
    /// Corrects a raw issue estimate by removing pull requests.
    ///
    /// # Example
    ///
    /// ```
    /// use stargazer::scan::IssueTally;
    ///
    /// assert_eq!(IssueTally::corrected(50, 8), IssueTally::Counted(42));
    /// assert_eq!(IssueTally::corrected(50, 50).count(), Some(0));
    /// assert_eq!(IssueTally::corrected(3, 5).count(), Some(0));
    /// ```
    #[must_use]
    pub const fn corrected(raw_issues: u64, pulls: u64) -> Self {
        match raw_issues.checked_sub(pulls) {
            Some(issues) => Self::Counted(issues),
            None => Self::Clamped { raw_issues, pulls },
        }
    }

    /// Issue count usable by threshold checks, or `None` when issues were
    /// skipped.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        match self {
            Self::Counted(issues) => Some(*issues),
            Self::Clamped { .. } => Some(0),
            Self::IssuesDisabled => None,
        }
    }

    /// Whether the count had to be clamped.
    #[must_use]
    pub const fn is_clamped(&self) -> bool {
        matches!(self, Self::Clamped { .. })
    }
}

/// A search result plus its derived language and counts.
///
/// Built once per repository and never mutated afterwards; the raw search
/// record is kept intact alongside the derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRepository {
    repository: RawRepository,
    language: String,
    pull_count: u64,
    issues: IssueTally,
}

impl EnrichedRepository {
    /// Assembles an enriched record.
    #[must_use]
    pub const fn new(
        repository: RawRepository,
        language: String,
        pull_count: u64,
        issues: IssueTally,
    ) -> Self {
        Self {
            repository,
            language,
            pull_count,
            issues,
        }
    }

    /// The raw search record.
    #[must_use]
    pub const fn repository(&self) -> &RawRepository {
        &self.repository
    }

    /// Dominant language, empty when none was detected.
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Pull requests in every state.
    #[must_use]
    pub const fn pull_count(&self) -> u64 {
        self.pull_count
    }

    /// Issue count outcome.
    #[must_use]
    pub const fn issues(&self) -> IssueTally {
        self.issues
    }
}
