//! Search, enrich, filter and emit in one streaming pass.

use std::io::Write;
use std::pin::pin;

use futures::TryStreamExt;
use tracing::{debug, info};
use url::Url;

use crate::github::{QueryGateway, ScanError};

use super::criteria::SearchCriteria;
use super::enrich::RepositoryEnricher;
use super::report::{ReportRow, ReportWriter};
use super::search::SearchPager;

/// Repositories enriched at once when no other bound is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Totals for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories enriched.
    pub scanned: usize,
    /// Repositories written to the report.
    pub admitted: usize,
    /// Repositories whose issue count was clamped to zero.
    pub clamped: usize,
}

/// Drives the search through enrichment into a report.
pub struct ScanPipeline<'client, Gateway>
where
    Gateway: QueryGateway,
{
    client: &'client Gateway,
    concurrency: usize,
}

impl<'client, Gateway> ScanPipeline<'client, Gateway>
where
    Gateway: QueryGateway,
{
    /// Create a pipeline with the default concurrency.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bounds how many repositories are enriched at the same time.
    ///
    /// Zero is treated as one, which enriches strictly one repository after
    /// another.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Scans from `search_url`, writing every admitted repository to `sink`.
    ///
    /// The header is written before the first page is requested. Rows are
    /// emitted in search order and flushed one by one.
    ///
    /// # Errors
    ///
    /// Stops at the first search, enrichment or write failure.
    pub async fn run<W: Write>(
        &self,
        search_url: Url,
        criteria: &SearchCriteria,
        sink: W,
    ) -> Result<RunSummary, ScanError> {
        let mut report = ReportWriter::new(sink);
        report.write_header()?;

        let pager = SearchPager::new(self.client, search_url);
        let enricher = &RepositoryEnricher::new(self.client);
        let mut enriched = pin!(
            pager
                .repositories()
                .map_ok(move |repository| async move { enricher.enrich(&repository, criteria).await })
                .try_buffered(self.concurrency)
        );

        let mut summary = RunSummary::default();
        while let Some(repository) = enriched.try_next().await? {
            summary.scanned += 1;
            if repository.issues().is_clamped() {
                summary.clamped += 1;
            }

            let name = repository.repository().full_name();
            if !criteria.admits(&repository) {
                debug!(repository = %name, "below thresholds; skipped");
                continue;
            }

            report.write_row(&ReportRow::from(&repository))?;
            summary.admitted += 1;
            info!(
                repository = %name,
                language = repository.language(),
                pulls = repository.pull_count(),
                issues = ?repository.issues().count(),
                "admitted"
            );
        }

        info!(
            scanned = summary.scanned,
            admitted = summary.admitted,
            clamped = summary.clamped,
            "scan complete"
        );
        Ok(summary)
    }
}
