//! Repository scan operation.

use std::time::Duration;

use camino::Utf8Path;
use stargazer::{
    Credentials, OctocrabQueryGateway, QueryGateway, ReportSink, RetryingGateway, RunSummary,
    ScanError, ScanPipeline, SearchQuery, StargazerConfig,
};
use tracing::info;
use url::Url;

/// Scans GitHub with the Octocrab gateway.
///
/// # Errors
///
/// Returns [`ScanError::Configuration`], [`ScanError::MissingUser`] or
/// [`ScanError::MissingToken`] for unusable configuration, and the first
/// unrecoverable upstream or output failure otherwise.
pub async fn run(config: &StargazerConfig) -> Result<RunSummary, ScanError> {
    run_with_gateway_builder(config, OctocrabQueryGateway::for_credentials).await
}

/// Scans GitHub using a custom gateway builder.
///
/// The built gateway is wrapped with the configured retry policy. This
/// function is exposed for testing with scripted gateways.
pub async fn run_with_gateway_builder<G, F>(
    config: &StargazerConfig,
    build_gateway: F,
) -> Result<RunSummary, ScanError>
where
    G: QueryGateway,
    F: FnOnce(&Credentials, &Url, Duration) -> Result<G, ScanError>,
{
    config.validate()?;
    let credentials = config.credentials()?;
    let api_base = config.api_base_url()?;
    let criteria = config.criteria();
    let search_url = SearchQuery::from(&criteria).first_page(&api_base)?;

    let gateway = RetryingGateway::new(
        build_gateway(&credentials, &api_base, config.request_timeout())?,
        config.retry_policy(),
    );

    let sink = ReportSink::open(config.output_file.as_deref().map(Utf8Path::new))?;
    if let Some(path) = sink.path() {
        info!(%path, "writing report to file");
    }

    ScanPipeline::new(&gateway)
        .with_concurrency(config.concurrency)
        .run(search_url, &criteria, sink)
        .await
}
