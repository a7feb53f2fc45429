//! Stargazer library crate for discovering popular GitHub repositories.
//!
//! The library searches GitHub for well-starred, recently pushed
//! repositories, derives each result's dominant language and its issue and
//! pull request counts with a handful of requests, and streams the
//! repositories that meet the configured thresholds as a `;`-delimited
//! report. All network access goes through one retrying, rate-limit aware
//! gateway built on Octocrab.

pub mod config;
pub mod github;
pub mod output;
pub mod scan;
pub mod telemetry;

pub use config::StargazerConfig;
pub use github::{
    Credentials, OctocrabQueryGateway, QueryGateway, RetryPolicy, RetryingGateway, ScanError,
};
pub use output::ReportSink;
pub use scan::{RunSummary, ScanPipeline, SearchCriteria, SearchQuery};
