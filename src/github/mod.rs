//! GitHub REST access for the repository scan.
//!
//! This module wraps Octocrab behind a narrow [`QueryGateway`] so that the
//! scan engine only ever sees absolute URLs, raw bodies and pagination
//! links. Failures are mapped into [`ScanError`] variants so callers can
//! report precise causes without exposing Octocrab internals.

pub mod credentials;
pub mod error;
pub mod gateway;
pub mod links;
pub mod models;
pub mod rate_limit;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use credentials::{AccountName, Credentials, PersonalAccessToken};
pub use error::ScanError;
pub use gateway::{
    ApiResponse, OctocrabQueryGateway, QueryGateway, RetryPolicy, RetryingGateway,
};
pub use links::{PageLinks, page_number};
pub use models::{RawRepository, RepositoryOwner, SearchPage};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockQueryGateway;
