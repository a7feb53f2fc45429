//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.stargazer.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `STARGAZER_TOKEN`, `STARGAZER_USER`, and
//!    so on, plus the legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--user`/`-u`, and so on
//!
//! # Configuration File
//!
//! Place `.stargazer.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! user = "octocat"
//! token = "ghp_example"
//! min_issues = 10
//! min_pulls = 5
//! language = "Rust"
//! output_file = "reports/popular.csv"
//! concurrency = 4
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::{AccountName, Credentials, PersonalAccessToken, RetryPolicy, ScanError};
use crate::scan::{DEFAULT_CONCURRENCY, SearchCriteria, SearchQuery};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_MIN_DELAY_MS: u64 = 1_000;
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 60_000;
const DEFAULT_MAX_RATE_LIMIT_WAIT_SECONDS: u64 = 900;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `STARGAZER_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `STARGAZER_USER` or `--user`: Account name used for basic auth
/// - `STARGAZER_MIN_ISSUES` or `--min-issues`: Issue threshold
/// - `STARGAZER_MIN_PULLS` or `--min-pulls`: Pull request threshold
/// - `STARGAZER_LANGUAGE` or `--language`: Search language filter
/// - `STARGAZER_OUTPUT_FILE` or `--output-file`: Report destination
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use stargazer::StargazerConfig;
///
/// let config = StargazerConfig::load().expect("failed to load configuration");
/// let credentials = config.credentials().expect("user and token required");
/// let criteria = config.criteria();
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "STARGAZER",
    discovery(
        dotfile_name = ".stargazer.toml",
        config_file_name = "stargazer.toml",
        app_name = "stargazer"
    )
)]
pub struct StargazerConfig {
    /// Personal access token used as the basic-auth password.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `STARGAZER_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Account name used as the basic-auth user.
    ///
    /// Can be provided via:
    /// - CLI: `--user <USER>` or `-u <USER>`
    /// - Environment: `STARGAZER_USER`
    /// - Config file: `user = "..."`
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,

    /// Minimum number of genuine issues (pull requests excluded).
    #[ortho_config(cli_short = 'i')]
    pub min_issues: u64,

    /// Minimum number of pull requests in any state.
    #[ortho_config(cli_short = 'p')]
    pub min_pulls: u64,

    /// Restricts the search to one language (`language:<value>`).
    #[ortho_config(cli_short = 'l')]
    pub language: Option<String>,

    /// Writes the report to this file instead of standard output.
    ///
    /// Parent directories are created when missing.
    #[ortho_config(cli_short = 'o')]
    pub output_file: Option<String>,

    /// REST API base URL; point at a GitHub Enterprise `/api/v3` endpoint
    /// to scan a private instance.
    #[ortho_config(cli_short = 'a')]
    pub api_base: String,

    /// Repositories enriched at the same time. `1` enriches strictly one
    /// after another.
    #[ortho_config(cli_short = 'c')]
    pub concurrency: usize,

    /// Deadline for each request, in seconds.
    #[ortho_config(cli_short = 'w')]
    pub request_timeout_seconds: u64,

    /// Retries after a transient failure. `0` makes the first failure
    /// fatal.
    #[ortho_config(cli_short = 'r')]
    pub max_retries: usize,

    /// Delay before the first retry, in milliseconds.
    #[ortho_config(cli_short = 'd')]
    pub retry_min_delay_ms: u64,

    /// Upper bound for any retry delay, in milliseconds.
    #[ortho_config(cli_short = 'D')]
    pub retry_max_delay_ms: u64,

    /// Longest wait for a rate limit reset before giving up, in seconds.
    #[ortho_config(cli_short = 'W')]
    pub max_rate_limit_wait_seconds: u64,
}

impl Default for StargazerConfig {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            min_issues: 0,
            min_pulls: 0,
            language: None,
            output_file: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_min_delay_ms: DEFAULT_RETRY_MIN_DELAY_MS,
            retry_max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            max_rate_limit_wait_seconds: DEFAULT_MAX_RATE_LIMIT_WAIT_SECONDS,
        }
    }
}

impl StargazerConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingToken`] when no token source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, ScanError> {
        let token = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ScanError::MissingToken)?;
        PersonalAccessToken::new(token)
    }

    /// Returns the basic-auth user.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingUser`] when no user is configured.
    pub fn require_user(&self) -> Result<AccountName, ScanError> {
        AccountName::new(self.user.as_deref().ok_or(ScanError::MissingUser)?)
    }

    /// Builds the credentials handed to the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MissingUser`] or [`ScanError::MissingToken`].
    pub fn credentials(&self) -> Result<Credentials, ScanError> {
        Ok(Credentials::new(self.require_user()?, self.resolve_token()?))
    }

    /// Admission thresholds and language filter.
    #[must_use]
    pub fn criteria(&self) -> SearchCriteria {
        let criteria = SearchCriteria::new(self.min_issues, self.min_pulls);
        match self.language.as_deref() {
            Some(language) => criteria.with_language(language),
            None => criteria,
        }
    }

    /// The repository search request.
    #[must_use]
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::from(&self.criteria())
    }

    /// Parses [`Self::api_base`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidUrl`] when the value is not an absolute
    /// URL.
    pub fn api_base_url(&self) -> Result<Url, ScanError> {
        Url::parse(self.api_base.trim())
            .map_err(|error| ScanError::InvalidUrl(format!("{}: {error}", self.api_base)))
    }

    /// Per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Backoff settings for transient failures.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            min_delay: Duration::from_millis(self.retry_min_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            max_rate_limit_wait: Duration::from_secs(self.max_rate_limit_wait_seconds),
        }
    }

    /// Validates configuration consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Configuration`] when `concurrency` or
    /// `request_timeout_seconds` is zero, the language filter is blank, or
    /// the minimum retry delay exceeds the maximum.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(configuration_error("concurrency must be at least 1"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(configuration_error(
                "request_timeout_seconds must be at least 1",
            ));
        }
        if self
            .language
            .as_deref()
            .is_some_and(|language| language.trim().is_empty())
        {
            return Err(configuration_error(
                "language must not be blank (omit --language to search every language)",
            ));
        }
        if self.retry_min_delay_ms > self.retry_max_delay_ms {
            return Err(configuration_error(
                "retry_min_delay_ms must not exceed retry_max_delay_ms",
            ));
        }
        Ok(())
    }
}

fn configuration_error(message: &str) -> ScanError {
    ScanError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
