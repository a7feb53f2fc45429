//! Retrying decorator for query gateways.
//!
//! Transient failures (rate limiting, transport errors, timeouts, 5xx) are
//! repeated with exponential backoff. A rate limit rejection additionally
//! waits for GitHub's signal, up to a configured ceiling: `Retry-After` when
//! present, the window reset when the primary quota is exhausted, and at
//! least a minute for secondary limits that give neither. Everything else
//! fails immediately.

use std::time::Duration;

use async_trait::async_trait;
use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use tracing::warn;
use url::Url;

use crate::github::error::ScanError;

use super::{ApiResponse, QueryGateway};

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(900);
const SECONDARY_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Backoff settings for [`RetryingGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of repeated attempts after the first failure.
    pub max_retries: usize,
    /// Delay before the first retry.
    pub min_delay: Duration,
    /// Upper bound for any backoff delay.
    pub max_delay: Duration,
    /// Longest wait for a rate limit reset before giving up.
    pub max_rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_rate_limit_wait: DEFAULT_MAX_RATE_LIMIT_WAIT,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries: the first failure is fatal.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_retries: 0,
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_rate_limit_wait: DEFAULT_MAX_RATE_LIMIT_WAIT,
        }
    }

    fn delays(&self) -> ExponentialBackoff {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
            .build()
    }

    /// Chooses the wait before retrying `error`, or `None` when the error
    /// must be surfaced.
    fn delay_for(&self, error: &ScanError, backoff: Duration) -> Option<Duration> {
        let ScanError::RateLimitExceeded { rate_limit, .. } = error else {
            return Some(backoff);
        };

        let wait = match rate_limit {
            Some(info) => match info.retry_after() {
                Some(retry_after) => retry_after,
                None if info.is_exhausted() => info.wait_until_reset(),
                None => SECONDARY_RATE_LIMIT_WAIT,
            },
            None => SECONDARY_RATE_LIMIT_WAIT,
        };
        if wait > self.max_rate_limit_wait {
            return None;
        }
        Some(backoff.max(wait))
    }
}

/// Gateway decorator that repeats transient failures.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G> RetryingGateway<G> {
    /// Wraps `inner` with the given policy.
    #[must_use]
    pub const fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Borrow the wrapped gateway.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G> QueryGateway for RetryingGateway<G>
where
    G: QueryGateway,
{
    async fn query(&self, url: &Url) -> Result<ApiResponse, ScanError> {
        let mut delays = self.policy.delays();
        let mut attempt = 1_usize;

        loop {
            let error = match self.inner.query(url).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }
            let Some(delay) = delays
                .next()
                .and_then(|backoff| self.policy.delay_for(&error, backoff))
            else {
                return Err(error);
            };

            warn!(
                %url,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying after transient failure: {error}"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
