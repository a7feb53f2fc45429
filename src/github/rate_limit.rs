//! Quota headers attached to GitHub responses.
//!
//! GitHub reports the request window on every response through
//! `X-RateLimit-Limit`, `X-RateLimit-Remaining` and `X-RateLimit-Reset`. The
//! retrying gateway reads the reset timestamp to decide whether a declined
//! request is worth waiting for. Secondary rate limits also carry
//! `Retry-After`, which takes precedence over the window reset.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http::HeaderMap;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Snapshot of the request window reported with a response.
///
/// # Example
///
/// ```
/// use stargazer::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(30, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// assert_eq!(info.reset_at(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
    retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Builds a snapshot; `reset_at` is a Unix timestamp in seconds.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
            retry_after: None,
        }
    }

    /// Attaches the delay GitHub asked for through `Retry-After`.
    #[must_use]
    pub const fn with_retry_after(self, retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..self
        }
    }

    /// Reads the `X-RateLimit-*` headers of a response.
    ///
    /// Returns `None` unless all three headers are present and numeric. A
    /// `Retry-After` given in seconds is attached when present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = numeric_header(headers, LIMIT_HEADER)?;
        let remaining = numeric_header(headers, REMAINING_HEADER)?;
        let reset_at = numeric_header(headers, RESET_HEADER)?;

        let info = Self::new(
            u32::try_from(limit).ok()?,
            u32::try_from(remaining).ok()?,
            reset_at,
        );
        Some(match numeric_header(headers, RETRY_AFTER_HEADER) {
            Some(seconds) => info.with_retry_after(Duration::from_secs(seconds)),
            None => info,
        })
    }

    /// Requests allowed per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Delay requested through `Retry-After`, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// True once the window has no requests left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time left until the window resets, measured from `now`.
    ///
    /// A reset in the past, or a clock before the epoch, yields zero.
    #[must_use]
    pub fn wait_from(&self, now: SystemTime) -> Duration {
        let elapsed = now
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_epoch| since_epoch.as_secs());
        Duration::from_secs(self.reset_at.saturating_sub(elapsed))
    }

    /// Time left until the window resets, measured from the system clock.
    #[must_use]
    pub fn wait_until_reset(&self) -> Duration {
        self.wait_from(SystemTime::now())
    }
}

fn numeric_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use http::{HeaderMap, HeaderValue};
    use rstest::rstest;

    use super::RateLimitInfo;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[rstest]
    #[case::future_reset(1_000_090, Duration::from_secs(90))]
    #[case::reset_now(1_000_000, Duration::ZERO)]
    #[case::reset_passed(999_000, Duration::ZERO)]
    fn wait_is_measured_against_the_given_clock(#[case] reset_at: u64, #[case] expected: Duration) {
        let now = UNIX_EPOCH + Duration::from_secs(1_000_000);

        assert_eq!(RateLimitInfo::new(30, 0, reset_at).wait_from(now), expected);
    }

    #[rstest]
    fn from_headers_reads_all_three_values() {
        let map = headers(&[
            ("x-ratelimit-limit", "30"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", "1700000000"),
        ]);

        let info = RateLimitInfo::from_headers(&map).expect("headers should parse");

        assert_eq!(info, RateLimitInfo::new(30, 0, 1_700_000_000));
        assert_eq!(info.limit(), 30);
        assert!(info.is_exhausted());
        assert_eq!(info.retry_after(), None);
    }

    #[rstest]
    fn from_headers_attaches_retry_after_seconds() {
        let map = headers(&[
            ("x-ratelimit-limit", "5000"),
            ("x-ratelimit-remaining", "4200"),
            ("x-ratelimit-reset", "1700000000"),
            ("retry-after", "45"),
        ]);

        let info = RateLimitInfo::from_headers(&map).expect("headers should parse");

        assert!(!info.is_exhausted());
        assert_eq!(info.retry_after(), Some(Duration::from_secs(45)));
    }

    #[rstest]
    #[case::missing_reset(&[("x-ratelimit-limit", "5000"), ("x-ratelimit-remaining", "1")])]
    #[case::non_numeric(&[
        ("x-ratelimit-limit", "lots"),
        ("x-ratelimit-remaining", "1"),
        ("x-ratelimit-reset", "1700000000"),
    ])]
    #[case::remaining_overflows(&[
        ("x-ratelimit-limit", "5000"),
        ("x-ratelimit-remaining", "99999999999"),
        ("x-ratelimit-reset", "1700000000"),
    ])]
    fn from_headers_requires_complete_numeric_headers(
        #[case] pairs: &[(&'static str, &'static str)],
    ) {
        assert_eq!(RateLimitInfo::from_headers(&headers(pairs)), None);
    }
}
