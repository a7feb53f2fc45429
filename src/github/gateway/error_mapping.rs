//! Error mapping helpers for the Octocrab gateway implementation.

use http::StatusCode;

use crate::github::error::ScanError;
use crate::github::rate_limit::RateLimitInfo;

use super::http_utils::{parse_github_error, summarise_body};

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a response represents a rate limit rejection based on the
/// HTTP status, the message / documentation URL content, and the remaining
/// quota header.
pub(super) fn is_rate_limit_error(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
    rate_limit: Option<&RateLimitInfo>,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"))
        || rate_limit.is_some_and(RateLimitInfo::is_exhausted);

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ScanError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_status(
            operation,
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
            None,
        );
    }

    if is_network_error(error) {
        return ScanError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ScanError::Configuration {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success response to the matching [`ScanError`] kind.
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    body: &str,
) -> ScanError {
    let parsed = parse_github_error(body);
    let message = parsed
        .message
        .unwrap_or_else(|| summarise_body(body));

    map_status(
        operation,
        status,
        &message,
        parsed.documentation_url.as_deref(),
        rate_limit,
    )
}

fn map_status(
    operation: &str,
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
    rate_limit: Option<RateLimitInfo>,
) -> ScanError {
    if is_rate_limit_error(status, message, documentation_url, rate_limit.as_ref()) {
        let base_message = format!("{operation} failed: {message}");
        let message = match &rate_limit {
            Some(info) => format!(
                "{base_message} (resets at {reset})",
                reset = info.reset_at()
            ),
            None => base_message,
        };
        return ScanError::RateLimitExceeded {
            rate_limit,
            message,
        };
    }

    if is_auth_failure(status) {
        return ScanError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        };
    }

    if status == StatusCode::NOT_FOUND {
        return ScanError::NotFound {
            message: format!("{operation}: {message}"),
        };
    }

    ScanError::Upstream {
        status: status.as_u16(),
        message: format!("{operation} failed: {message}"),
    }
}
