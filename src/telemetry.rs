//! Diagnostic logging setup.
//!
//! The report goes to standard output, so diagnostics are written to
//! standard error through `tracing-subscriber`. `RUST_LOG` overrides the
//! default directive.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::github::ScanError;

/// Directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Installs the global subscriber writing to standard error.
///
/// # Errors
///
/// Returns [`ScanError::Configuration`] when a global subscriber is already
/// installed.
pub fn init() -> Result<(), ScanError> {
    subscriber(std::io::stderr, env_filter())
        .try_init()
        .map_err(|error| ScanError::Configuration {
            message: format!("failed to initialise logging: {error}"),
        })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn subscriber<W>(writer: W, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .finish()
}
