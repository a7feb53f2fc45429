//! Stargazer CLI entrypoint for popular repository discovery.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use stargazer::{RunSummary, ScanError, StargazerConfig, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = telemetry::init() {
        report_error(&error);
    }

    match run().await {
        Ok(summary) => {
            info!(
                scanned = summary.scanned,
                admitted = summary.admitted,
                clamped = summary.clamped,
                "scan finished"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_error(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunSummary, ScanError> {
    let config = load_config()?;
    cli::scan::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ScanError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<StargazerConfig, ScanError> {
    StargazerConfig::load().map_err(|error| ScanError::Configuration {
        message: error.to_string(),
    })
}

fn report_error(error: &ScanError) {
    let _ignored = writeln!(io::stderr().lock(), "{error}");
}
