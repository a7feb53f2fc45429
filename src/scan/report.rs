//! Delimited report output.
//!
//! Rows are `;`-separated in the fixed order
//! `User;Project;Stars;Language;Issues;PullRequests;Url`, preceded by one
//! header line. Each row is flushed as soon as it is written so a consumer
//! tailing the output sees progress.

use std::fmt;
use std::io::Write;

use crate::github::ScanError;

use super::model::EnrichedRepository;

/// Field separator.
pub const DELIMITER: &str = ";";

/// Column names, in output order.
pub const HEADER: [&str; 7] = [
    "User",
    "Project",
    "Stars",
    "Language",
    "Issues",
    "PullRequests",
    "Url",
];

/// One admitted repository as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Owner login.
    pub user: String,
    /// Repository name.
    pub project: String,
    /// Star count.
    pub stars: u64,
    /// Dominant language.
    pub language: String,
    /// Issues excluding pull requests.
    pub issues: u64,
    /// Pull requests in every state.
    pub pulls: u64,
    /// Repository web page.
    pub url: String,
}

impl From<&EnrichedRepository> for ReportRow {
    fn from(enriched: &EnrichedRepository) -> Self {
        let repository = enriched.repository();
        Self {
            user: repository.owner.login.clone(),
            project: repository.name.clone(),
            stars: repository.stargazers_count,
            language: enriched.language().to_owned(),
            issues: enriched.issues().count().unwrap_or_default(),
            pulls: enriched.pull_count(),
            url: repository.html_url.clone(),
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{user}{DELIMITER}{project}{DELIMITER}{stars}{DELIMITER}{language}{DELIMITER}\
             {issues}{DELIMITER}{pulls}{DELIMITER}{url}",
            user = self.user,
            project = self.project,
            stars = self.stars,
            language = self.language,
            issues = self.issues,
            pulls = self.pulls,
            url = self.url,
        )
    }
}

/// Streams report lines to a sink.
///
/// The header is written at most once, before the first row.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    sink: W,
    header_written: bool,
}

impl<W: Write> ReportWriter<W> {
    /// Wraps `sink`; nothing is written yet.
    #[must_use]
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
            header_written: false,
        }
    }

    /// Writes the header line unless it was already written.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] when the sink rejects the write.
    pub fn write_header(&mut self) -> Result<(), ScanError> {
        if self.header_written {
            return Ok(());
        }
        let header = HEADER.join(DELIMITER);
        self.write_line(&header)?;
        self.header_written = true;
        Ok(())
    }

    /// Writes and flushes one row, preceded by the header if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] when the sink rejects the write.
    pub fn write_row(&mut self, row: &ReportRow) -> Result<(), ScanError> {
        self.write_header()?;
        self.write_line(&row.to_string())
    }

    /// Returns the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_line(&mut self, line: &str) -> Result<(), ScanError> {
        writeln!(self.sink, "{line}")
            .and_then(|()| self.sink.flush())
            .map_err(|error| ScanError::Io {
                message: format!("failed to write report: {error}"),
            })
    }
}
