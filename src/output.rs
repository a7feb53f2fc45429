//! Report destinations: standard output or a file created for the run.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, File};

use crate::github::ScanError;

/// Where report lines go. A file sink is closed when the value is dropped.
#[derive(Debug)]
pub enum ReportSink {
    /// Standard output.
    Stdout(io::Stdout),
    /// A file created (or truncated) for this run.
    File {
        /// Location of the report.
        path: Utf8PathBuf,
        /// Open handle.
        file: File,
    },
}

impl ReportSink {
    /// Opens `path`, or standard output when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] when the file or its parent directories
    /// cannot be created.
    pub fn open(path: Option<&Utf8Path>) -> Result<Self, ScanError> {
        match path {
            Some(target) => Ok(Self::File {
                path: target.to_path_buf(),
                file: create_file_with_parents(target)?,
            }),
            None => Ok(Self::Stdout(io::stdout())),
        }
    }

    /// File location, when writing to a file.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Stdout(_) => None,
            Self::File { path, .. } => Some(path.as_path()),
        }
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stdout) => stdout.write(buf),
            Self::File { file, .. } => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stdout) => stdout.flush(),
            Self::File { file, .. } => file.flush(),
        }
    }
}

fn create_file_with_parents(path: &Utf8Path) -> Result<File, ScanError> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ScanError::Io {
        message: format!("invalid output path '{path}': no file name"),
    })?;

    let (dir, rel_parent) = if parent.is_absolute() {
        let root = open_ambient("/")?;
        let rel = parent.strip_prefix("/").map_err(|_| ScanError::Io {
            message: format!("failed to normalise output directory '{parent}'"),
        })?;
        (root, rel)
    } else {
        (open_ambient(".")?, parent)
    };

    let target_dir = if rel_parent.as_str().is_empty() || rel_parent == Utf8Path::new(".") {
        dir
    } else {
        dir.create_dir_all(rel_parent).map_err(|error| ScanError::Io {
            message: format!("failed to create output directory '{parent}': {error}"),
        })?;
        dir.open_dir(rel_parent).map_err(|error| ScanError::Io {
            message: format!("failed to open output directory '{parent}': {error}"),
        })?
    };

    target_dir.create(file_name).map_err(|error| ScanError::Io {
        message: format!("failed to create output file '{path}': {error}"),
    })
}

fn open_ambient(path: &str) -> Result<Dir, ScanError> {
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| ScanError::Io {
        message: format!("failed to open directory '{path}': {error}"),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::ReportSink;
    use crate::github::ScanError;

    fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir should be created");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir should be UTF-8");
        (temp, root)
    }

    #[rstest]
    fn creates_missing_parent_directories() {
        let (_temp, root) = utf8_temp_dir();
        let target = root.join("reports/2026/popular.csv");

        let mut sink = ReportSink::open(Some(&target)).expect("sink should open");
        writeln!(sink, "User;Project").expect("write should succeed");
        sink.flush().expect("flush should succeed");
        drop(sink);

        let contents = std::fs::read_to_string(&target).expect("report should exist");
        assert_eq!(contents, "User;Project\n");
    }

    #[rstest]
    fn truncates_existing_reports() {
        let (_temp, root) = utf8_temp_dir();
        let target = root.join("popular.csv");
        std::fs::write(&target, "stale contents that are longer\n").expect("seed file");

        let mut sink = ReportSink::open(Some(&target)).expect("sink should open");
        writeln!(sink, "fresh").expect("write should succeed");
        drop(sink);

        assert_eq!(
            std::fs::read_to_string(&target).expect("report should exist"),
            "fresh\n"
        );
    }

    #[rstest]
    fn directory_targets_are_rejected() {
        let (_temp, root) = utf8_temp_dir();

        let result = ReportSink::open(Some(&root));

        assert!(
            matches!(result, Err(ScanError::Io { .. })),
            "expected Io error, got {result:?}"
        );
    }

    #[rstest]
    fn missing_path_selects_stdout() {
        let sink = ReportSink::open(None).expect("stdout should open");

        assert!(sink.path().is_none(), "stdout has no path");
    }
}
