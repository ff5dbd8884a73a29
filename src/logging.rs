// SPDX-License-Identifier: MIT
//
// Diagnostics. The terminal owns stdout and stderr while the editor runs,
// so tracing output only ever goes to a file, and only when one is asked
// for. Without a log file no subscriber is installed and every tracing
// macro is a no-op.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const FILTER_ENV: &str = "SLATE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Append tracing output to `path`, filtered by `SLATE_LOG`.
///
/// # Errors
///
/// The log file cannot be opened.
pub fn init(path: &Path) -> io::Result<()> {
    let file = open_log(path)?;
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slate.log");
        std::fs::write(&path, b"first\n").unwrap();

        drop(open_log(&path).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"first\n");
    }

    #[test]
    fn open_log_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log(&dir.path().join("no/such/slate.log")).is_err());
    }
}
