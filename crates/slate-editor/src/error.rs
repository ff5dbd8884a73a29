//! Error type for recoverable editor failures.
//!
//! Everything here is *reported*, not fatal: the controller turns these
//! into status-line messages and keeps the session running. Terminal
//! failures never reach this type; they go through the terminal layer's
//! fatal path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A recoverable editor error.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a document failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Attach a path to an I/O error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The OS-level reason, without the path. Used for status messages.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
