//! Editor tunables.
//!
//! Plain values with documented defaults. The binary runs with
//! `Options::default()`; tests construct variations directly.

use std::time::Duration;

/// How long a status message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Name given to a document started without a file argument.
pub const UNTITLED_NAME: &str = "untitled.txt";

/// Editor-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Visibility window of a status message.
    pub message_timeout: Duration,

    /// Extra quit presses required while the document is dirty.
    pub quit_confirmations: u8,

    /// Rows kept in view when paging (a page moves `screen_rows - overlap`).
    pub page_overlap: usize,

    /// File name used when none was given.
    pub untitled_name: String,

    /// Bounded read wait, in tenths of a second.
    pub read_timeout_deciseconds: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            message_timeout: MESSAGE_TIMEOUT,
            quit_confirmations: 1,
            page_overlap: 2,
            untitled_name: UNTITLED_NAME.to_owned(),
            read_timeout_deciseconds: 1,
        }
    }
}
