//! # slate-editor: editor core for slate
//!
//! The document model and everything that reads or moves through it:
//!
//! - **[`buffer`]**: `LineBuffer`, an ordered list of byte lines with a modified flag
//! - **[`view`]**: cursor, sticky column, scroll offsets, and viewport size
//! - **[`search`]**: literal forward search with wraparound, and the find prompt
//! - **[`render`]**: full-frame repaint with inverse-video highlight and status bar
//! - **[`status`]**: the timed message shown on the bottom line
//! - **[`file`]**: line-oriented load and atomic save
//! - **[`options`]**: editor tunables
//! - **[`error`]**: recoverable errors reported on the status line
//!
//! Terminal control and key decoding live in `slate-term`; this crate only
//! consumes its key events and ANSI writers.

pub mod buffer;
pub mod error;
pub mod file;
pub mod options;
pub mod render;
pub mod search;
pub mod status;
pub mod view;

pub use error::{Error, Result};
