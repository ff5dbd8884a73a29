//! Search: literal forward search with wraparound, and the find prompt.
//!
//! Matching is byte-exact and case-sensitive. A scan runs in two passes:
//! from the start position to the end of the document, then from the top
//! back down to the start row. Every search is bounded by one pass over the
//! document, plus the start row once more.
//!
//! Empty lines never match and are skipped. Overlapping matches are found:
//! a repeat search starts one byte past the previous match, not past its end.
//!
//! # Find flow
//!
//! 1. Ctrl-F opens a [`Prompt`]; printable bytes and Backspace edit it.
//! 2. Enter with a non-empty query calls [`SearchState::find`], which starts
//!    at the cursor itself (a match under the cursor counts).
//! 3. Ctrl-N calls [`SearchState::find_next`], which starts just past the
//!    last match and wraps to the top.
//!
//! A hit moves the cursor to the match and returns a [`Highlight`]; a miss
//! leaves the cursor where it was.

use slate_term::input::{KeyCode, KeyEvent};

use crate::buffer::LineBuffer;
use crate::view::View;

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// A highlighted region on one line: the current search match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Buffer row.
    pub row: usize,
    /// First highlighted byte.
    pub col: usize,
    /// Number of highlighted bytes.
    pub len: usize,
}

impl Highlight {
    /// One past the last highlighted byte.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.col + self.len
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Find `needle` in `hay` at or after byte `from`.
fn find_in_line(hay: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if hay.is_empty() || needle.is_empty() {
        return None;
    }
    let from = from.min(hay.len());
    hay[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Locate the first match of `query` at or after `(row, col)`, wrapping once
/// to the top of the document.
///
/// Returns the match's `(row, col)`.
#[must_use]
pub fn scan(buf: &LineBuffer, query: &[u8], row: usize, col: usize) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }
    let start_row = row.min(buf.line_count() - 1);

    let forward = (start_row..buf.line_count()).map(|r| (r, if r == start_row { col } else { 0 }));
    let wrapped = (0..=start_row).map(|r| (r, 0));

    forward.chain(wrapped).find_map(|(r, c)| {
        let line = buf.line(r)?;
        find_in_line(line.as_bytes(), query, c).map(|hit| (r, hit))
    })
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The last query and where it last matched.
///
/// Not authoritative: the buffer is. A stale match position only decides
/// where the next scan starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: Vec<u8>,
    last_match: Option<(usize, usize)>,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last confirmed query (empty if none yet).
    #[inline]
    #[must_use]
    pub fn query(&self) -> &[u8] {
        &self.query
    }

    /// Where the last match was found.
    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<(usize, usize)> {
        self.last_match
    }

    /// Search for `query` starting at the cursor.
    ///
    /// Remembers `query` for [`find_next`](Self::find_next) whether or not
    /// it matches.
    pub fn find(&mut self, query: &[u8], buf: &LineBuffer, view: &mut View) -> Option<Highlight> {
        self.query = query.to_vec();
        self.last_match = None;
        self.search_from(buf, view, view.cy(), view.cx())
    }

    /// Repeat the last query from one byte past the last match.
    ///
    /// With no previous match, starts at the cursor. Returns `None` without
    /// scanning when there is no query.
    pub fn find_next(&mut self, buf: &LineBuffer, view: &mut View) -> Option<Highlight> {
        let (row, col) = match self.last_match {
            Some((row, col)) => (row, col + 1),
            None => (view.cy(), view.cx()),
        };
        self.search_from(buf, view, row, col)
    }

    fn search_from(&mut self, buf: &LineBuffer, view: &mut View, row: usize, col: usize) -> Option<Highlight> {
        let (row, col) = scan(buf, &self.query, row, col)?;
        self.last_match = Some((row, col));
        view.place(buf, row, col);
        Some(Highlight {
            row,
            col,
            len: self.query.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Longest query the prompt accepts.
pub const MAX_QUERY: usize = 255;

/// What a key did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// The input changed (or a no-op edit such as Backspace on empty input).
    Edited,
    /// Escape: abandon the prompt.
    Cancelled,
    /// Enter with non-empty input.
    Submitted(Vec<u8>),
    /// Key has no meaning here; the prompt stays open unchanged.
    Ignored,
}

/// A one-line input session shown on the message line.
///
/// The controller owns at most one of these; while it exists every key goes
/// to [`handle`](Self::handle) instead of the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    input: Vec<u8>,
}

impl Prompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text typed so far.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Apply one key.
    pub fn handle(&mut self, key: KeyEvent) -> PromptEvent {
        if let Some(byte) = key.printable() {
            if self.input.len() < MAX_QUERY {
                self.input.push(byte);
            }
            return PromptEvent::Edited;
        }

        match key.code {
            KeyCode::Escape => PromptEvent::Cancelled,
            KeyCode::Enter if !self.input.is_empty() => PromptEvent::Submitted(self.input.clone()),
            KeyCode::Backspace => {
                self.input.pop();
                PromptEvent::Edited
            }
            _ => PromptEvent::Ignored,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
