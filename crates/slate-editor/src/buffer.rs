//! Line buffer: the document as an ordered list of byte lines.
//!
//! A [`LineBuffer`] owns every [`Line`] of the document. Other components
//! hold only transient `(row, col)` coordinates, which must be revalidated
//! after any structural edit because row indices shift.
//!
//! # Design choices
//!
//! - **Lines are byte vectors.** Columns are byte offsets and one byte is one
//!   display column. Text is never decoded; whatever bytes were in the file
//!   are what gets written back.
//!
//! - **Array-shift storage.** Inserting or removing a line shifts the tail of
//!   a `Vec`, and editing a line shifts its suffix. Every operation is
//!   O(line length) or O(trailing line count). Terminal input rate bounds
//!   how often that happens.
//!
//! - **Never empty.** An empty document is one zero-length line, and no
//!   operation can remove the last line.
//!
//! - **Out-of-range is a no-op.** Bad rows are ignored and bad columns are
//!   clamped. Nothing here panics or returns an error.

use std::fmt;

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One line of text, without its terminator.
///
/// The length is the length of the backing vector, so it can never disagree
/// with the content.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    /// Create a line from its bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The line's content.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes (and display columns).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// The document: at least one line, plus a modified flag.
///
/// The modified flag starts false, is set by every content edit
/// ([`insert_char`](Self::insert_char), [`delete_char`](Self::delete_char),
/// [`split_line`](Self::split_line),
/// [`join_with_previous`](Self::join_with_previous)), and is cleared by
/// [`mark_saved`](Self::mark_saved). Adding whole lines with
/// [`insert_line`](Self::insert_line) or
/// [`append_empty_line`](Self::append_empty_line) does not set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Line>,
    modified: bool,
}

impl LineBuffer {
    // -- Construction -------------------------------------------------------

    /// A document holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
            modified: false,
        }
    }

    /// A document holding `lines`, unmodified.
    ///
    /// An empty list yields one empty line.
    #[must_use]
    pub fn from_lines(lines: Vec<Vec<u8>>) -> Self {
        if lines.is_empty() {
            return Self::new();
        }
        Self {
            lines: lines.into_iter().map(Line::new).collect(),
            modified: false,
        }
    }

    // -- Access -------------------------------------------------------------

    /// Number of lines. Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at `row`, if it exists.
    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Length of the line at `row`, or 0 if it does not exist.
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, Line::len)
    }

    /// Iterate over all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert a new line holding `text` before `at`.
    ///
    /// `at == line_count()` appends. Larger values are ignored.
    pub fn insert_line(&mut self, at: usize, text: &[u8]) {
        if at > self.lines.len() {
            return;
        }
        self.lines.insert(at, Line::new(text));
    }

    /// Append an empty line at the end of the document.
    pub fn append_empty_line(&mut self) {
        self.insert_line(self.lines.len(), b"");
    }

    /// Insert `byte` at `col` on `row`, clamping `col` to the line length.
    pub fn insert_char(&mut self, row: usize, col: usize, byte: u8) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let col = col.min(line.len());
        line.bytes.insert(col, byte);
        self.modified = true;
    }

    /// Remove the byte just before `col` on `row` (backspace semantics).
    ///
    /// No-op when `col == 0`. A `col` past the end removes the last byte.
    pub fn delete_char(&mut self, row: usize, col: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let col = col.min(line.len());
        if col == 0 {
            return;
        }
        line.bytes.remove(col - 1);
        self.modified = true;
    }

    /// Split `row` at `col`: the bytes from `col` on become a new line
    /// right after it.
    pub fn split_line(&mut self, row: usize, col: usize) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let col = col.min(line.len());
        let tail = line.bytes.split_off(col);
        self.lines.insert(row + 1, Line { bytes: tail });
        self.modified = true;
    }

    /// Append `row` to the end of `row - 1` and remove `row`.
    ///
    /// No-op for row 0 or a row that does not exist.
    pub fn join_with_previous(&mut self, row: usize) {
        if row == 0 || row >= self.lines.len() {
            return;
        }
        let line = self.lines.remove(row);
        self.lines[row - 1].bytes.extend_from_slice(&line.bytes);
        self.modified = true;
    }

    // -- Modified flag ------------------------------------------------------

    /// True if the content changed since load or the last save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after a successful save.
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
