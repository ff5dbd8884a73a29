//! View: cursor position, sticky column, and the scrolled window.
//!
//! The `View` holds everything about *where* the user is: the cursor
//! `(cx, cy)`, the preferred column for vertical motion, the top-left corner
//! of the visible window, and the window size in text rows and columns. It
//! does not own the buffer; movement takes the [`LineBuffer`] as a parameter.
//!
//! # Sticky column
//!
//! Left, Right, Home, and End set the preferred column. Up, Down, PageUp, and
//! PageDown only read it: the cursor lands on `min(preferred, line length)`.
//! Moving through a short line and back to a long one restores the column
//! the user actually chose.
//!
//! # Invariant
//!
//! After every operation here, `cy < line_count` and `cx <= line_len(cy)`.

use slate_term::terminal::Size;

use crate::buffer::LineBuffer;

/// Terminal rows reserved below the text area: status bar and message line.
pub const RESERVED_ROWS: u16 = 2;

/// A cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Cursor and viewport state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    cx: usize,
    cy: usize,
    preferred_column: usize,
    row_offset: usize,
    col_offset: usize,
    screen_rows: usize,
    screen_cols: usize,
    page_overlap: usize,
}

impl View {
    /// A view at the origin showing `screen_rows × screen_cols` text cells.
    ///
    /// Both dimensions are at least 1.
    #[must_use]
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            cx: 0,
            cy: 0,
            preferred_column: 0,
            row_offset: 0,
            col_offset: 0,
            screen_rows: screen_rows.max(1),
            screen_cols: screen_cols.max(1),
            page_overlap: 2,
        }
    }

    /// A view sized for a terminal of `size`.
    #[must_use]
    pub fn for_terminal(size: Size) -> Self {
        let (rows, cols) = text_area(size);
        Self::new(rows, cols)
    }

    /// Set how many rows a page motion keeps in view.
    #[must_use]
    pub const fn with_page_overlap(mut self, overlap: usize) -> Self {
        self.page_overlap = overlap;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    #[inline]
    #[must_use]
    pub const fn preferred_column(&self) -> usize {
        self.preferred_column
    }

    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Visible text rows (the terminal height minus the two bottom lines).
    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    // -- Viewport -----------------------------------------------------------

    /// Adopt a new terminal size. Returns true if the text area changed.
    pub fn resize(&mut self, size: Size) -> bool {
        let (rows, cols) = text_area(size);
        let changed = rows != self.screen_rows || cols != self.screen_cols;
        self.screen_rows = rows;
        self.screen_cols = cols;
        changed
    }

    /// Scroll so the cursor is inside the window.
    ///
    /// Minimal adjustment: a cursor above or left of the window becomes the
    /// first visible row or column, one below or right becomes the last.
    /// Idempotent.
    pub const fn reconcile_scroll(&mut self) {
        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.cy >= self.row_offset + self.screen_rows {
            self.row_offset = self.cy + 1 - self.screen_rows;
        }

        if self.cx < self.col_offset {
            self.col_offset = self.cx;
        }
        if self.cx >= self.col_offset + self.screen_cols {
            self.col_offset = self.cx + 1 - self.screen_cols;
        }
    }

    /// Cursor position relative to the window, clamped inside it.
    ///
    /// Returns `(x, y)`.
    #[must_use]
    pub fn screen_cursor(&self) -> (usize, usize) {
        let x = self
            .cx
            .saturating_sub(self.col_offset)
            .min(self.screen_cols - 1);
        let y = self
            .cy
            .saturating_sub(self.row_offset)
            .min(self.screen_rows - 1);
        (x, y)
    }

    // -- Positioning --------------------------------------------------------

    /// Put the cursor at `(row, col)`, clamped to the buffer, and make that
    /// column the preferred one.
    pub fn place(&mut self, buf: &LineBuffer, row: usize, col: usize) {
        self.cy = row.min(buf.line_count() - 1);
        self.cx = col.min(buf.line_len(self.cy));
        self.preferred_column = self.cx;
    }

    /// Apply a cursor motion.
    ///
    /// `Down` on the last line appends an empty line and moves onto it.
    pub fn move_cursor(&mut self, buf: &mut LineBuffer, motion: Motion) {
        match motion {
            Motion::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                    self.preferred_column = self.cx;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = buf.line_len(self.cy);
                    self.preferred_column = self.cx;
                }
            }
            Motion::Right => {
                if self.cx < buf.line_len(self.cy) {
                    self.cx += 1;
                    self.preferred_column = self.cx;
                } else if self.cy + 1 < buf.line_count() {
                    self.cy += 1;
                    self.cx = 0;
                    self.preferred_column = 0;
                }
            }
            Motion::Up => {
                self.cy = self.cy.saturating_sub(1);
                self.apply_preferred_column(buf);
            }
            Motion::Down => {
                if self.cy + 1 >= buf.line_count() {
                    buf.append_empty_line();
                }
                self.cy += 1;
                self.apply_preferred_column(buf);
            }
            Motion::Home => {
                self.cx = 0;
                self.preferred_column = 0;
            }
            Motion::End => {
                self.cx = buf.line_len(self.cy);
                self.preferred_column = self.cx;
            }
            Motion::PageUp => {
                self.cy = self.cy.saturating_sub(self.page_step());
                self.apply_preferred_column(buf);
            }
            Motion::PageDown => {
                self.cy = (self.cy + self.page_step()).min(buf.line_count() - 1);
                self.apply_preferred_column(buf);
            }
        }
    }

    /// Rows moved by one page motion.
    fn page_step(&self) -> usize {
        self.screen_rows.saturating_sub(self.page_overlap).max(1)
    }

    /// Land on the preferred column, or the end of a shorter line.
    fn apply_preferred_column(&mut self, buf: &LineBuffer) {
        self.cx = self.preferred_column.min(buf.line_len(self.cy));
    }
}

/// Text rows and columns available on a terminal of `size`.
fn text_area(size: Size) -> (usize, usize) {
    let rows = size.rows.saturating_sub(RESERVED_ROWS).max(1);
    let cols = size.cols.max(1);
    (usize::from(rows), usize::from(cols))
}
