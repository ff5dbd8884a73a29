//! Renderer: one full-frame repaint per call.
//!
//! No diffing and no cell grid. Each frame hides the cursor, homes it, and
//! rewrites every text row, the status bar, and the message line from
//! scratch. The caller collects the bytes in an
//! [`OutputBuffer`](slate_term::output::OutputBuffer) so the whole frame
//! reaches the terminal in one write.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ text rows (screen_rows)      │  row_offset + y, sliced at col_offset
//! │ ...        ▓match▓           │  highlight in inverse video
//! ├──────────────────────────────┤
//! │▓ notes.txt (modified)  3:7  42% v0.3.0 ▓│  status bar, inverse video
//! │ message line (5 s)           │
//! └──────────────────────────────┘
//! ```
//!
//! The renderer only reads. Scroll offsets must already be reconciled.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use slate_term::ansi;

use crate::buffer::LineBuffer;
use crate::search::Highlight;
use crate::status::StatusMessage;
use crate::view::View;

/// Version shown at the right of the status bar.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest file name prefix shown in the status bar, in bytes.
const MAX_NAME: usize = 40;

/// Everything one frame is drawn from.
pub struct Screen<'a> {
    pub buffer: &'a LineBuffer,
    pub view: &'a View,
    pub highlight: Option<Highlight>,
    pub file_name: &'a str,
    pub status: &'a StatusMessage,
    /// Input of an open find prompt. Shown instead of the status message,
    /// whatever its age.
    pub prompt: Option<&'a [u8]>,
    pub message_timeout: Duration,
    pub now: Instant,
}

/// Write one complete frame to `out`.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn render(out: &mut impl Write, screen: &Screen<'_>) -> io::Result<()> {
    let view = screen.view;

    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    for y in 0..view.screen_rows() {
        let row = view.row_offset() + y;
        ansi::clear_line(out)?;
        if let Some(line) = screen.buffer.line(row) {
            let highlight = screen.highlight.filter(|h| h.row == row && h.len > 0);
            draw_row(out, line.as_bytes(), view.col_offset(), view.screen_cols(), highlight)?;
        }
        ansi::newline(out)?;
    }

    draw_status_bar(out, screen)?;

    ansi::clear_line(out)?;
    draw_message_line(out, screen)?;

    let (x, y) = view.screen_cursor();
    ansi::cursor_to(out, to_u16(x), to_u16(y))?;
    ansi::cursor_show(out)
}

/// The open prompt as `/<input>`, or the status message while it is fresh.
fn draw_message_line(out: &mut impl Write, screen: &Screen<'_>) -> io::Result<()> {
    let width = screen.view.screen_cols();
    if let Some(input) = screen.prompt {
        out.write_all(b"/")?;
        let room = width.saturating_sub(1);
        return out.write_all(&input[input.len().saturating_sub(room)..]);
    }
    if let Some(text) = screen.status.visible(screen.now, screen.message_timeout) {
        let bytes = text.as_bytes();
        out.write_all(&bytes[..bytes.len().min(width)])?;
    }
    Ok(())
}

/// Paint the visible slice of one line, splitting out the highlight.
fn draw_row(
    out: &mut impl Write,
    line: &[u8],
    col_offset: usize,
    width: usize,
    highlight: Option<Highlight>,
) -> io::Result<()> {
    let start = col_offset.min(line.len());
    let end = col_offset.saturating_add(width).min(line.len());
    if start == end {
        return Ok(());
    }

    // Highlight bounds intersected with the visible window.
    let inside = highlight
        .map(|h| (h.col.max(start), h.end().min(end)))
        .filter(|(a, b)| a < b);

    match inside {
        Some((a, b)) => {
            out.write_all(&line[start..a])?;
            ansi::inverse(out)?;
            out.write_all(&line[a..b])?;
            ansi::reset(out)?;
            out.write_all(&line[b..end])
        }
        None => out.write_all(&line[start..end]),
    }
}

/// Paint the inverse-video status bar and move to the message line.
fn draw_status_bar(out: &mut impl Write, screen: &Screen<'_>) -> io::Result<()> {
    let view = screen.view;
    let width = view.screen_cols();

    let name = screen.file_name.as_bytes();
    let mut left = Vec::with_capacity(MAX_NAME + 12);
    left.push(b' ');
    left.extend_from_slice(&name[..name.len().min(MAX_NAME)]);
    left.push(b' ');
    if screen.buffer.is_modified() {
        left.extend_from_slice(b"(modified)");
    }

    let right = format!(
        " {}:{} {:>3}% v{} ",
        view.cy() + 1,
        view.cx() + 1,
        percent_through(view.cy(), screen.buffer.line_count()),
        VERSION
    );
    let right = right.as_bytes();

    ansi::inverse(out)?;

    let mut len = left.len().min(width);
    out.write_all(&left[..len])?;

    while len + right.len() < width {
        out.write_all(b" ")?;
        len += 1;
    }
    let room = width - len;
    out.write_all(&right[..right.len().min(room)])?;

    ansi::reset(out)?;
    ansi::newline(out)
}

/// How far through the document the cursor row is, as a percentage.
///
/// 100 for a single-line document; otherwise `(cy + 1) * 100 / count`
/// clamped to `1..=100`.
#[must_use]
pub fn percent_through(cy: usize, count: usize) -> usize {
    if count <= 1 {
        return 100;
    }
    ((cy + 1) * 100 / count).clamp(1, 100)
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
