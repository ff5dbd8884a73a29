// SPDX-License-Identifier: MIT
//
// Editor controller: owns the whole session and implements the event loop's
// App trait.
//
// One key in, one dispatch out:
//
//   prompt open?  → Prompt::handle → find / cancel / keep typing
//   Ctrl-Q        → two-stage quit while the document is dirty
//   Ctrl-S/F/N    → save / open find prompt / repeat find
//   navigation    → View::move_cursor
//   Enter/BS/text → LineBuffer edit, then View::place
//
// Every edit and every non-page motion clears the search highlight. Every
// key except Ctrl-Q re-arms the quit confirmation. Scroll offsets are
// reconciled once per frame, right before the renderer reads them.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use slate_editor::buffer::{Line, LineBuffer};
use slate_editor::file;
use slate_editor::options::Options;
use slate_editor::render::{self, Screen};
use slate_editor::search::{Highlight, Prompt, PromptEvent, SearchState};
use slate_editor::status::StatusMessage;
use slate_editor::view::{Motion, View};

use slate_term::event_loop::{Action, App};
use slate_term::input::{KeyCode, KeyEvent};
use slate_term::output::OutputBuffer;
use slate_term::terminal::Size;

/// Shown on the message line at startup.
pub const HELP: &str =
    "HELP: type | Enter | Backspace | Ctrl-S save | Ctrl-F find | Ctrl-N next | Ctrl-Q quit";

const QUIT_WARNING: &str = "Unsaved changes - press Ctrl-Q again to quit";

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editing session: document, cursor, search, and messages.
pub struct Editor {
    buffer: LineBuffer,
    view: View,

    /// Last query and match, for Ctrl-N.
    search: SearchState,

    /// Find prompt. While `Some`, every key goes to it and its input owns
    /// the message line.
    prompt: Option<Prompt>,

    /// The match currently painted in inverse video.
    highlight: Option<Highlight>,

    status: StatusMessage,

    /// Save target. Also the displayed name.
    path: PathBuf,
    file_name: String,

    /// Quit presses still needed before a dirty document is abandoned.
    quit_remaining: u8,

    options: Options,
}

impl Editor {
    /// Open `path`, or an untitled document when there is none.
    ///
    /// A missing file starts an empty document under that name. Any other
    /// read failure does the same but reports the reason on the message
    /// line.
    pub fn open(path: Option<PathBuf>, options: Options) -> Self {
        let path = path.unwrap_or_else(|| PathBuf::from(&options.untitled_name));
        let now = Instant::now();

        let mut status = StatusMessage::new();
        status.set(HELP, now);

        let buffer = match file::load(&path) {
            Ok(Some(lines)) => LineBuffer::from_lines(lines),
            Ok(None) => LineBuffer::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cannot open; starting empty");
                status.set(format!("Open failed: {}", e.reason()), now);
                LineBuffer::new()
            }
        };

        let view = View::for_terminal(Size::FALLBACK).with_page_overlap(options.page_overlap);

        Self {
            buffer,
            view,
            search: SearchState::new(),
            prompt: None,
            highlight: None,
            status,
            file_name: path.display().to_string(),
            path,
            quit_remaining: options.quit_confirmations,
            options,
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.status.set(text, Instant::now());
    }

    // ─── Dispatch ───────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl(b's') {
            self.save();
            return Action::Repaint;
        }
        if key.is_ctrl(b'f') {
            self.prompt = Some(Prompt::new());
            return Action::Repaint;
        }
        if key.is_ctrl(b'n') {
            self.find_next();
            return Action::Repaint;
        }
        if let Some(byte) = key.printable() {
            self.insert(byte);
            return Action::Repaint;
        }

        match key.code {
            KeyCode::PageUp => self.view.move_cursor(&mut self.buffer, Motion::PageUp),
            KeyCode::PageDown => self.view.move_cursor(&mut self.buffer, Motion::PageDown),
            KeyCode::Up => self.move_cursor(Motion::Up),
            KeyCode::Down => self.move_cursor(Motion::Down),
            KeyCode::Left => self.move_cursor(Motion::Left),
            KeyCode::Right => self.move_cursor(Motion::Right),
            KeyCode::Home => self.move_cursor(Motion::Home),
            KeyCode::End => self.move_cursor(Motion::End),
            KeyCode::Enter => self.newline(),
            KeyCode::Backspace => self.backspace(),
            _ => return Action::Continue,
        }
        Action::Repaint
    }

    fn request_quit(&mut self) -> Action {
        if self.buffer.is_modified() && self.quit_remaining > 0 {
            self.quit_remaining -= 1;
            tracing::debug!(remaining = self.quit_remaining, "quit blocked by unsaved changes");
            self.notify(QUIT_WARNING);
            return Action::Repaint;
        }
        tracing::info!(path = %self.path.display(), "quit");
        Action::Quit
    }

    // ─── Editing ────────────────────────────────────────────────────────

    fn move_cursor(&mut self, motion: Motion) {
        self.view.move_cursor(&mut self.buffer, motion);
        self.highlight = None;
    }

    fn insert(&mut self, byte: u8) {
        let (cy, cx) = (self.view.cy(), self.view.cx());
        self.buffer.insert_char(cy, cx, byte);
        self.view.place(&self.buffer, cy, cx + 1);
        self.highlight = None;
    }

    fn newline(&mut self) {
        let (cy, cx) = (self.view.cy(), self.view.cx());
        self.buffer.split_line(cy, cx);
        self.view.place(&self.buffer, cy + 1, 0);
        self.highlight = None;
    }

    /// Delete the byte before the cursor, or join with the previous line
    /// at column 0.
    fn backspace(&mut self) {
        let (cy, cx) = (self.view.cy(), self.view.cx());
        if cx > 0 {
            self.buffer.delete_char(cy, cx);
            self.view.place(&self.buffer, cy, cx - 1);
        } else if cy > 0 {
            let joint = self.buffer.line_len(cy - 1);
            self.buffer.join_with_previous(cy);
            self.view.place(&self.buffer, cy - 1, joint);
        }
        self.highlight = None;
    }

    fn save(&mut self) {
        let lines = self.buffer.lines().map(Line::as_bytes);
        match file::save_atomic(&self.path, lines) {
            Ok(()) => {
                self.buffer.mark_saved();
                let text = format!("Saved: {}", self.file_name);
                self.notify(text);
            }
            Err(e) => self.notify(format!("Save failed: {}", e.reason())),
        }
    }

    // ─── Search ─────────────────────────────────────────────────────────

    fn handle_prompt(&mut self, key: KeyEvent) -> Action {
        let Some(prompt) = self.prompt.as_mut() else {
            return Action::Continue;
        };

        match prompt.handle(key) {
            PromptEvent::Edited => {}
            PromptEvent::Cancelled => {
                self.prompt = None;
                self.highlight = None;
                self.notify("Canceled");
            }
            PromptEvent::Submitted(query) => {
                self.prompt = None;
                self.find(&query);
            }
            PromptEvent::Ignored => return Action::Continue,
        }
        Action::Repaint
    }

    /// Search from the cursor. A miss leaves cursor and highlight alone.
    fn find(&mut self, query: &[u8]) {
        let shown = lossy(query).into_owned();
        if let Some(hl) = self.search.find(query, &self.buffer, &mut self.view) {
            self.highlight = Some(hl);
            self.notify(format!("Found: {shown}  (Ctrl-N for next)"));
        } else {
            tracing::debug!(query = %shown, "not found");
            self.notify(format!("Not found: {shown}"));
        }
    }

    /// Repeat the last query. A miss leaves cursor and highlight alone.
    fn find_next(&mut self) {
        if let Some(hl) = self.search.find_next(&self.buffer, &mut self.view) {
            self.highlight = Some(hl);
        } else {
            let text = format!("No more matches for: {}", lossy(self.search.query()));
            self.notify(text);
        }
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

// ─── App ────────────────────────────────────────────────────────────────────

impl App for Editor {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        if self.prompt.is_some() {
            self.quit_remaining = self.options.quit_confirmations;
            return self.handle_prompt(key);
        }
        if key.is_ctrl(b'q') {
            return self.request_quit();
        }
        self.quit_remaining = self.options.quit_confirmations;
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        if self.view.resize(size) {
            tracing::debug!(cols = size.cols, rows = size.rows, "resized");
        }
    }

    fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
        self.view.reconcile_scroll();
        let screen = Screen {
            buffer: &self.buffer,
            view: &self.view,
            highlight: self.highlight,
            file_name: &self.file_name,
            status: &self.status,
            prompt: self.prompt.as_ref().map(Prompt::input),
            message_timeout: self.options.message_timeout,
            now: Instant::now(),
        };
        render::render(out, &screen)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    // ── Helpers ─────────────────────────────────────────────────────────

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn ctrl(letter: u8) -> KeyEvent {
        KeyEvent::ctrl(letter)
    }

    fn type_str(ed: &mut Editor, text: &str) {
        for byte in text.bytes() {
            ed.on_key(key(KeyCode::Char(byte)));
        }
    }

    /// An editor on a path inside `dir` that does not exist yet.
    fn fresh(dir: &Path) -> Editor {
        Editor::open(Some(dir.join("doc.txt")), Options::default())
    }

    fn with_text(dir: &Path, text: &str) -> Editor {
        let path = dir.join("doc.txt");
        fs::write(&path, text).unwrap();
        Editor::open(Some(path), Options::default())
    }

    fn lines(ed: &Editor) -> Vec<String> {
        ed.buffer
            .lines()
            .map(|l| String::from_utf8_lossy(l.as_bytes()).into_owned())
            .collect()
    }

    fn cursor(ed: &Editor) -> (usize, usize) {
        (ed.view.cy(), ed.view.cx())
    }

    /// The last line of a freshly painted frame.
    fn message_line(ed: &mut Editor) -> String {
        let mut out = OutputBuffer::new();
        ed.paint(&mut out).unwrap();
        let frame = String::from_utf8_lossy(out.as_bytes()).into_owned();
        let start = frame.rfind("\x1b[2K\r").unwrap() + 5;
        frame[start..].to_owned()
    }

    fn assert_cursor_in_bounds(ed: &Editor) {
        let (cy, cx) = cursor(ed);
        assert!(cy < ed.buffer.line_count(), "row {cy} past {}", ed.buffer.line_count());
        assert!(cx <= ed.buffer.line_len(cy), "col {cx} past {}", ed.buffer.line_len(cy));
    }

    fn find(ed: &mut Editor, query: &str) {
        ed.on_key(ctrl(b'f'));
        type_str(ed, query);
        ed.on_key(key(KeyCode::Enter));
    }

    // ── Startup ─────────────────────────────────────────────────────────

    #[test]
    fn starts_with_help_and_clean_document() {
        let dir = tempfile::tempdir().unwrap();
        let ed = fresh(dir.path());
        assert_eq!(ed.status.text(), HELP);
        assert_eq!(lines(&ed), vec![""]);
        assert!(!ed.buffer.is_modified());
        assert!(ed.file_name.ends_with("doc.txt"));
    }

    #[test]
    fn untitled_when_no_path() {
        let ed = Editor::open(None, Options::default());
        assert_eq!(ed.file_name, "untitled.txt");
        assert_eq!(ed.path, PathBuf::from("untitled.txt"));
    }

    #[test]
    fn unreadable_path_reports_and_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ed = Editor::open(Some(dir.path().to_path_buf()), Options::default());
        assert!(ed.status.text().starts_with("Open failed: "));
        assert_eq!(lines(&ed), vec![""]);
    }

    // ── Editing ─────────────────────────────────────────────────────────

    #[test]
    fn hello_world_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());

        type_str(&mut ed, "hello");
        ed.on_key(key(KeyCode::Enter));
        type_str(&mut ed, "world");
        assert_eq!(lines(&ed), vec!["hello", "world"]);
        assert!(ed.buffer.is_modified());

        assert_eq!(ed.on_key(ctrl(b's')), Action::Repaint);
        assert!(!ed.buffer.is_modified());
        assert!(ed.status.text().starts_with("Saved: "));
        assert_eq!(fs::read(dir.path().join("doc.txt")).unwrap(), b"hello\nworld\n");

        let reloaded = Editor::open(Some(dir.path().join("doc.txt")), Options::default());
        assert_eq!(lines(&reloaded), vec!["hello", "world"]);
        assert!(!reloaded.buffer.is_modified());
    }

    #[test]
    fn save_failure_keeps_document_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = Editor::open(Some(dir.path().join("missing/doc.txt")), Options::default());
        type_str(&mut ed, "x");
        ed.on_key(ctrl(b's'));
        assert!(ed.status.text().starts_with("Save failed: "));
        assert!(ed.buffer.is_modified());
    }

    #[test]
    fn insert_advances_cursor_and_sets_preferred_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        type_str(&mut ed, "abc");
        assert_eq!(cursor(&ed), (0, 3));
        assert_eq!(ed.view.preferred_column(), 3);
    }

    #[test]
    fn enter_splits_at_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "hello world\n");
        for _ in 0..5 {
            ed.on_key(key(KeyCode::Right));
        }
        ed.on_key(key(KeyCode::Enter));
        assert_eq!(lines(&ed), vec!["hello", " world"]);
        assert_eq!(cursor(&ed), (1, 0));
    }

    #[test]
    fn backspace_deletes_then_joins() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "ab\ncd\n");
        ed.on_key(key(KeyCode::Down));
        ed.on_key(key(KeyCode::Right));

        ed.on_key(key(KeyCode::Backspace));
        assert_eq!(lines(&ed), vec!["ab", "d"]);
        assert_eq!(cursor(&ed), (1, 0));

        ed.on_key(key(KeyCode::Backspace));
        assert_eq!(lines(&ed), vec!["abd"]);
        assert_eq!(cursor(&ed), (0, 2));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "x\n");
        ed.on_key(key(KeyCode::Backspace));
        assert_eq!(lines(&ed), vec!["x"]);
        assert!(!ed.buffer.is_modified());
    }

    #[test]
    fn unknown_keys_do_not_repaint() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        assert_eq!(ed.on_key(key(KeyCode::Tab)), Action::Continue);
        assert_eq!(ed.on_key(key(KeyCode::Escape)), Action::Continue);
        assert_eq!(ed.on_key(ctrl(b'x')), Action::Continue);
        assert_eq!(ed.on_key(key(KeyCode::Char(0xC3))), Action::Continue);
        assert_eq!(lines(&ed), vec![""]);
    }

    // ── Quit ────────────────────────────────────────────────────────────

    #[test]
    fn quit_when_clean_is_immediate() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn quit_when_dirty_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        type_str(&mut ed, "x");

        assert_eq!(ed.on_key(ctrl(b'q')), Action::Repaint);
        assert_eq!(ed.status.text(), QUIT_WARNING);
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn other_key_rearms_quit_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        type_str(&mut ed, "x");

        assert_eq!(ed.on_key(ctrl(b'q')), Action::Repaint);
        ed.on_key(key(KeyCode::Left));
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Repaint);
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn quit_after_save_is_immediate() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        type_str(&mut ed, "x");
        ed.on_key(ctrl(b's'));
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Quit);
    }

    // ── Search ──────────────────────────────────────────────────────────

    #[test]
    fn find_moves_cursor_and_highlights() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "alpha\nbeta gamma\n");
        find(&mut ed, "gamma");

        assert_eq!(cursor(&ed), (1, 5));
        assert_eq!(ed.highlight, Some(Highlight { row: 1, col: 5, len: 5 }));
        assert_eq!(ed.status.text(), "Found: gamma  (Ctrl-N for next)");
        assert!(ed.prompt.is_none());
    }

    #[test]
    fn prompt_echoes_input_and_swallows_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "abc\n");
        ed.on_key(ctrl(b'f'));
        assert!(message_line(&mut ed).starts_with('/'));
        type_str(&mut ed, "ab");
        assert!(message_line(&mut ed).starts_with("/ab"));
        ed.on_key(key(KeyCode::Backspace));
        assert_eq!(ed.prompt.as_ref().map(Prompt::input), Some(b"a".as_slice()));

        // Ctrl-Q and arrows mean nothing inside the prompt.
        assert_eq!(ed.on_key(ctrl(b'q')), Action::Continue);
        assert_eq!(ed.on_key(key(KeyCode::Down)), Action::Continue);
        assert_eq!(lines(&ed), vec!["abc"]);
        assert!(ed.prompt.is_some());
    }

    #[test]
    fn prompt_stays_on_screen_after_message_expires() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "abc\n");
        ed.options.message_timeout = Duration::ZERO;
        ed.on_key(ctrl(b'f'));
        type_str(&mut ed, "bc");
        assert!(message_line(&mut ed).starts_with("/bc"));
    }

    #[test]
    fn empty_enter_keeps_prompt_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = fresh(dir.path());
        ed.on_key(ctrl(b'f'));
        assert_eq!(ed.on_key(key(KeyCode::Enter)), Action::Continue);
        assert!(ed.prompt.is_some());
    }

    #[test]
    fn escape_cancels_and_clears_highlight() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "needle\n");
        find(&mut ed, "needle");
        assert!(ed.highlight.is_some());

        ed.on_key(ctrl(b'f'));
        type_str(&mut ed, "zz");
        ed.on_key(key(KeyCode::Escape));
        assert!(ed.prompt.is_none());
        assert!(ed.highlight.is_none());
        assert_eq!(ed.status.text(), "Canceled");
    }

    #[test]
    fn not_found_keeps_highlight_and_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "one\ntwo\n");
        find(&mut ed, "two");
        let at = cursor(&ed);
        let hl = ed.highlight;
        assert!(hl.is_some());

        find(&mut ed, "zzz");
        assert_eq!(ed.status.text(), "Not found: zzz");
        assert_eq!(ed.highlight, hl);
        assert_eq!(cursor(&ed), at);
    }

    #[test]
    fn find_next_wraps_to_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "x here\nnothing\ny here\n");
        find(&mut ed, "here");
        assert_eq!(cursor(&ed), (0, 2));

        ed.on_key(ctrl(b'n'));
        assert_eq!(cursor(&ed), (2, 2));
        ed.on_key(ctrl(b'n'));
        assert_eq!(cursor(&ed), (0, 2));
        assert_eq!(ed.highlight, Some(Highlight { row: 0, col: 2, len: 4 }));
    }

    #[test]
    fn find_next_without_query_reports_no_more() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "abc\n");
        ed.on_key(ctrl(b'n'));
        assert_eq!(ed.status.text(), "No more matches for: ");
        assert_eq!(cursor(&ed), (0, 0));
    }

    #[test]
    fn movement_clears_highlight_but_paging_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "a\nb\nmatch\nc\n");
        find(&mut ed, "match");

        ed.on_key(key(KeyCode::PageDown));
        assert!(ed.highlight.is_some());
        ed.on_key(key(KeyCode::PageUp));
        assert!(ed.highlight.is_some());

        ed.on_key(key(KeyCode::Right));
        assert!(ed.highlight.is_none());
    }

    #[test]
    fn edit_clears_highlight() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "match\n");
        find(&mut ed, "match");
        type_str(&mut ed, "!");
        assert!(ed.highlight.is_none());
        assert_eq!(lines(&ed), vec!["!match"]);
    }

    // ── Viewport ────────────────────────────────────────────────────────

    #[test]
    fn resize_and_paint_scrolls_to_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let mut ed = with_text(dir.path(), &text);
        ed.on_resize(Size { cols: 40, rows: 22 });
        assert_eq!(ed.view.screen_rows(), 20);

        for _ in 0..45 {
            ed.on_key(key(KeyCode::Down));
        }
        let mut out = OutputBuffer::new();
        ed.paint(&mut out).unwrap();

        assert_eq!(ed.view.row_offset(), 26);
        let frame = String::from_utf8_lossy(out.as_bytes()).into_owned();
        assert!(frame.contains("line 45"));
        assert!(!frame.contains("line 25\r"));
    }

    #[test]
    fn cursor_stays_in_bounds_through_edits_and_motions() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "first line\n\nthird\n");
        let script = [
            key(KeyCode::End),
            key(KeyCode::Char(b'!')),
            key(KeyCode::Enter),
            key(KeyCode::Enter),
            key(KeyCode::Backspace),
            key(KeyCode::Backspace),
            key(KeyCode::Down),
            key(KeyCode::Down),
            key(KeyCode::Char(b'x')),
            key(KeyCode::Home),
            key(KeyCode::Backspace),
            key(KeyCode::Backspace),
            key(KeyCode::Up),
            key(KeyCode::End),
            key(KeyCode::Right),
            key(KeyCode::Right),
            key(KeyCode::Enter),
            key(KeyCode::PageDown),
            key(KeyCode::Left),
            key(KeyCode::Left),
            key(KeyCode::Backspace),
            key(KeyCode::PageUp),
            key(KeyCode::Backspace),
            key(KeyCode::Down),
            key(KeyCode::Down),
            key(KeyCode::Down),
            key(KeyCode::Backspace),
        ];
        for k in script {
            ed.on_key(k);
            assert_cursor_in_bounds(&ed);
        }
        assert!(ed.buffer.is_modified());
    }

    #[test]
    fn down_past_last_line_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = with_text(dir.path(), "only\n");
        ed.on_key(key(KeyCode::Down));
        assert_eq!(lines(&ed), vec!["only", ""]);
        assert_eq!(cursor(&ed), (1, 0));
    }
}
