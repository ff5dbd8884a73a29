// SPDX-License-Identifier: MIT
//
// Event loop: the single thread that ties the terminal together.
//
// One iteration: block (with the terminal's bounded wait) until the decoder
// yields a key, hand it to the application, re-measure the terminal, and
// repaint if the application asked for it or the size changed. There is no
// background reader, no channel, and no tick: the only suspension point is
// the bounded read inside the decoder, and a lone ESC resolves on the first
// read timeout after it.
//
// Every frame is painted in full into an OutputBuffer and reaches the
// terminal in a single write.
//
// Resize detection is poll-based: the size is re-measured after every key.
// A resize while the user is idle shows up on the next keystroke.

use std::io::{self, Write};

use crate::ansi;
use crate::input::{Decoder, KeyEvent};
use crate::output::OutputBuffer;
use crate::reader::{ByteSource, Pushback, StdinSource};
use crate::terminal::{Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running; the screen did not change.
    Continue,
    /// Keep running and repaint the frame.
    Repaint,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// The loop calls [`on_resize`](App::on_resize) once with the starting size
/// before the first frame, then for each key: [`on_key`](App::on_key),
/// `on_resize` if the terminal changed size, and [`paint`](App::paint) if a
/// repaint is due.
pub trait App {
    /// Handle one decoded key.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// Handle a terminal size change.
    fn on_resize(&mut self, _size: Size) {}

    /// Write one complete frame, including the final cursor placement.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()>;
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Run the key → dispatch → measure → paint cycle until the app quits.
///
/// `measure` is called after every key with the byte source and returns
/// the current terminal size. It may queue bytes back on the source for the
/// decoder. Frames are flushed to `sink`.
///
/// # Errors
///
/// Returns hard read errors from `source` and write errors on `sink`.
pub fn drive<A, S, W, M>(
    app: &mut A,
    source: &mut S,
    sink: &mut W,
    initial: Size,
    mut measure: M,
) -> io::Result<()>
where
    A: App + ?Sized,
    S: ByteSource,
    W: Write,
    M: FnMut(&mut S) -> Size,
{
    let mut decoder = Decoder::new();
    let mut out = OutputBuffer::new();
    let mut size = initial;

    app.on_resize(size);
    paint(app, &mut out, sink)?;

    loop {
        let key = decoder.read_key(source)?;

        let mut repaint = match app.on_key(key) {
            Action::Quit => return Ok(()),
            Action::Repaint => true,
            Action::Continue => false,
        };

        let now = measure(source);
        if now != size {
            tracing::debug!(from = ?size, to = ?now, "terminal resized");
            size = now;
            app.on_resize(size);
            repaint = true;
        }

        if repaint {
            paint(app, &mut out, sink)?;
        }
    }
}

/// Paint one frame and write it in a single flush.
fn paint<A: App + ?Sized>(app: &mut A, out: &mut OutputBuffer, sink: &mut impl Write) -> io::Result<()> {
    out.clear();
    app.paint(out)?;
    out.flush_to(sink)
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal and the stdin byte source. Call [`run`](Self::run) to
/// enter the loop. It returns when the application signals
/// [`Action::Quit`]; a hard input or output error ends the process through
/// [`Terminal::fatal`].
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use slate_term::event_loop::{Action, App, EventLoop};
/// use slate_term::terminal::Terminal;
/// use slate_term::input::KeyEvent;
/// use slate_term::output::OutputBuffer;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, _out: &mut OutputBuffer) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let mut event_loop = EventLoop::with_terminal(Terminal::new()?);
/// event_loop.run(&mut MyApp);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    source: Pushback<StdinSource>,
}

impl EventLoop {
    /// Create an event loop around a configured terminal handle.
    #[must_use]
    pub const fn with_terminal(terminal: Terminal) -> Self {
        Self {
            terminal,
            source: Pushback::new(StdinSource::new()),
        }
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// Enters raw mode, runs the loop, then clears the screen and restores
    /// the terminal. Any terminal failure along the way is fatal.
    pub fn run(&mut self, app: &mut impl App) {
        if let Err(e) = self.terminal.enter() {
            self.terminal.fatal(format_args!("cannot enter raw mode: {e}"));
        }

        let initial = self.terminal.refresh_size(&mut self.source);
        let result = {
            let terminal = &mut self.terminal;
            let mut stdout = io::stdout();
            drive(app, &mut self.source, &mut stdout, initial, |source| {
                terminal.refresh_size(source)
            })
        };

        if let Err(e) = result {
            self.terminal.fatal(format_args!("terminal I/O failed: {e}"));
        }

        let mut stdout = io::stdout().lock();
        let cleared = ansi::clear_screen(&mut stdout)
            .and_then(|()| ansi::cursor_home(&mut stdout))
            .and_then(|()| stdout.flush());
        drop(stdout);

        if let Err(e) = cleared.and_then(|()| self.terminal.restore()) {
            self.terminal.fatal(format_args!("cannot restore terminal: {e}"));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
