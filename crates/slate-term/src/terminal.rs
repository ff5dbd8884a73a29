// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, size queries, RAII cleanup, and the fatal
// exit path.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// The session captures the terminal discipline exactly once and puts stdin
// into a raw, bounded-wait mode: no echo, no line buffering, no signal
// characters, no output translation, and VMIN=0 / VTIME=n so a read returns
// after at most n tenths of a second. That bounded read is what lets the
// input decoder resolve a lone ESC without a second thread.
//
// Restoring is guaranteed on every exit path we control: `restore()` on a
// normal quit, `Drop` when the handle goes away, `fatal()` for hard
// errors, and a panic hook for everything else. The panic hook writes a
// pre-built restore sequence straight to fd 1, bypassing the stdout lock
// in case the panic happened mid-frame while the lock was held.
//
// We do not switch to the alternate screen. The editor clears the screen on
// entry and on exit, so the user's shell comes back to a blank terminal.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::reader::{ByteSource, Pushback};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Size assumed when the terminal cannot be measured at all.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Cursor-Report Fallback ─────────────────────────────────────────────────

/// Longest cursor-position reply we are willing to read.
const MAX_REPORT: usize = 32;

/// Most bytes one probe reads, report and typed keys together.
const MAX_PROBE_READ: usize = 64;

const ESC: u8 = 0x1b;

/// What a cursor-report probe read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorReport {
    /// The measured size, if a well-formed report arrived.
    pub size: Option<Size>,
    /// Bytes that were not part of the report (keys typed meanwhile), in
    /// arrival order.
    pub stray: Vec<u8>,
}

/// Measure the terminal by parking the cursor in the far corner and asking
/// where it ended up.
///
/// Used only when `TIOCGWINSZ` fails. The cursor position is saved and
/// restored around the probe. Reading stops at the first well-formed
/// report, at a read timeout, or after [`MAX_PROBE_READ`] bytes. Anything
/// read that is not the report comes back in [`CursorReport::stray`] so
/// the caller can feed it to the decoder.
///
/// # Errors
///
/// Propagates write errors on `out` and hard read errors from `src`.
pub fn query_size_by_cursor_report(
    src: &mut impl ByteSource,
    out: &mut impl Write,
) -> io::Result<CursorReport> {
    ansi::save_cursor(out)?;
    ansi::cursor_to_far_corner(out)?;
    ansi::request_cursor_position(out)?;
    out.flush()?;

    let mut report = CursorReport::default();
    let mut reply = Vec::with_capacity(MAX_REPORT);

    for _ in 0..MAX_PROBE_READ {
        let Some(byte) = src.read_byte()? else {
            break;
        };

        if byte == ESC {
            report.stray.append(&mut reply);
            reply.push(byte);
            continue;
        }
        if reply.is_empty() {
            report.stray.push(byte);
            continue;
        }

        let fits = if reply.len() == 1 {
            byte == b'['
        } else {
            reply.len() < MAX_REPORT && (byte.is_ascii_digit() || byte == b';' || byte == b'R')
        };
        if !fits {
            report.stray.append(&mut reply);
            report.stray.push(byte);
            continue;
        }

        reply.push(byte);
        if byte == b'R' {
            report.size = parse_cursor_report(&reply);
            if report.size.is_some() {
                reply.clear();
                break;
            }
            report.stray.append(&mut reply);
        }
    }
    report.stray.append(&mut reply);

    ansi::restore_cursor(out)?;
    out.flush()?;

    Ok(report)
}

/// Parse a cursor-position report `ESC [ rows ; cols R`.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?.strip_suffix(b"R")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;

    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup lets the hook restore the discipline
/// without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Terminal restore sequence for emergency use.
///
/// Reset SGR attributes, show the cursor, clear the screen, home the
/// cursor, so the panic message lands on a clean, usable terminal.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[m\
    \x1b[?25h\
    \x1b[2J\
    \x1b[H";

/// Panic hook guard: the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Default bounded read wait, in tenths of a second.
pub const DEFAULT_READ_TIMEOUT: u8 = 1;

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to switch to raw mode. The terminal is
/// restored when [`restore`](Self::restore) is called, when the handle is
/// dropped, on [`fatal`](Self::fatal), and on panic.
///
/// # Example
///
/// ```no_run
/// use slate_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// // ... read keys, paint frames ...
/// term.restore()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Last known terminal size.
    size: Size,

    /// VTIME value applied on enter (tenths of a second).
    read_timeout: u8,

    /// Whether raw mode is in effect.
    active: bool,

    /// Cleared once the terminal fails to answer a cursor-report probe.
    report_fallback: bool,
}

impl Terminal {
    /// Create a terminal handle and query the current size.
    ///
    /// Does **not** enter raw mode. Falls back to 80×24 if the size cannot
    /// be determined (e.g., in tests or piped environments).
    ///
    /// # Errors
    ///
    /// Currently infallible, but returns `Result` so platform setup can
    /// fail here rather than on first use.
    pub fn new() -> io::Result<Self> {
        let size = get_size().unwrap_or(Size::FALLBACK);

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            read_timeout: DEFAULT_READ_TIMEOUT,
            active: false,
            report_fallback: true,
        })
    }

    /// Set the bounded read wait (tenths of a second, minimum 1).
    ///
    /// Takes effect on the next [`enter`](Self::enter).
    #[must_use]
    pub fn with_read_timeout(mut self, deciseconds: u8) -> Self {
        self.read_timeout = deciseconds.max(1);
        self
    }

    /// Last known terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Whether raw mode is in effect.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Re-measure the terminal and cache the result.
    ///
    /// Tries `TIOCGWINSZ` first. While active, falls back to a
    /// cursor-position report read from `input`'s underlying source; keys
    /// typed meanwhile are queued back on `input`. A terminal that does not
    /// answer is not asked again. If nothing works the previous size is
    /// kept.
    pub fn refresh_size<S: ByteSource>(&mut self, input: &mut Pushback<S>) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
            return size;
        }

        if self.active && self.report_fallback {
            let mut stdout = io::stdout().lock();
            let report = query_size_by_cursor_report(input.inner_mut(), &mut stdout);
            drop(stdout);
            self.absorb_report(report, input);
        }

        self.size
    }

    /// Apply the outcome of a cursor-report probe.
    fn absorb_report<S>(&mut self, report: io::Result<CursorReport>, input: &mut Pushback<S>) {
        match report {
            Ok(report) => {
                input.unread(&report.stray);
                if let Some(size) = report.size {
                    self.size = size;
                } else {
                    tracing::debug!("no cursor report; keeping previous size from now on");
                    self.report_fallback = false;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "cursor report failed; keeping previous size from now on");
                self.report_fallback = false;
            }
        }
    }

    /// Enter raw mode.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal discipline cannot be read or set.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let mut stdout = io::stdout().lock();
        ansi::clear_screen(&mut stdout)?;
        ansi::cursor_home(&mut stdout)?;
        stdout.flush()?;

        self.active = true;
        tracing::debug!(size = ?self.size, "terminal entered raw mode");
        Ok(())
    }

    /// Reinstate the captured terminal discipline.
    ///
    /// Resets attributes and shows the cursor first. Idempotent: calling
    /// `restore()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        ansi::reset(&mut stdout)?;
        ansi::cursor_show(&mut stdout)?;
        stdout.flush()?;
        drop(stdout);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    /// Clear the screen, restore the terminal, report `message` on stderr,
    /// and exit with status 1.
    pub fn fatal(&mut self, message: impl fmt::Display) -> ! {
        tracing::error!(%message, "fatal error");

        let mut stdout = io::stdout().lock();
        let _ = ansi::clear_screen(&mut stdout);
        let _ = ansi::cursor_home(&mut stdout);
        let _ = stdout.flush();
        drop(stdout);

        let _ = self.restore();
        eprintln!("{message}");
        std::process::exit(1);
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=n: read() returns after at most n/10 s, with
            // zero bytes if nothing arrived.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = self.read_timeout;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.restore();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
