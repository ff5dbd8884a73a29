// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources: where the input decoder gets its bytes from.
//
// The editor is single-threaded: there is no background reader and no
// channel. The terminal session configures stdin with VMIN=0 / VTIME=1,
// so a read() returns after at most ~100ms, with zero bytes if nothing
// arrived. That bounded wait is the only suspension point in the program
// and doubles as the escape-sequence timeout.
//
// The `ByteSource` trait lets the decoder run against a scripted byte
// stream in tests, including scripted timeouts in the middle of an
// escape sequence.

use std::collections::VecDeque;
use std::io;

/// A blocking-with-timeout source of raw input bytes.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(Some(byte))` when a byte arrived, `Ok(None)` when the
    /// bounded wait elapsed with nothing to read.
    ///
    /// # Errors
    ///
    /// A hard read error (anything other than a timeout or an interrupted
    /// call). The caller treats this as fatal.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

// ─── Stdin ──────────────────────────────────────────────────────────────────

/// Reads single bytes from the process's stdin file descriptor.
///
/// Relies on the termios settings applied by
/// [`Terminal::enter`](crate::terminal::Terminal::enter) for its timeout.
#[derive(Debug, Default)]
pub struct StdinSource;

impl StdinSource {
    /// Create a stdin byte source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                (&raw mut byte).cast::<libc::c_void>(),
                1,
            )
        };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ─── Scripted ───────────────────────────────────────────────────────────────

/// A byte source that replays a fixed script.
///
/// Each step is either a byte or a timeout (`None`). Once the script is
/// exhausted every read fails with [`io::ErrorKind::UnexpectedEof`], so a
/// caller that keeps waiting for input terminates instead of spinning.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    steps: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    /// A script that delivers `bytes` back-to-back with no timeouts.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            steps: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Append bytes to the script.
    #[must_use]
    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.steps.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append one elapsed read timeout to the script.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.steps.push_back(None);
        self
    }

    /// Number of steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.steps
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

// ─── Pushback ───────────────────────────────────────────────────────────────

/// A byte source with a queue of bytes to replay before reading more.
///
/// The cursor-report size probe reads the inner source directly. Keys the
/// user typed before the report arrived are handed back with
/// [`unread`](Self::unread), so the decoder still sees them, in order.
#[derive(Debug, Default)]
pub struct Pushback<S> {
    inner: S,
    pending: VecDeque<u8>,
}

impl<S> Pushback<S> {
    /// Wrap `inner` with an empty replay queue.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
        }
    }

    /// Queue `bytes` behind any bytes already waiting to be replayed.
    pub fn unread(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Number of bytes waiting to be replayed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The wrapped source, bypassing the replay queue.
    pub const fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: ByteSource> ByteSource for Pushback<S> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Some(byte));
        }
        self.inner.read_byte()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
