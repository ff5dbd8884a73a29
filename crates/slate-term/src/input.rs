// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical key events: plain bytes, Ctrl chords,
// Enter/Backspace, and the handful of escape sequences a plain-text editor
// cares about (arrows, Home/End, PageUp/PageDown, Delete).
//
// # Design
//
// Decoding is a small state machine fed one byte at a time:
//
//   Idle ──ESC──▶ SawEscape ──any──▶ Collecting ──A–Z or ~ or 16 bytes──▶ Idle
//     ▲               │                   │
//     └───timeout─────┴──────timeout──────┘
//
// A terminator may never arrive: slow or fragmented links (serial lines,
// some WSL consoles) can split a sequence across reads, and the read
// timeout fires in the middle. On timeout the decoder resolves whatever it
// has collected best-effort and returns to Idle. Anything it cannot
// recognise collapses to a bare Escape. A rare mis-decode is the price of
// never hanging the input loop on a half-sequence.
//
// Columns are single bytes, so `KeyCode::Char` carries a `u8`, not a
// `char`. Bytes >= 0x80 pass through as-is.

use std::io;

use bitflags::bitflags;

use crate::reader::ByteSource;

// ─── Event Types ────────────────────────────────────────────────────────────

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A raw byte. With [`Modifiers::CTRL`] set, the lowercase letter (or
    /// punctuation) of the chord, e.g. `Char(b'q')` for Ctrl-Q.
    Char(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Legacy terminals only encode Ctrl for letters (as the low five bits
    /// of the byte), so that is the only modifier we can report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0100;
    }
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A Ctrl chord on `letter` (case-insensitive).
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter.to_ascii_lowercase()),
            modifiers: Modifiers::CTRL,
        }
    }

    /// True if this is the Ctrl chord for `letter` (case-insensitive).
    #[must_use]
    pub fn is_ctrl(&self, letter: u8) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
            && self.code == KeyCode::Char(letter.to_ascii_lowercase())
    }

    /// The byte to insert if this is a plain printable ASCII key.
    #[must_use]
    pub fn printable(&self) -> Option<u8> {
        match self.code {
            KeyCode::Char(b @ 0x20..=0x7E) if self.modifiers.is_empty() => Some(b),
            _ => None,
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Escape byte (0x1B).
const ESC: u8 = 0x1B;

/// Longest escape-sequence body we collect before giving up.
pub const MAX_SEQUENCE: usize = 16;

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Between keys.
    #[default]
    Idle,
    /// An ESC byte arrived; nothing after it yet.
    SawEscape,
    /// Collecting the body of a CSI (`ESC [`) or SS3 (`ESC O`) sequence.
    Collecting,
}

/// Incremental key decoder.
///
/// Feed bytes with [`feed`](Self::feed) and report elapsed read timeouts
/// with [`timeout`](Self::timeout); or let [`read_key`](Self::read_key)
/// drive both from a [`ByteSource`].
#[derive(Debug, Default)]
pub struct Decoder {
    state: State,
    /// Bytes after the ESC, without the ESC itself.
    seq: Vec<u8>,
}

impl Decoder {
    /// Create a decoder in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            seq: Vec::with_capacity(MAX_SEQUENCE),
        }
    }

    /// Current state (for tests and diagnostics).
    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Block until one logical key event is available.
    ///
    /// Timeouts while idle are absorbed; timeouts in the middle of an
    /// escape sequence resolve it.
    ///
    /// # Errors
    ///
    /// Propagates hard read errors from `src`.
    pub fn read_key(&mut self, src: &mut impl ByteSource) -> io::Result<KeyEvent> {
        loop {
            let event = match src.read_byte()? {
                Some(byte) => self.feed(byte),
                None => self.timeout(),
            };
            if let Some(event) = event {
                return Ok(event);
            }
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns a key event when the byte completes one.
    pub fn feed(&mut self, byte: u8) -> Option<KeyEvent> {
        match self.state {
            State::Idle => {
                if byte == ESC {
                    self.seq.clear();
                    self.state = State::SawEscape;
                    None
                } else {
                    Some(decode_byte(byte))
                }
            }
            State::SawEscape => {
                // The introducer itself ('[' or 'O') never terminates: `O` is
                // in A–Z but SS3 needs its final byte.
                self.seq.push(byte);
                self.state = State::Collecting;
                if byte != b'[' && byte != b'O' && is_terminator(byte) {
                    return Some(self.finish());
                }
                None
            }
            State::Collecting => {
                self.seq.push(byte);
                if is_terminator(byte) || self.seq.len() >= MAX_SEQUENCE {
                    Some(self.finish())
                } else {
                    None
                }
            }
        }
    }

    /// The read timeout elapsed with no new byte.
    ///
    /// Resolves a pending sequence best-effort; does nothing when idle.
    pub fn timeout(&mut self) -> Option<KeyEvent> {
        match self.state {
            State::Idle => None,
            State::SawEscape => {
                self.state = State::Idle;
                Some(KeyEvent::plain(KeyCode::Escape))
            }
            State::Collecting => {
                tracing::debug!(seq = ?self.seq, "escape sequence timed out");
                Some(self.finish())
            }
        }
    }

    /// Decode the collected sequence and return to idle.
    fn finish(&mut self) -> KeyEvent {
        let event = decode_sequence(&self.seq);
        self.seq.clear();
        self.state = State::Idle;
        event
    }
}

// ─── Stateless Decoding ─────────────────────────────────────────────────────

/// Sequence terminators: any uppercase letter or `~`.
const fn is_terminator(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b'~'
}

/// Decode a single byte received outside an escape sequence.
fn decode_byte(byte: u8) -> KeyEvent {
    match byte {
        b'\r' | b'\n' => KeyEvent::plain(KeyCode::Enter),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        b'\t' => KeyEvent::plain(KeyCode::Tab),
        // Ctrl+letter arrives as 0x01..=0x1A; map back to 'a'..='z'.
        0x01..=0x1A => KeyEvent {
            code: KeyCode::Char(byte | 0x60),
            modifiers: Modifiers::CTRL,
        },
        // Ctrl-@, Ctrl-\, Ctrl-], Ctrl-^, Ctrl-_.
        0x00 | 0x1C..=0x1F => KeyEvent {
            code: KeyCode::Char(byte | 0x40),
            modifiers: Modifiers::CTRL,
        },
        _ => KeyEvent::plain(KeyCode::Char(byte)),
    }
}

/// Decode the bytes that followed an ESC.
///
/// Recognised forms:
/// - `[A` `[B` `[C` `[D` (and `O`-prefixed) → arrows
/// - `[H` `[F` (and `O`-prefixed) → Home / End
/// - `[<digits>~` → Home (1, 7), End (4, 8), Delete-as-Backspace (3),
///   PageUp (5), PageDown (6)
///
/// Everything else, including truncated sequences, is a bare Escape.
fn decode_sequence(seq: &[u8]) -> KeyEvent {
    let code = match seq {
        [b'[' | b'O', last] => match last {
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            _ => None,
        },
        [b'[', digits @ .., b'~'] if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) => {
            match parse_number(digits) {
                1 | 7 => Some(KeyCode::Home),
                3 => Some(KeyCode::Backspace),
                4 | 8 => Some(KeyCode::End),
                5 => Some(KeyCode::PageUp),
                6 => Some(KeyCode::PageDown),
                _ => None,
            }
        }
        _ => None,
    };

    KeyEvent::plain(code.unwrap_or(KeyCode::Escape))
}

/// Parse ASCII digits into a u16, saturating on overflow.
fn parse_number(digits: &[u8]) -> u16 {
    digits.iter().fold(0u16, |acc, d| {
        acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
