// SPDX-License-Identifier: MIT
//
// slate-term: terminal layer for the slate editor.
//
// Raw-mode session control, a tolerant escape-sequence decoder, and the
// handful of ANSI writers a full-frame repaint needs. Everything runs on
// one thread: stdin is read with a bounded wait, and that wait doubles as
// the escape-sequence timeout.
//
// No TUI framework sits underneath. Every byte sent to the terminal is
// written by `ansi`, collected in an `OutputBuffer`, and flushed once per
// frame.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
