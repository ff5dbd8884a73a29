// SPDX-License-Identifier: MIT
//
// slate: a small modeless terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   slate-term   → raw mode, key decoding, ANSI output, event loop
//   slate-editor → line buffer, cursor and scrolling, search, rendering, file I/O
//
// The Editor struct implements slate-term's App trait. Each keypress flows
// through:
//
//   stdin → Decoder → on_key → buffer/view/search mutation
//   paint → reconcile_scroll → render → OutputBuffer → one write
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message line                 │  ← 1 row
//   └──────────────────────────────┘

mod editor;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use slate_editor::options::Options;
use slate_term::event_loop::EventLoop;
use slate_term::terminal::{self, Terminal};

use crate::editor::Editor;

#[derive(Parser, Debug)]
#[command(name = "slate")]
#[command(about = "A small modeless terminal text editor", long_about = None)]
#[command(version)]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Append diagnostics to this file (filter with SLATE_LOG)
    #[arg(long, value_name = "PATH", env = "SLATE_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = logging::init(path) {
            eprintln!("slate: cannot open log file {}: {e}", path.display());
            process::exit(1);
        }
    }

    if !terminal::is_tty() {
        eprintln!("slate: standard input is not a terminal");
        process::exit(1);
    }

    let options = Options::default();
    let read_timeout = options.read_timeout_deciseconds;
    let mut editor = Editor::open(args.file, options);

    let terminal = Terminal::new().unwrap_or_else(|e| {
        eprintln!("slate: failed to initialize terminal: {e}");
        process::exit(1);
    });

    let mut event_loop = EventLoop::with_terminal(terminal.with_read_timeout(read_timeout));
    event_loop.run(&mut editor);
}
