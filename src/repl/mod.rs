//! # Line Editing Core
//!
//! Everything needed to read one line from a terminal with in-place
//! editing and horizontal scrolling.
//!
//! - `text`: display widths and column layout
//! - `models`: the edit buffer and its viewport
//! - `commands`: key operations and the keymap
//! - `editor`: one editing session running operations against the buffer
//! - `controllers`: the read loop feeding events to the editor
//! - `io` / `services`: terminal, clipboard, history and completion ports

pub mod commands;
pub mod controllers;
pub mod editor;
pub mod io;
pub mod models;
pub mod services;
pub mod text;

pub use commands::{KeyBinding, KeyOperation, Keymap, Signal};
pub use controllers::{LineReader, ReadOutcome};
pub use editor::{sanitize_paste, EditorPorts, LineEditor};
pub use io::{
    CrosstermTerminal, EventStream, MockEventStream, MockTerminal, TerminalCommand,
    TerminalEventStream, TerminalPort,
};
pub use models::{EditBuffer, MIN_VIEW_WIDTH};
pub use services::{
    common_prefix, open_clipboard, ClipboardPort, Completer, FileCompleter, History,
    HistorySource, MemoryClipboard, SystemClipboard, DEFAULT_MAX_ENTRIES,
};
pub use text::{parse_codepoint, print_columns, strip_ansi, WidthTable};
