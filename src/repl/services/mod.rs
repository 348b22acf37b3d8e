//! # Services
//!
//! Collaborators the line editor consumes: the clipboard slot, command
//! history and completion candidates.

pub mod clipboard;
pub mod completion;
pub mod history;

pub use clipboard::{open_clipboard, ClipboardPort, MemoryClipboard, SystemClipboard};
pub use completion::{common_prefix, Completer, FileCompleter};
pub use history::{History, HistorySource, DEFAULT_MAX_ENTRIES};
