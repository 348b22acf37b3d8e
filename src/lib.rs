//! # conshell - Interactive Command Shell with a Scrolling Line Editor
//!
//! A small command shell whose input line is edited in place on a single
//! terminal row. Lines longer than the terminal scroll horizontally instead
//! of wrapping, and display widths (including double-width CJK characters)
//! are looked up in a shared, overridable width table.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  key events  ┌──────────────┐  operations  ┌────────────┐
//! │  LineReader  │─────────────►│  LineEditor  │─────────────►│ EditBuffer │
//! │ - raw mode   │              │ - keymap     │              │ - content  │
//! │ - read loop  │              │ - scrolling  │              │ - viewport │
//! └──────┬───────┘              └──────┬───────┘              └────────────┘
//!        │ submitted line              │ ports
//!        ▼                             ▼
//! ┌──────────────┐              ┌──────────────────────────────┐
//! │    Shell     │              │ terminal, clipboard, history │
//! │ - aliases    │              │ completion, width table      │
//! │ - built-ins  │              └──────────────────────────────┘
//! │ - processes  │
//! └──────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod repl;
pub mod shell;

// Re-export main types for easy access
pub use config::ShellConfig;
pub use repl::*;
pub use shell::{Interpreter, Next, Shell};
