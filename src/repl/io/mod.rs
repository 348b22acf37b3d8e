//! # I/O Abstraction Layer
//!
//! Provides trait abstractions for the key input source and the terminal
//! output sink so the line editor can run against a real terminal or a
//! recording mock.
//!
//! ## Design Principles
//!
//! - **EventStream**: Abstracts decoded input events (keys, resizes)
//! - **TerminalPort**: The only output primitives the editor uses. All moves
//!   are relative to the current column; the editor never asks the terminal
//!   where its cursor is.
//!
//! ## Architecture
//!
//! ```text
//! Production:  LineReader ──▶ TerminalEventStream ──▶ crossterm::event::read()
//!                         ──▶ CrosstermTerminal   ──▶ crossterm::queue!()
//!
//! Testing:     LineReader ──▶ MockEventStream     ──▶ VecDeque<Event>
//!                         ──▶ MockTerminal        ──▶ Vec<TerminalCommand> + screen line
//! ```

use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

pub mod mock;
pub mod terminal;

pub use terminal::{CrosstermTerminal, TerminalEventStream};

pub use mock::{MockEventStream, MockTerminal, TerminalCommand};

/// Input event stream abstraction
///
/// Production implementations read from crossterm, test implementations
/// replay a pre-programmed sequence.
pub trait EventStream: Send {
    /// Check if events are available without blocking
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Block until the next event is available and return it
    fn read(&mut self) -> Result<Event>;
}

/// Terminal output port used by the line editor
pub trait TerminalPort: Send {
    /// Move the cursor `cells` columns to the left without erasing
    fn backspace(&mut self, cells: usize) -> Result<()>;

    /// Write `ch` `count` times at the cursor, advancing it
    fn put_rep(&mut self, ch: char, count: usize) -> Result<()>;

    /// Write a string at the cursor (prompts, candidate listings)
    fn put_str(&mut self, text: &str) -> Result<()>;

    /// Clear the screen and move to the origin
    fn cls(&mut self) -> Result<()>;

    /// Usable column count of the terminal
    fn terminal_width(&self) -> usize;

    /// Push buffered output to the device
    fn flush(&mut self) -> Result<()>;

    /// Enter raw mode for key-by-key input
    fn enable_raw_mode(&mut self) -> Result<()>;

    /// Leave raw mode
    fn disable_raw_mode(&mut self) -> Result<()>;
}
