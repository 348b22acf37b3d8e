//! # Terminal I/O Implementations
//!
//! Production implementations of the I/O abstractions using crossterm.
//! All crossterm output calls are isolated to this module.

use super::{EventStream, TerminalPort};
use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use std::io::{self, Write};
use std::time::Duration;

/// Columns assumed when the terminal cannot report its size
const FALLBACK_WIDTH: usize = 80;

/// Terminal-based event stream using crossterm
pub struct TerminalEventStream;

impl TerminalEventStream {
    /// Create a new terminal event stream
    pub fn new() -> Self {
        Self
    }
}

impl EventStream for TerminalEventStream {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        event::poll(timeout).map_err(anyhow::Error::from)
    }

    fn read(&mut self) -> Result<Event> {
        event::read().map_err(anyhow::Error::from)
    }
}

/// Terminal output port backed by crossterm
///
/// Output is queued and only reaches the device on `flush`, which the read
/// loop calls once per key event.
pub struct CrosstermTerminal<W: Write> {
    writer: W,
}

impl CrosstermTerminal<io::Stdout> {
    /// Create a terminal port writing to stdout
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write> CrosstermTerminal<W> {
    /// Create a terminal port with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> TerminalPort for CrosstermTerminal<W> {
    fn backspace(&mut self, cells: usize) -> Result<()> {
        // MoveLeft(0) still moves one column on some terminals
        let mut remaining = cells;
        while remaining > 0 {
            let step = remaining.min(u16::MAX as usize);
            queue!(self.writer, cursor::MoveLeft(step as u16))?;
            remaining -= step;
        }
        Ok(())
    }

    fn put_rep(&mut self, ch: char, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let text: String = std::iter::repeat(ch).take(count).collect();
        queue!(self.writer, Print(text))?;
        Ok(())
    }

    fn put_str(&mut self, text: &str) -> Result<()> {
        queue!(self.writer, Print(text))?;
        Ok(())
    }

    fn cls(&mut self) -> Result<()> {
        queue!(self.writer, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }

    fn terminal_width(&self) -> usize {
        match terminal::size() {
            Ok((width, _)) if width > 0 => width as usize,
            Ok(_) => FALLBACK_WIDTH,
            Err(e) => {
                tracing::debug!("Terminal size unavailable, assuming {}: {}", FALLBACK_WIDTH, e);
                FALLBACK_WIDTH
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(anyhow::Error::from)
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(anyhow::Error::from)
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        terminal::disable_raw_mode().map_err(anyhow::Error::from)
    }
}

impl Default for TerminalEventStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CrosstermTerminal<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}
