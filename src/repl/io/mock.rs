//! # Mock I/O Implementations for Testing
//!
//! Provides mock implementations of `EventStream` and `TerminalPort`.
//! `MockTerminal` records every port call and also simulates the single
//! screen line the editor draws on, so tests can compare what a user would
//! see with the logical buffer.

use super::{EventStream, TerminalPort};
use crate::repl::text::WidthTable;
use anyhow::Result;
use crossterm::event::Event;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Marker stored in the cell right of a double-width character
const WIDE_TAIL: char = '\0';

/// Mock event stream for testing
///
/// Provides pre-programmed events that can be consumed by tests.
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    /// Create a new mock event stream with pre-programmed events
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Create an empty mock event stream
    pub fn empty() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Add an event to the stream
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Number of events not yet consumed
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventStream for MockEventStream {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No events available"))
    }
}

/// Recorded terminal call for verification
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    Backspace(usize),
    PutRep(char, usize),
    PutStr(String),
    Cls,
    Flush,
    EnableRawMode,
    DisableRawMode,
}

/// Mock terminal port that records calls and simulates the current line
pub struct MockTerminal {
    commands: Vec<TerminalCommand>,
    widths: Arc<WidthTable>,
    width: usize,
    cells: Vec<char>,
    column: usize,
    scrollback: Vec<String>,
    raw_mode: bool,
}

impl MockTerminal {
    /// Create a mock terminal `width` columns wide with its own width table
    pub fn new(width: usize) -> Self {
        Self::with_widths(width, WidthTable::shared())
    }

    /// Create a mock terminal that measures characters with `widths`
    pub fn with_widths(width: usize, widths: Arc<WidthTable>) -> Self {
        Self {
            commands: Vec::new(),
            widths,
            width,
            cells: Vec::new(),
            column: 0,
            scrollback: Vec::new(),
            raw_mode: false,
        }
    }

    /// Get recorded commands for verification
    pub fn commands(&self) -> &[TerminalCommand] {
        &self.commands
    }

    /// Clear recorded commands, keeping the simulated screen
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Text of the current line with trailing blanks removed
    pub fn line_text(&self) -> String {
        let text: String = self.cells.iter().filter(|&&c| c != WIDE_TAIL).collect();
        text.trim_end().to_string()
    }

    /// Current column of the simulated cursor
    pub fn cursor_column(&self) -> usize {
        self.column
    }

    /// Lines that were terminated with a newline
    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    /// Whether raw mode is currently enabled
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    fn put_char(&mut self, ch: char) {
        match ch {
            '\r' => self.column = 0,
            '\n' => {
                let line = self.line_text();
                self.scrollback.push(line);
                self.cells.clear();
                self.column = 0;
            }
            '\u{7}' => {}
            _ => {
                let w = self.widths.width(ch);
                self.set_cell(self.column, ch);
                if w == 2 {
                    self.set_cell(self.column + 1, WIDE_TAIL);
                }
                self.column += w;
            }
        }
    }

    fn set_cell(&mut self, at: usize, ch: char) {
        if self.cells.len() <= at + 1 {
            self.cells.resize(at + 2, ' ');
        }
        // Overwriting half of a wide character blanks the other half
        if self.cells[at] == WIDE_TAIL && ch != WIDE_TAIL && at > 0 {
            self.cells[at - 1] = ' ';
        }
        if self.cells[at + 1] == WIDE_TAIL {
            self.cells[at + 1] = ' ';
        }
        self.cells[at] = ch;
    }
}

impl TerminalPort for MockTerminal {
    fn backspace(&mut self, cells: usize) -> Result<()> {
        self.commands.push(TerminalCommand::Backspace(cells));
        self.column = self.column.saturating_sub(cells);
        Ok(())
    }

    fn put_rep(&mut self, ch: char, count: usize) -> Result<()> {
        self.commands.push(TerminalCommand::PutRep(ch, count));
        for _ in 0..count {
            self.put_char(ch);
        }
        Ok(())
    }

    fn put_str(&mut self, text: &str) -> Result<()> {
        self.commands.push(TerminalCommand::PutStr(text.to_string()));
        for ch in text.chars() {
            self.put_char(ch);
        }
        Ok(())
    }

    fn cls(&mut self) -> Result<()> {
        self.commands.push(TerminalCommand::Cls);
        self.cells.clear();
        self.scrollback.clear();
        self.column = 0;
        Ok(())
    }

    fn terminal_width(&self) -> usize {
        self.width
    }

    fn flush(&mut self) -> Result<()> {
        self.commands.push(TerminalCommand::Flush);
        Ok(())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        self.commands.push(TerminalCommand::EnableRawMode);
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.commands.push(TerminalCommand::DisableRawMode);
        self.raw_mode = false;
        Ok(())
    }
}

impl Default for MockEventStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new(80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn mock_event_stream_should_provide_events() {
        let events = vec![
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())),
            Event::Key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::empty())),
        ];

        let mut stream = MockEventStream::new(events);
        assert!(stream.poll(Duration::from_millis(0)).unwrap());

        let event = stream.read().unwrap();
        if let Event::Key(key) = event {
            assert_eq!(key.code, KeyCode::Char('a'));
        } else {
            panic!("Expected key event");
        }

        assert_eq!(stream.remaining(), 1);
        stream.read().unwrap();
        assert!(!stream.poll(Duration::from_millis(0)).unwrap());
        assert!(stream.read().is_err());
    }

    #[test]
    fn mock_terminal_should_record_commands() {
        let mut term = MockTerminal::new(40);

        term.put_rep('a', 2).unwrap();
        term.backspace(1).unwrap();
        term.cls().unwrap();
        term.flush().unwrap();

        assert_eq!(
            term.commands(),
            &[
                TerminalCommand::PutRep('a', 2),
                TerminalCommand::Backspace(1),
                TerminalCommand::Cls,
                TerminalCommand::Flush,
            ]
        );
    }

    #[test]
    fn mock_terminal_should_simulate_overwrites() {
        let mut term = MockTerminal::new(40);

        term.put_str("hello").unwrap();
        term.backspace(3).unwrap();
        term.put_rep('L', 2).unwrap();

        assert_eq!(term.line_text(), "heLLo");
        assert_eq!(term.cursor_column(), 4);
    }

    #[test]
    fn mock_terminal_should_track_wide_characters() {
        let mut term = MockTerminal::new(40);

        term.put_str("aあb").unwrap();
        assert_eq!(term.cursor_column(), 4);
        assert_eq!(term.line_text(), "aあb");

        // Overwriting the right half of the wide character erases it
        term.backspace(2).unwrap();
        term.put_rep('x', 1).unwrap();
        assert_eq!(term.line_text(), "a xb");
    }

    #[test]
    fn mock_terminal_should_replace_shifted_wide_characters() {
        let mut term = MockTerminal::new(40);
        term.put_str("a日").unwrap();
        term.backspace(3).unwrap();

        // The new tail lands on the old head; the old tail must go with it
        term.put_str("本b").unwrap();

        assert_eq!(term.line_text(), "本b");
        assert_eq!(term.cursor_column(), 3);
    }

    #[test]
    fn mock_terminal_should_push_lines_to_scrollback() {
        let mut term = MockTerminal::new(40);

        term.put_str("first\r\nsecond").unwrap();

        assert_eq!(term.scrollback(), &["first".to_string()]);
        assert_eq!(term.line_text(), "second");
        assert_eq!(term.cursor_column(), 6);
    }
}
