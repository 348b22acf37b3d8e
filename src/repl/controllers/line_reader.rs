//! # Read Loop
//!
//! Blocks for one input event at a time, feeds key events to a fresh
//! `LineEditor` and stops on the first terminal signal. Raw mode is only
//! active while a line is being read so commands run on a cooked terminal.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};

use crate::repl::commands::{Keymap, Signal};
use crate::repl::editor::{EditorPorts, LineEditor};
use crate::repl::io::{EventStream, TerminalPort};
use crate::repl::services::{ClipboardPort, Completer, HistorySource};
use crate::repl::text::WidthTable;

/// How an input request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The user submitted a line
    Line(String),
    /// Ctrl-C discarded the line
    Interrupted,
    /// Ctrl-D on an empty line
    Eof,
}

/// Reads lines from an event stream, drawing on a terminal port
pub struct LineReader<ES: EventStream, T: TerminalPort> {
    events: ES,
    terminal: T,
    clipboard: Box<dyn ClipboardPort>,
    completer: Option<Box<dyn Completer + Send>>,
    keymap: Keymap,
    widths: Arc<WidthTable>,
}

impl<ES: EventStream, T: TerminalPort> LineReader<ES, T> {
    /// Create a reader with injected I/O streams
    pub fn with_io_streams(
        events: ES,
        terminal: T,
        clipboard: Box<dyn ClipboardPort>,
        widths: Arc<WidthTable>,
    ) -> Self {
        Self {
            events,
            terminal,
            clipboard,
            completer: None,
            keymap: Keymap::default(),
            widths,
        }
    }

    /// Use `keymap` instead of the default bindings
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Offer Tab completion from `completer`
    pub fn with_completer(mut self, completer: Box<dyn Completer + Send>) -> Self {
        self.completer = Some(completer);
        self
    }

    /// The terminal port, e.g. to print command output between reads
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// The clipboard shared by kill and yank
    pub fn clipboard(&self) -> &dyn ClipboardPort {
        self.clipboard.as_ref()
    }

    /// Read one line after drawing `prompt`
    pub fn read_line(&mut self, prompt: &str, history: &dyn HistorySource) -> Result<ReadOutcome> {
        self.terminal.enable_raw_mode()?;
        let outcome = self.run_session(prompt, history);
        let restored = self.terminal.disable_raw_mode();
        let outcome = outcome?;
        restored?;
        tracing::debug!("Input request finished: {:?}", outcome);
        Ok(outcome)
    }

    fn run_session(&mut self, prompt: &str, history: &dyn HistorySource) -> Result<ReadOutcome> {
        let ports = EditorPorts {
            terminal: &mut self.terminal,
            clipboard: self.clipboard.as_ref(),
            history,
            completer: self
                .completer
                .as_deref()
                .map(|completer| completer as &dyn Completer),
        };
        let mut editor = LineEditor::new(ports, &self.keymap, self.widths.clone(), prompt);
        editor.start()?;
        editor.flush()?;

        loop {
            match self.events.read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    let signal = editor.feed(&key)?;
                    match signal {
                        Signal::Continue => editor.flush()?,
                        Signal::Enter => {
                            editor.finish()?;
                            if editor.was_interrupted() {
                                return Ok(ReadOutcome::Interrupted);
                            }
                            return Ok(ReadOutcome::Line(editor.current_line()));
                        }
                        Signal::Abort => {
                            editor.finish()?;
                            return Ok(ReadOutcome::Eof);
                        }
                    }
                }
                Event::Resize(width, height) => {
                    // The region width is fixed for the running request
                    tracing::debug!("Terminal resized to {}x{}", width, height);
                }
                _ => {}
            }
        }
    }
}
