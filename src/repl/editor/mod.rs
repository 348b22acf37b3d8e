//! # Line Editor
//!
//! One editing session: an `EditBuffer` plus the ports it draws on. Every
//! decoded key goes through [`LineEditor::feed`], which looks the key up in
//! the keymap and runs exactly one [`KeyOperation`] to completion.
//!
//! ## Layout
//!
//! ```text
//! $ prompt> ls -la /very/long/pa_
//! |<------->|<----------------->|
//!  prompt      view_width columns
//! ```
//!
//! The operations themselves live in submodules, grouped the way they touch
//! the viewport:
//! - `movement`: cursor moves and the scroll rules
//! - `editing`: insertion, deletion, kill/yank, redraw
//! - `history`: previous/next entry replacement
//! - `completion`: Tab completion

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::repl::commands::{KeyOperation, Keymap, Signal};
use crate::repl::io::TerminalPort;
use crate::repl::models::EditBuffer;
use crate::repl::services::{ClipboardPort, Completer, HistorySource};
use crate::repl::text::{strip_ansi, WidthTable};

mod completion;
mod editing;
mod history;
mod movement;

pub use editing::sanitize_paste;

/// Ports one editing session draws on
pub struct EditorPorts<'a> {
    pub terminal: &'a mut dyn TerminalPort,
    pub clipboard: &'a dyn ClipboardPort,
    pub history: &'a dyn HistorySource,
    pub completer: Option<&'a dyn Completer>,
}

/// A single input request in progress
pub struct LineEditor<'a> {
    buffer: EditBuffer,
    term: &'a mut dyn TerminalPort,
    clipboard: &'a dyn ClipboardPort,
    history: &'a dyn HistorySource,
    completer: Option<&'a dyn Completer>,
    keymap: &'a Keymap,
    prompt: String,
    history_index: usize,
    stashed_line: Option<String>,
    interrupted: bool,
}

impl<'a> LineEditor<'a> {
    /// Start a session whose editing region fills the terminal after `prompt`
    ///
    /// One column is kept free at the right margin so writing the last cell
    /// never wraps the line.
    pub fn new(
        ports: EditorPorts<'a>,
        keymap: &'a Keymap,
        widths: Arc<WidthTable>,
        prompt: &str,
    ) -> Self {
        let prompt_width = widths.str_width(&strip_ansi(prompt));
        let view_width = ports
            .terminal
            .terminal_width()
            .saturating_sub(prompt_width + 1);
        Self::with_view_width(ports, keymap, widths, prompt, view_width)
    }

    /// Start a session with an explicit editing region width
    pub fn with_view_width(
        ports: EditorPorts<'a>,
        keymap: &'a Keymap,
        widths: Arc<WidthTable>,
        prompt: &str,
        view_width: usize,
    ) -> Self {
        let history_index = ports.history.len();
        Self {
            buffer: EditBuffer::new(widths, view_width),
            term: ports.terminal,
            clipboard: ports.clipboard,
            history: ports.history,
            completer: ports.completer,
            keymap,
            prompt: prompt.to_string(),
            history_index,
            stashed_line: None,
            interrupted: false,
        }
    }

    /// Draw the prompt; the terminal cursor must be at the start of a line
    pub fn start(&mut self) -> Result<()> {
        self.term.put_str(&self.prompt)
    }

    /// Decode one key event, run its operation and report what to do next
    pub fn feed(&mut self, event: &KeyEvent) -> Result<Signal> {
        let op = self.keymap.lookup(event);
        self.buffer.set_pending_unicode(Keymap::unicode_of(event));
        tracing::debug!("Key {:?} -> {}", event.code, op);
        let signal = self.apply(op)?;
        debug_assert!(self.buffer.view_start() <= self.buffer.cursor());
        Ok(signal)
    }

    /// Run a single operation against the buffer
    pub fn apply(&mut self, op: KeyOperation) -> Result<Signal> {
        match op {
            KeyOperation::Submit => return Ok(Signal::Enter),
            KeyOperation::Interrupt => return Ok(self.interrupt()),
            KeyOperation::MoveToStart => self.move_to_start()?,
            KeyOperation::MoveBack => self.move_back()?,
            KeyOperation::MoveToEnd => self.move_to_end()?,
            KeyOperation::MoveForward => self.move_forward()?,
            KeyOperation::Backspace => self.backspace()?,
            KeyOperation::DeleteForward => self.delete_forward()?,
            KeyOperation::DeleteOrAbort => return self.delete_or_abort(),
            KeyOperation::SelfInsert => self.self_insert()?,
            KeyOperation::InsertDiagnostic => self.insert_diagnostic()?,
            KeyOperation::KillToEnd => self.kill_to_end()?,
            KeyOperation::ClearLine => self.clear_line()?,
            KeyOperation::ClearBeforeCursor => self.clear_before_cursor()?,
            KeyOperation::RedrawScreen => self.redraw_screen()?,
            KeyOperation::Paste => self.paste()?,
            KeyOperation::HistoryPrev => self.history_prev()?,
            KeyOperation::HistoryNext => self.history_next()?,
            KeyOperation::Complete => self.complete()?,
            KeyOperation::NoOp => {}
        }
        Ok(Signal::Continue)
    }

    /// The line as typed so far; the finished line once `feed` returned `Enter`
    pub fn current_line(&self) -> String {
        self.buffer.text()
    }

    /// Whether the session ended through Ctrl-C rather than a real submit
    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Read access to the buffer, for the read loop and tests
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Prompt drawn in front of the editing region
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Push queued terminal output to the device
    pub fn flush(&mut self) -> Result<()> {
        self.term.flush()
    }

    /// Leave the edited line on screen and move to the next one
    pub fn finish(&mut self) -> Result<()> {
        self.term.put_str("\r\n")?;
        self.term.flush()
    }

    fn interrupt(&mut self) -> Signal {
        self.buffer.clear();
        self.interrupted = true;
        Signal::Enter
    }
}
