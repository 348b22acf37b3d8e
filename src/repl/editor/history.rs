//! History navigation
//!
//! Up/Down replace the whole line. The line being typed is stashed when
//! leaving the bottom of the history and restored on the way back down.

use anyhow::Result;

use super::LineEditor;

impl LineEditor<'_> {
    /// Up / Ctrl-P: show the previous entry
    pub(super) fn history_prev(&mut self) -> Result<()> {
        if self.history_index == 0 {
            return Ok(());
        }
        if self.history_index >= self.history.len() && self.stashed_line.is_none() {
            self.stashed_line = Some(self.buffer.text());
        }
        self.history_index -= 1;
        let entry = self.history.get(self.history_index).unwrap_or_default().to_string();
        self.replace_line(&entry)
    }

    /// Down / Ctrl-N: show the next entry, or the stashed line past the newest
    pub(super) fn history_next(&mut self) -> Result<()> {
        if self.history_index >= self.history.len() {
            return Ok(());
        }
        self.history_index += 1;
        let entry = if self.history_index == self.history.len() {
            self.stashed_line.take().unwrap_or_default()
        } else {
            self.history
                .get(self.history_index)
                .unwrap_or_default()
                .to_string()
        };
        self.replace_line(&entry)
    }

    /// Blank the visible line and show `text` with the cursor at its end
    ///
    /// Erases like `clear_line` without touching the clipboard, then lets the
    /// tail jump pick the viewport.
    pub(super) fn replace_line(&mut self, text: &str) -> Result<()> {
        let head = self.buffer.cursor_column();
        let tail = self.buffer.visible_width_from(self.buffer.cursor);
        self.term.backspace(head)?;
        self.term.put_rep(' ', head + tail)?;
        self.term.backspace(head + tail)?;

        self.buffer.set_text(text);
        self.move_to_end()
    }
}
