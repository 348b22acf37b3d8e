//! Insertion, deletion, kill/yank and redraw operations

use anyhow::Result;

use super::LineEditor;
use crate::repl::commands::Signal;

/// Make clipboard text safe for a single-line buffer
///
/// Line breaks are dropped, tabs become one blank and any other control
/// character (C0, DEL and C1) is discarded.
pub fn sanitize_paste(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' => None,
            '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}

impl LineEditor<'_> {
    /// Insert the codepoint of the key being dispatched
    pub(super) fn self_insert(&mut self) -> Result<()> {
        let ch = self.buffer.pending_unicode();
        if (ch as u32) < 0x20 {
            return Ok(());
        }
        self.insert_char(ch)
    }

    /// Insert the hex code of the key being dispatched, e.g. `[11]` for Ctrl-Q
    pub(super) fn insert_diagnostic(&mut self) -> Result<()> {
        let report = format!("[{:X}]", self.buffer.pending_unicode() as u32);
        self.insert_text(&report)
    }

    /// Insert `text` one codepoint at a time through the self-insert path
    pub(super) fn insert_text(&mut self, text: &str) -> Result<()> {
        for ch in text.chars().filter(|&ch| (ch as u32) >= 0x20) {
            self.insert_char(ch)?;
        }
        Ok(())
    }

    /// Insert `ch` at the cursor and redraw the minimum
    pub(super) fn insert_char(&mut self, ch: char) -> Result<()> {
        let cursor = self.buffer.cursor;
        self.buffer.insert(cursor, &[ch]);

        let column = self.buffer.cursor_column();
        let ch_width = self.buffer.char_width(cursor);
        if column + ch_width >= self.buffer.view_width() {
            self.scroll_right(cursor)?;
        } else {
            self.buffer
                .repaint(&mut *self.term, cursor, -(ch_width as isize))?;
        }
        self.buffer.cursor = cursor + 1;
        Ok(())
    }

    /// Backspace: delete the codepoint before the cursor
    pub(super) fn backspace(&mut self) -> Result<()> {
        if self.buffer.cursor == 0 {
            return Ok(());
        }
        self.buffer.cursor -= 1;
        let cursor = self.buffer.cursor;
        let removed = self.buffer.delete(cursor, 1);

        if cursor >= self.buffer.view_start {
            self.term.backspace(removed)?;
        } else {
            self.buffer.view_start = cursor;
        }
        self.buffer
            .repaint(&mut *self.term, cursor, removed as isize)
    }

    /// Del: delete the codepoint under the cursor
    pub(super) fn delete_forward(&mut self) -> Result<()> {
        let cursor = self.buffer.cursor;
        if cursor >= self.buffer.len() {
            return Ok(());
        }
        let removed = self.buffer.delete(cursor, 1);
        self.buffer
            .repaint(&mut *self.term, cursor, removed as isize)
    }

    /// Ctrl-D: delete forward, or end the input on an empty line
    pub(super) fn delete_or_abort(&mut self) -> Result<Signal> {
        if self.buffer.is_empty() {
            return Ok(Signal::Abort);
        }
        self.delete_forward()?;
        Ok(Signal::Continue)
    }

    /// Ctrl-K: move everything after the cursor into the clipboard
    pub(super) fn kill_to_end(&mut self) -> Result<()> {
        let cursor = self.buffer.cursor;
        let killed = self.buffer.text_between(cursor, self.buffer.len());
        if let Err(e) = self.clipboard.write(&killed) {
            tracing::debug!("Kill text not stored: {}", e);
        }

        // Only the cells that are actually on screen need blanking
        let erase = self.buffer.visible_width_from(cursor);
        self.term.put_rep(' ', erase)?;
        self.term.backspace(erase)?;
        self.buffer.truncate(cursor);
        Ok(())
    }

    /// Esc: kill to the end, then blank the visible part before the cursor
    pub(super) fn clear_line(&mut self) -> Result<()> {
        self.kill_to_end()?;
        let width = self.buffer.cursor_column();
        self.term.backspace(width)?;
        self.term.put_rep(' ', width)?;
        self.term.backspace(width)?;
        self.buffer.clear();
        Ok(())
    }

    /// Ctrl-U: delete everything before the cursor
    pub(super) fn clear_before_cursor(&mut self) -> Result<()> {
        let visible = self.buffer.cursor_column();
        let cursor = self.buffer.cursor;
        self.buffer.delete(0, cursor);
        self.term.backspace(visible)?;
        self.buffer.cursor = 0;
        self.buffer.view_start = 0;
        self.buffer.repaint(&mut *self.term, 0, visible as isize)
    }

    /// Ctrl-L: clear the terminal and draw prompt and line again
    pub(super) fn redraw_screen(&mut self) -> Result<()> {
        self.term.cls()?;
        self.buffer.repaint_all(&mut *self.term, &self.prompt)
    }

    /// Ctrl-Y: insert the clipboard text at the cursor
    pub(super) fn paste(&mut self) -> Result<()> {
        let text = match self.clipboard.read() {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Nothing to paste: {}", e);
                return Ok(());
            }
        };
        self.insert_text(&sanitize_paste(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_paste_should_flatten_lines_and_tabs() {
        assert_eq!(sanitize_paste("line1\nline2\ttab"), "line1line2 tab");
        assert_eq!(sanitize_paste("a\r\nb"), "ab");
        assert_eq!(sanitize_paste("bell\u{7}!"), "bell!");
        assert_eq!(sanitize_paste("日本語"), "日本語");
    }

    #[test]
    fn sanitize_paste_should_drop_delete_and_c1_controls() {
        assert_eq!(sanitize_paste("a\u{7f}b"), "ab");
        assert_eq!(sanitize_paste("\u{9b}31mred\u{85}"), "31mred");
        assert_eq!(sanitize_paste("caf\u{e9}\u{a0}"), "caf\u{e9}\u{a0}");
    }
}
