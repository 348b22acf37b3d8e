//! Cursor movement and the viewport scroll rules
//!
//! The screen column of the cursor is always
//! `width_between(view_start, cursor)`; every move below emits relative
//! backspaces and writes derived from that alone.

use anyhow::Result;

use super::LineEditor;

impl LineEditor<'_> {
    /// Ctrl-A: back to column 0 of the line
    pub(super) fn move_to_start(&mut self) -> Result<()> {
        self.term.backspace(self.buffer.cursor_column())?;
        self.buffer.cursor = 0;
        self.buffer.view_start = 0;
        self.buffer.repaint(&mut *self.term, 0, 1)
    }

    /// Ctrl-B: one codepoint left, scrolling when the cursor leaves the view
    pub(super) fn move_back(&mut self) -> Result<()> {
        if self.buffer.cursor == 0 {
            return Ok(());
        }
        self.buffer.cursor -= 1;
        let cursor = self.buffer.cursor;

        if cursor < self.buffer.view_start {
            tracing::debug!("Scrolling left to {}", cursor);
            self.buffer.view_start = cursor;
            self.buffer.repaint(&mut *self.term, cursor, 1)
        } else {
            self.term.backspace(self.buffer.char_width(cursor))
        }
    }

    /// Ctrl-E: jump past the last codepoint
    pub(super) fn move_to_end(&mut self) -> Result<()> {
        let len = self.buffer.len();
        let view_width = self.buffer.view_width();

        if self.buffer.width_between(self.buffer.view_start, len) < view_width {
            // The tail is already on screen
            while self.buffer.cursor < len {
                if let Some(ch) = self.buffer.char_at(self.buffer.cursor) {
                    self.term.put_rep(ch, 1)?;
                }
                self.buffer.cursor += 1;
            }
            return Ok(());
        }

        self.term.backspace(self.buffer.cursor_column())?;

        // Widest tail that still leaves the cursor column inside the view
        let mut start = len - 1;
        let mut width = self.buffer.char_width(start);
        while start > 0 {
            let wider = width + self.buffer.char_width(start - 1);
            if wider >= view_width {
                break;
            }
            width = wider;
            start -= 1;
        }
        tracing::debug!("Tail jump: view_start {} -> {}", self.buffer.view_start, start);

        self.buffer.view_start = start;
        for index in start..len {
            if let Some(ch) = self.buffer.char_at(index) {
                self.term.put_rep(ch, 1)?;
            }
        }
        self.buffer.cursor = len;
        self.buffer.repaint(&mut *self.term, len, 1)
    }

    /// Ctrl-F: one codepoint right, scrolling when it reaches the edge
    pub(super) fn move_forward(&mut self) -> Result<()> {
        let cursor = self.buffer.cursor;
        if cursor >= self.buffer.len() {
            return Ok(());
        }

        let width = self.buffer.width_between(self.buffer.view_start, cursor + 1);
        if width < self.buffer.view_width() {
            if let Some(ch) = self.buffer.char_at(cursor) {
                self.term.put_rep(ch, 1)?;
            }
        } else {
            self.scroll_right(cursor)?;
        }
        self.buffer.cursor = cursor + 1;
        Ok(())
    }

    /// Shift the view right so the codepoint at `entering` becomes the last
    /// one shown, leaving the terminal cursor just after it
    ///
    /// The terminal cursor must be at the column of `entering`. The view
    /// advances one codepoint, plus one more when the codepoint leaving on
    /// the left is narrower than the one entering, so a double-width
    /// character is never cut at the left edge.
    pub(super) fn scroll_right(&mut self, entering: usize) -> Result<()> {
        let view_start = self.buffer.view_start;
        self.term
            .backspace(self.buffer.width_between(view_start, entering))?;

        let mut next_start = view_start + 1;
        if self.buffer.char_width(view_start) < self.buffer.char_width(entering) {
            next_start += 1;
        }
        self.buffer.view_start = next_start.min(entering + 1);
        tracing::debug!(
            "Scrolling right: view_start {} -> {}",
            view_start,
            self.buffer.view_start
        );

        for index in self.buffer.view_start..=entering {
            if let Some(ch) = self.buffer.char_at(index) {
                self.term.put_rep(ch, 1)?;
            }
        }
        // Whatever of the tail still fits, plus one blank over stale cells
        self.buffer.repaint(&mut *self.term, entering + 1, 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::repl::commands::KeyOperation;
    use crate::repl::editor::{EditorPorts, LineEditor};
    use crate::repl::io::MockTerminal;
    use crate::repl::services::{History, MemoryClipboard};
    use crate::repl::text::WidthTable;
    use crate::repl::Keymap;
    use std::sync::Arc;

    struct Fixture {
        term: MockTerminal,
        clipboard: MemoryClipboard,
        history: History,
        keymap: Keymap,
        widths: Arc<WidthTable>,
    }

    impl Fixture {
        fn new() -> Self {
            let widths = WidthTable::shared();
            Self {
                term: MockTerminal::with_widths(80, widths.clone()),
                clipboard: MemoryClipboard::new(),
                history: History::default(),
                keymap: Keymap::default(),
                widths,
            }
        }

        fn editor(&mut self, view_width: usize) -> LineEditor<'_> {
            let ports = EditorPorts {
                terminal: &mut self.term,
                clipboard: &self.clipboard,
                history: &self.history,
                completer: None,
            };
            LineEditor::with_view_width(ports, &self.keymap, self.widths.clone(), "", view_width)
        }
    }

    fn type_text(editor: &mut LineEditor<'_>, text: &str) {
        for ch in text.chars() {
            editor.buffer.set_pending_unicode(ch);
            editor.apply(KeyOperation::SelfInsert).unwrap();
        }
    }

    #[test]
    fn move_to_start_should_reset_view() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(8);
        type_text(&mut editor, "abcdefghijkl");
        assert!(editor.buffer().view_start() > 0);

        editor.apply(KeyOperation::MoveToStart).unwrap();

        assert_eq!(editor.buffer().cursor(), 0);
        assert_eq!(editor.buffer().view_start(), 0);
        drop(editor);
        assert_eq!(fixture.term.line_text(), "abcdefg");
        assert_eq!(fixture.term.cursor_column(), 0);
    }

    #[test]
    fn move_back_should_scroll_left_past_view_start() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(8);
        type_text(&mut editor, "abcdefghijkl");
        let start = editor.buffer().view_start();

        for _ in 0..(12 - start) {
            editor.apply(KeyOperation::MoveBack).unwrap();
        }
        assert_eq!(editor.buffer().cursor(), start);
        assert_eq!(editor.buffer().view_start(), start);

        editor.apply(KeyOperation::MoveBack).unwrap();
        assert_eq!(editor.buffer().cursor(), start - 1);
        assert_eq!(editor.buffer().view_start(), start - 1);
        assert!(editor.buffer().is_consistent());
    }

    #[test]
    fn move_back_at_start_should_do_nothing() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(8);

        editor.apply(KeyOperation::MoveBack).unwrap();

        assert_eq!(editor.buffer().cursor(), 0);
        drop(editor);
        assert!(fixture.term.commands().is_empty());
    }

    #[test]
    fn move_to_end_should_keep_view_when_tail_fits() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(20);
        type_text(&mut editor, "hello");
        editor.apply(KeyOperation::MoveToStart).unwrap();

        editor.apply(KeyOperation::MoveToEnd).unwrap();

        assert_eq!(editor.buffer().cursor(), 5);
        assert_eq!(editor.buffer().view_start(), 0);
    }

    #[test]
    fn move_to_end_should_recompute_view_for_long_tail() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(6);
        type_text(&mut editor, "abcdefghij");
        editor.apply(KeyOperation::MoveToStart).unwrap();

        editor.apply(KeyOperation::MoveToEnd).unwrap();

        // Five narrow codepoints fit before the sixth column
        assert_eq!(editor.buffer().cursor(), 10);
        assert_eq!(editor.buffer().view_start(), 5);
        drop(editor);
        assert_eq!(fixture.term.line_text(), "fghij");
        assert_eq!(fixture.term.cursor_column(), 5);
    }

    #[test]
    fn move_forward_should_scroll_at_right_edge() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(5);
        type_text(&mut editor, "abcdefg");
        editor.apply(KeyOperation::MoveToStart).unwrap();

        for _ in 0..4 {
            editor.apply(KeyOperation::MoveForward).unwrap();
        }
        assert_eq!(editor.buffer().view_start(), 0);

        editor.apply(KeyOperation::MoveForward).unwrap();
        assert_eq!(editor.buffer().cursor(), 5);
        assert_eq!(editor.buffer().view_start(), 1);
        assert!(editor.buffer().is_consistent());
    }

    #[test]
    fn move_forward_should_not_split_wide_char_at_left_edge() {
        let mut fixture = Fixture::new();
        let mut editor = fixture.editor(6);
        type_text(&mut editor, "abcdあ");
        editor.apply(KeyOperation::MoveToStart).unwrap();

        for _ in 0..5 {
            editor.apply(KeyOperation::MoveForward).unwrap();
        }

        // The wide codepoint entering on the right pushes two narrow ones out
        assert_eq!(editor.buffer().cursor(), 5);
        assert_eq!(editor.buffer().view_start(), 2);
        assert!(editor.buffer().is_consistent());
    }
}
