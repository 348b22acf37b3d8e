//! # Edit Buffer
//!
//! The state of one input request: the codepoints typed so far, the
//! insertion point, and the horizontal viewport shown on the single terminal
//! line.
//!
//! ```text
//!   content:  h e l l o   w o r l d
//!                 ^           ^     ^
//!            view_start     cursor  len
//!
//!   screen:  |llo wo_      |   (view_width columns)
//! ```
//!
//! Invariants kept by every key operation:
//! - `view_start <= cursor <= len`
//! - `width_between(view_start, cursor) < view_width`, so the cursor column
//!   is always on screen
//!
//! The screen cursor column is never read back from the terminal; it is
//! always `width_between(view_start, cursor)`.

use std::sync::Arc;

use anyhow::Result;

use crate::repl::io::TerminalPort;
use crate::repl::text::WidthTable;

/// Narrowest editing region that can still hold one wide character plus the
/// trailing blank the scroll logic keeps
pub const MIN_VIEW_WIDTH: usize = 3;

/// Line contents plus cursor and viewport indices
#[derive(Debug, Clone)]
pub struct EditBuffer {
    content: Vec<char>,
    pub(crate) cursor: usize,
    pub(crate) view_start: usize,
    view_width: usize,
    pending_unicode: char,
    widths: Arc<WidthTable>,
}

impl EditBuffer {
    /// Create an empty buffer drawing into `view_width` columns
    pub fn new(widths: Arc<WidthTable>, view_width: usize) -> Self {
        Self {
            content: Vec::new(),
            cursor: 0,
            view_start: 0,
            view_width: view_width.max(MIN_VIEW_WIDTH),
            pending_unicode: '\0',
            widths,
        }
    }

    /// Number of codepoints in the line
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the line is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Insertion point
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// First codepoint shown on screen
    pub fn view_start(&self) -> usize {
        self.view_start
    }

    /// Columns available to the editing region
    pub fn view_width(&self) -> usize {
        self.view_width
    }

    /// Codepoint of the key currently being dispatched
    pub fn pending_unicode(&self) -> char {
        self.pending_unicode
    }

    /// Record the codepoint of the key about to be dispatched
    pub fn set_pending_unicode(&mut self, ch: char) {
        self.pending_unicode = ch;
    }

    /// The width table this buffer measures with
    pub fn widths(&self) -> &Arc<WidthTable> {
        &self.widths
    }

    /// Codepoint at `index`
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.content.get(index).copied()
    }

    /// Display width of the codepoint at `index`, 0 past the end
    pub fn char_width(&self, index: usize) -> usize {
        self.char_at(index).map_or(0, |ch| self.widths.width(ch))
    }

    /// The whole line as a string
    pub fn text(&self) -> String {
        self.content.iter().collect()
    }

    /// Text of `content[from..to]`, clamped to the line
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let to = to.min(self.content.len());
        let from = from.min(to);
        self.content[from..to].iter().collect()
    }

    /// Insert `runes` at `at`, shifting the rest of the line right
    ///
    /// Out-of-range positions leave the buffer untouched.
    pub fn insert(&mut self, at: usize, runes: &[char]) {
        if at > self.content.len() {
            tracing::warn!(
                "Insert at {} ignored, line has {} codepoints",
                at,
                self.content.len()
            );
            return;
        }
        self.content.splice(at..at, runes.iter().copied());
    }

    /// Remove up to `count` codepoints starting at `at`
    ///
    /// Returns the display width that was removed so the caller knows how
    /// many cells to erase.
    pub fn delete(&mut self, at: usize, count: usize) -> usize {
        if at >= self.content.len() {
            return 0;
        }
        let end = at + count.min(self.content.len() - at);
        let removed = self.width_between(at, end);
        self.content.drain(at..end);
        removed
    }

    /// Drop everything from `at` on
    pub fn truncate(&mut self, at: usize) {
        self.content.truncate(at);
        self.cursor = self.cursor.min(self.content.len());
        self.view_start = self.view_start.min(self.cursor);
    }

    /// Empty the line and reset every index
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.view_start = 0;
    }

    /// Replace the line with `text`, cursor and viewport at the start
    pub fn set_text(&mut self, text: &str) {
        self.content = text.chars().collect();
        self.cursor = 0;
        self.view_start = 0;
    }

    /// Sum of display widths of `content[from..to]`
    pub fn width_between(&self, from: usize, to: usize) -> usize {
        let to = to.min(self.content.len());
        if from >= to {
            return 0;
        }
        self.widths.width_of(self.content[from..to].iter().copied())
    }

    /// Screen column of the cursor within the editing region
    pub fn cursor_column(&self) -> usize {
        self.width_between(self.view_start, self.cursor)
    }

    /// Whether the viewport invariants hold
    pub fn is_consistent(&self) -> bool {
        self.view_start <= self.cursor
            && self.cursor <= self.content.len()
            && self.cursor_column() < self.view_width
    }

    /// Cells `repaint(from, _)` would draw, starting at column of `from`
    pub fn visible_width_from(&self, from: usize) -> usize {
        let mut column = self.width_between(self.view_start, from);
        let mut drawn = 0;
        for &ch in self.content.iter().skip(from) {
            let w = self.widths.width(ch);
            if column + w >= self.view_width {
                break;
            }
            column += w;
            drawn += w;
        }
        drawn
    }

    /// Redraw the visible tail starting at `from`
    ///
    /// The terminal cursor must be at the column of `from`. Codepoints are
    /// written while they fit the editing region. A positive `width_delta`
    /// pads that many blanks (bounded by the region) to erase what a
    /// shrinking edit left behind. When a codepoint does not fit, the cells
    /// up to the region edge are blanked instead, since the tail may have
    /// covered them before. Afterwards the cursor is moved back by the cells
    /// written plus the padding, less a negative `width_delta`, so a negative
    /// delta leaves it that many cells right of `from`.
    pub fn repaint(
        &self,
        term: &mut dyn TerminalPort,
        from: usize,
        width_delta: isize,
    ) -> Result<()> {
        let mut column = self.width_between(self.view_start, from);
        let mut written = 0;
        let mut clipped = false;

        for &ch in self.content.iter().skip(from) {
            let w = self.widths.width(ch);
            if column + w >= self.view_width {
                clipped = true;
                break;
            }
            term.put_rep(ch, 1)?;
            column += w;
            written += w;
        }

        let room = self.view_width.saturating_sub(column);
        let pad = if clipped {
            room
        } else if width_delta > 0 {
            width_delta.unsigned_abs().min(room)
        } else {
            0
        };
        if pad > 0 {
            term.put_rep(' ', pad)?;
        }

        let moved = written + pad;
        if width_delta < 0 {
            term.backspace(moved.saturating_sub(width_delta.unsigned_abs()))?;
        } else {
            term.backspace(moved)?;
        }
        Ok(())
    }

    /// Redraw the prompt and the whole visible region
    ///
    /// Used after the screen was cleared; the terminal cursor must be at the
    /// start of an empty line.
    pub fn repaint_all(&self, term: &mut dyn TerminalPort, prompt: &str) -> Result<()> {
        term.put_str(prompt)?;
        for &ch in &self.content[self.view_start..self.cursor] {
            term.put_rep(ch, 1)?;
        }
        self.repaint(term, self.cursor, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::io::MockTerminal;

    fn buffer_with(text: &str, view_width: usize) -> EditBuffer {
        let mut buffer = EditBuffer::new(WidthTable::shared(), view_width);
        buffer.set_text(text);
        buffer
    }

    #[test]
    fn new_buffer_should_be_empty_and_consistent() {
        let buffer = EditBuffer::new(WidthTable::shared(), 20);
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.view_start(), 0);
        assert!(buffer.is_consistent());
    }

    #[test]
    fn view_width_should_be_clamped_to_minimum() {
        let buffer = EditBuffer::new(WidthTable::shared(), 0);
        assert_eq!(buffer.view_width(), MIN_VIEW_WIDTH);
    }

    #[test]
    fn insert_should_shift_following_content() {
        let mut buffer = buffer_with("ad", 20);
        buffer.insert(1, &['b', 'c']);
        assert_eq!(buffer.text(), "abcd");

        buffer.insert(4, &['e']);
        assert_eq!(buffer.text(), "abcde");
    }

    #[test]
    fn insert_out_of_range_should_not_mutate() {
        let mut buffer = buffer_with("abc", 20);
        buffer.insert(4, &['x']);
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn delete_should_return_removed_width() {
        let mut buffer = buffer_with("aあbい", 20);
        assert_eq!(buffer.delete(1, 2), 3);
        assert_eq!(buffer.text(), "aい");
    }

    #[test]
    fn delete_should_clamp_count() {
        let mut buffer = buffer_with("abc", 20);
        assert_eq!(buffer.delete(1, 10), 2);
        assert_eq!(buffer.text(), "a");
        assert_eq!(buffer.delete(5, 1), 0);
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn width_between_should_sum_mixed_widths() {
        let buffer = buffer_with("aあbい", 20);
        assert_eq!(buffer.width_between(0, 4), 6);
        assert_eq!(buffer.width_between(1, 3), 3);
        assert_eq!(buffer.width_between(3, 1), 0);
        assert_eq!(buffer.width_between(2, 100), 3);
    }

    #[test]
    fn width_between_should_honour_overrides() {
        let widths = WidthTable::shared();
        let mut buffer = EditBuffer::new(widths.clone(), 20);
        buffer.set_text("★★");
        assert_eq!(buffer.width_between(0, 2), 2);

        widths.set_override('★', 2).unwrap();
        assert_eq!(buffer.width_between(0, 2), 4);
    }

    #[test]
    fn truncate_should_pull_indices_back() {
        let mut buffer = buffer_with("abcdef", 20);
        buffer.cursor = 5;
        buffer.view_start = 4;
        buffer.truncate(2);
        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.view_start(), 2);
    }

    #[test]
    fn repaint_should_draw_tail_and_restore_cursor() {
        let buffer = buffer_with("hello", 20);
        let mut term = MockTerminal::new(40);

        buffer.repaint(&mut term, 0, 0).unwrap();

        assert_eq!(term.line_text(), "hello");
        assert_eq!(term.cursor_column(), 0);
    }

    #[test]
    fn repaint_should_stop_at_region_edge() {
        let buffer = buffer_with("abcdefghij", 5);
        let mut term = MockTerminal::new(40);

        buffer.repaint(&mut term, 0, 0).unwrap();

        // Columns 0..4 hold text, the last column stays free
        assert_eq!(term.line_text(), "abcd");
        assert_eq!(buffer.visible_width_from(0), 4);
    }

    #[test]
    fn repaint_should_pad_to_erase_leftovers() {
        let buffer = buffer_with("ab", 20);
        let mut term = MockTerminal::new(40);
        term.put_str("abcd").unwrap();
        term.backspace(4).unwrap();

        buffer.repaint(&mut term, 0, 2).unwrap();

        assert_eq!(term.line_text(), "ab");
        assert_eq!(term.cursor_column(), 0);
    }

    #[test]
    fn repaint_with_negative_delta_should_leave_cursor_after_insert() {
        let buffer = buffer_with("xab", 20);
        let mut term = MockTerminal::new(40);

        buffer.repaint(&mut term, 0, -1).unwrap();

        assert_eq!(term.line_text(), "xab");
        assert_eq!(term.cursor_column(), 1);
    }

    #[test]
    fn repaint_should_blank_cells_left_by_a_clipped_tail() {
        // "本" was inserted in front of "日c": the wide char no longer fits
        let buffer = buffer_with("本日c", 4);
        let mut term = MockTerminal::new(40);
        term.put_str("日c").unwrap();
        term.backspace(3).unwrap();

        buffer.repaint(&mut term, 0, -2).unwrap();

        assert_eq!(term.line_text(), "本");
        assert_eq!(term.cursor_column(), 2);
    }

    #[test]
    fn repaint_all_should_draw_prompt_and_visible_region() {
        let mut buffer = buffer_with("abcdef", 20);
        buffer.cursor = 3;
        buffer.view_start = 1;
        let mut term = MockTerminal::new(40);

        buffer.repaint_all(&mut term, "$ ").unwrap();

        assert_eq!(term.line_text(), "$ bcdef");
        assert_eq!(term.cursor_column(), 4);
    }
}
