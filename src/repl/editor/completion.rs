//! Tab completion of the word before the cursor

use std::path::MAIN_SEPARATOR;

use anyhow::Result;

use super::LineEditor;
use crate::repl::services::common_prefix;
use crate::repl::text::print_columns;

impl LineEditor<'_> {
    /// Tab: complete the word before the cursor
    ///
    /// The longest shared prefix of all candidates replaces the word. A
    /// single candidate that is not a directory is followed by a blank.
    /// With several candidates left they are listed below the line and the
    /// prompt is drawn again underneath.
    pub(super) fn complete(&mut self) -> Result<()> {
        let Some(completer) = self.completer else {
            return Ok(());
        };

        let cursor = self.buffer.cursor;
        let word_start = (0..cursor)
            .rev()
            .find(|&i| self.buffer.char_at(i).is_some_and(char::is_whitespace))
            .map_or(0, |i| i + 1);
        let word = self.buffer.text_between(word_start, cursor);

        let candidates = completer.complete(&word);
        tracing::debug!("{} completion candidates for '{}'", candidates.len(), word);
        if candidates.is_empty() {
            return Ok(());
        }

        let prefix = common_prefix(&candidates);
        if prefix.chars().count() >= word.chars().count() && prefix != word {
            self.replace_word(&word, &prefix)?;
        }

        if candidates.len() == 1 {
            if !prefix.ends_with(['/', MAIN_SEPARATOR]) {
                self.insert_char(' ')?;
            }
            return Ok(());
        }

        self.list_candidates(&candidates)
    }

    fn replace_word(&mut self, word: &str, replacement: &str) -> Result<()> {
        if let Some(rest) = replacement.strip_prefix(word) {
            return self.insert_text(rest);
        }
        // Letter case differs, retype the whole word
        for _ in word.chars() {
            self.backspace()?;
        }
        self.insert_text(replacement)
    }

    fn list_candidates(&mut self, candidates: &[String]) -> Result<()> {
        let names: Vec<String> = candidates
            .iter()
            .map(|candidate| {
                let trimmed = candidate.trim_end_matches(['/', MAIN_SEPARATOR]);
                let start = trimmed.rfind(['/', MAIN_SEPARATOR]).map_or(0, |i| i + 1);
                candidate[start..].to_string()
            })
            .collect();

        let lines = print_columns(&names, self.term.terminal_width(), self.buffer.widths());
        self.term.put_str("\r\n")?;
        for line in lines {
            self.term.put_str(&line)?;
            self.term.put_str("\r\n")?;
        }
        self.buffer.repaint_all(&mut *self.term, &self.prompt)
    }
}

#[cfg(test)]
mod tests {
    use crate::repl::commands::KeyOperation;
    use crate::repl::editor::{EditorPorts, LineEditor};
    use crate::repl::io::MockTerminal;
    use crate::repl::services::{Completer, History, MemoryClipboard};
    use crate::repl::text::WidthTable;
    use crate::repl::Keymap;

    struct FixedCompleter(Vec<&'static str>);

    impl Completer for FixedCompleter {
        fn complete(&self, word: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|c| c.to_lowercase().starts_with(&word.to_lowercase()))
                .map(|c| c.to_string())
                .collect()
        }
    }

    fn run(completer: &FixedCompleter, typed: &str) -> (String, MockTerminal) {
        let widths = WidthTable::shared();
        let mut term = MockTerminal::with_widths(40, widths.clone());
        let clipboard = MemoryClipboard::new();
        let history = History::default();
        let keymap = Keymap::default();
        let ports = EditorPorts {
            terminal: &mut term,
            clipboard: &clipboard,
            history: &history,
            completer: Some(completer),
        };
        let mut editor = LineEditor::with_view_width(ports, &keymap, widths, "> ", 30);
        editor.start().unwrap();
        for ch in typed.chars() {
            editor.buffer.set_pending_unicode(ch);
            editor.apply(KeyOperation::SelfInsert).unwrap();
        }
        editor.apply(KeyOperation::Complete).unwrap();
        assert!(editor.buffer().is_consistent());
        let line = editor.current_line();
        drop(editor);
        (line, term)
    }

    #[test]
    fn single_candidate_should_complete_with_trailing_blank() {
        let completer = FixedCompleter(vec!["Cargo.toml", "src/"]);
        let (line, term) = run(&completer, "cat Car");
        assert_eq!(line, "cat Cargo.toml ");
        assert_eq!(term.line_text(), "> cat Cargo.toml");
    }

    #[test]
    fn directory_candidate_should_not_get_a_blank() {
        let completer = FixedCompleter(vec!["Cargo.toml", "src/"]);
        let (line, _) = run(&completer, "cd s");
        assert_eq!(line, "cd src/");
    }

    #[test]
    fn several_candidates_should_insert_prefix_and_list() {
        let completer = FixedCompleter(vec!["readme.md", "read.rs", "main.rs"]);
        let (line, term) = run(&completer, "vi r");

        assert_eq!(line, "vi read");
        assert_eq!(term.scrollback(), &["> vi read", "readme.md read.rs"]);
        assert_eq!(term.line_text(), "> vi read");
        assert_eq!(term.cursor_column(), 9);
    }

    #[test]
    fn case_mismatch_should_retype_word() {
        let completer = FixedCompleter(vec!["Makefile"]);
        let (line, _) = run(&completer, "make m");
        assert_eq!(line, "make Makefile ");
    }

    #[test]
    fn no_candidates_should_leave_line_alone() {
        let completer = FixedCompleter(vec!["alpha"]);
        let (line, term) = run(&completer, "zz");
        assert_eq!(line, "zz");
        assert!(term.scrollback().is_empty());
    }
}
