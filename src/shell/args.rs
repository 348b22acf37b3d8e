//! # Command Line Splitting
//!
//! Splits a submitted line into arguments. Double quotes group words and are
//! removed; a trailing `&` outside quotes marks a background command.

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    pub args: Vec<String>,
    pub background: bool,
}

impl CommandLine {
    /// Split `line` into arguments
    pub fn parse(line: &str) -> Self {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut in_word = false;
        let mut quoted = false;
        let mut last_was_quoted = false;

        for ch in line.chars() {
            match ch {
                '"' => {
                    quoted = !quoted;
                    in_word = true;
                    last_was_quoted = true;
                }
                ch if ch.is_whitespace() && !quoted => {
                    if in_word {
                        args.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                ch => {
                    current.push(ch);
                    in_word = true;
                    last_was_quoted = false;
                }
            }
        }
        if in_word {
            args.push(current);
        }

        let mut background = false;
        if let Some(last) = args.last_mut() {
            if !last_was_quoted && last.ends_with('&') {
                last.pop();
                background = true;
                if last.is_empty() {
                    args.pop();
                }
            }
        }

        Self { args, background }
    }

    /// Command name, if the line was not blank
    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Join arguments with blanks, quoting the ones that contain a blank
pub fn quote_and_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            if arg.contains(' ') {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_should_split_on_whitespace() {
        let cmd = CommandLine::parse("  ls   -la\t/tmp ");
        assert_eq!(cmd.args, vec!["ls", "-la", "/tmp"]);
        assert!(!cmd.background);
    }

    #[test]
    fn parse_should_group_quoted_words() {
        let cmd = CommandLine::parse(r#"echo "hello world" x"y z""#);
        assert_eq!(cmd.args, vec!["echo", "hello world", "xy z"]);
    }

    #[test]
    fn parse_should_keep_empty_quoted_argument() {
        let cmd = CommandLine::parse(r#"set NAME= """#);
        assert_eq!(cmd.args, vec!["set", "NAME=", ""]);
    }

    #[test]
    fn parse_should_detect_trailing_ampersand() {
        let detached = CommandLine::parse("sleep 10 &");
        assert_eq!(detached.args, vec!["sleep", "10"]);
        assert!(detached.background);

        let attached = CommandLine::parse("sleep 10&");
        assert_eq!(attached.args, vec!["sleep", "10"]);
        assert!(attached.background);
    }

    #[test]
    fn parse_should_not_treat_quoted_ampersand_as_background() {
        let cmd = CommandLine::parse(r#"echo "a &""#);
        assert_eq!(cmd.args, vec!["echo", "a &"]);
        assert!(!cmd.background);
    }

    #[test]
    fn parse_should_return_empty_for_blank_line() {
        assert!(CommandLine::parse("   ").is_empty());
        assert_eq!(CommandLine::parse("").name(), None);
    }

    #[test]
    fn quote_and_join_should_quote_arguments_with_blanks() {
        let args = vec!["a".to_string(), "b c".to_string(), "d".to_string()];
        assert_eq!(quote_and_join(&args), r#"a "b c" d"#);
    }
}
