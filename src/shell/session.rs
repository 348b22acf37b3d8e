//! # Shell Session
//!
//! The outer loop: draw the prompt, read a line, record it in the history
//! and hand it to the interpreter. Three entry points share one interpreter:
//! an interactive terminal, a piped script and a single `-c` command line.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use super::interpreter::{Interpreter, Next};
use crate::repl::{
    open_clipboard, CrosstermTerminal, EventStream, FileCompleter, History, Keymap, LineReader,
    ReadOutcome, TerminalEventStream, TerminalPort, WidthTable,
};

/// Expand prompt escapes: `$P` working directory, `$G` `>`, `$L` `<`, `$$` `$`
pub fn render_prompt(template: &str) -> String {
    let mut rendered = String::new();
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            rendered.push(ch);
            continue;
        }
        match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('P') => match std::env::current_dir() {
                Ok(cwd) => rendered.push_str(&cwd.display().to_string()),
                Err(e) => tracing::debug!("No working directory for prompt: {}", e),
            },
            Some('G') => rendered.push('>'),
            Some('L') => rendered.push('<'),
            Some('$') => rendered.push('$'),
            Some(other) => {
                rendered.push('$');
                rendered.push(other);
            }
            None => rendered.push('$'),
        }
    }
    rendered
}

/// A running shell
pub struct Shell {
    interpreter: Interpreter,
    widths: Arc<WidthTable>,
    keymap: Keymap,
    prompt: String,
}

impl Shell {
    pub fn new(interpreter: Interpreter, widths: Arc<WidthTable>) -> Self {
        Self {
            interpreter,
            widths,
            keymap: Keymap::default(),
            prompt: crate::config::DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run one command line and report its exit status
    pub async fn run_command(&mut self, line: &str, out: &mut dyn Write) -> Result<i32> {
        self.interpreter.interpret(line, out).await?;
        Ok(self.interpreter.last_status())
    }

    /// Run every line of `input`; errors are reported and the script goes on
    pub async fn run_batch<R: BufRead>(&mut self, input: R, out: &mut dyn Write) -> Result<i32> {
        let mut status = 0;
        for line in input.lines() {
            let line = line?;
            match self.interpreter.interpret(&line, out).await {
                Ok(Next::Exit) => break,
                Ok(Next::Continue) => status = self.interpreter.last_status(),
                Err(e) => {
                    eprintln!("conshell: {:#}", e);
                    status = 1;
                }
            }
        }
        Ok(status)
    }

    /// Interactive loop on the process terminal
    pub async fn run_interactive(&mut self, use_system_clipboard: bool) -> Result<()> {
        let reader = LineReader::with_io_streams(
            TerminalEventStream::new(),
            CrosstermTerminal::new(),
            open_clipboard(use_system_clipboard),
            self.widths.clone(),
        )
        .with_keymap(self.keymap.clone())
        .with_completer(Box::new(FileCompleter::new()));

        let mut stdout = std::io::stdout();
        self.run_with_reader(reader, &mut stdout).await
    }

    /// Interactive loop over any event source and terminal
    ///
    /// Reading blocks the worker thread, so the runtime must be multi-threaded.
    pub async fn run_with_reader<ES, T>(
        &mut self,
        mut reader: LineReader<ES, T>,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        ES: EventStream,
        T: TerminalPort,
    {
        tracing::info!("Interactive session started");
        loop {
            let prompt = render_prompt(&self.prompt);
            let history = self.interpreter.history();
            let outcome = tokio::task::block_in_place(|| reader.read_line(&prompt, history))?;

            let line = match outcome {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => break,
            };
            self.interpreter.history_mut().push(&line);

            match self.interpreter.interpret(&line, out).await {
                Ok(Next::Exit) => break,
                Ok(Next::Continue) => {}
                Err(e) => {
                    tracing::debug!("Command failed: {:#}", e);
                    writeln!(out, "conshell: {:#}", e)?;
                }
            }
        }

        save_history(self.interpreter.history());
        tracing::info!("Interactive session ended");
        Ok(())
    }
}

fn save_history(history: &History) {
    if let Err(e) = history.save() {
        tracing::warn!("History not saved: {:#}", e);
    }
}
