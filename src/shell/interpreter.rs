//! # Interpreter
//!
//! Runs one submitted line through an ordered chain of hooks:
//!
//! 1. alias expansion (one level, the expansion is not expanded again)
//! 2. built-in commands
//! 3. external commands, spawned as child processes
//!
//! A trailing `&` detaches an external command; the shell does not wait for
//! it and the exit status is only logged.

use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::process::Command;

use super::alias::AliasTable;
use super::args::CommandLine;
use super::builtins;
use crate::repl::{History, WidthTable};

/// What the shell loop should do after a line ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Continue,
    Exit,
}

/// Shell state shared by every command
pub struct Interpreter {
    aliases: AliasTable,
    history: History,
    widths: Arc<WidthTable>,
    last_status: i32,
}

impl Interpreter {
    pub fn new(widths: Arc<WidthTable>) -> Self {
        Self {
            aliases: AliasTable::new(),
            history: History::default(),
            widths,
            last_status: 0,
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        &mut self.aliases
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn widths(&self) -> &WidthTable {
        &self.widths
    }

    /// Exit status of the last foreground external command
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Run one line; built-in output goes to `out`
    pub async fn interpret(&mut self, line: &str, out: &mut dyn Write) -> Result<Next> {
        let mut cmd = CommandLine::parse(line);
        if cmd.is_empty() {
            return Ok(Next::Continue);
        }

        if let Some(expanded) = self.aliases.expand(&cmd.args) {
            tracing::debug!("Alias expanded '{}' -> '{}'", line.trim(), expanded);
            let background = cmd.background;
            cmd = CommandLine::parse(&expanded);
            cmd.background |= background;
            if cmd.is_empty() {
                return Ok(Next::Continue);
            }
        }

        if let Some(builtin) = cmd.name().and_then(builtins::lookup) {
            if cmd.background {
                tracing::debug!("Built-in '{}' runs in the foreground", cmd.args[0]);
            }
            let next = builtin(self, &cmd.args, out)?;
            out.flush()?;
            return Ok(next);
        }

        self.run_external(&cmd).await
    }

    async fn run_external(&mut self, cmd: &CommandLine) -> Result<Next> {
        let name = &cmd.args[0];
        let mut command = Command::new(name);
        command.args(&cmd.args[1..]);
        if cmd.background {
            command.stdin(Stdio::null());
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("{}: command not found", name))?;

        if cmd.background {
            let label = name.clone();
            tracing::info!("Started '{}' in the background (pid {:?})", label, child.id());
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) => tracing::info!("Background '{}' finished: {}", label, status),
                    Err(e) => tracing::warn!("Background '{}' failed: {}", label, e),
                }
            });
            return Ok(Next::Continue);
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("{}: failed to wait for process", name))?;
        self.last_status = status.code().unwrap_or(-1);
        if !status.success() {
            tracing::debug!("'{}' exited with {}", name, status);
        }
        Ok(Next::Continue)
    }
}
