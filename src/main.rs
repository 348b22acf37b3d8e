//! # conshell Main Entry Point
//!
//! Loads the configuration, then runs one of three modes: a single `-c`
//! command, a script piped on stdin, or the interactive line editor.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use conshell::cmd_args::CommandLineArgs;
use conshell::config::{ShellConfig, LOG_FILTER_ENV_VAR};
use conshell::{History, Interpreter, Shell, WidthTable};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();

    // The editor owns the terminal in raw mode, so logs only ever go to a file
    if let Some(path) = cmd_args.log_file() {
        init_tracing_subscriber(&path)?;
    }

    let config_path = cmd_args.config_path();
    tracing::debug!("Loading configuration from '{}'", config_path);
    let config = ShellConfig::load(&config_path)?;

    let widths = WidthTable::shared();
    config.apply_widths(&widths);

    let history = match &config.history_file {
        Some(path) => History::load(path, config.history_max).unwrap_or_else(|e| {
            tracing::warn!("{:#}", e);
            History::new(config.history_max)
        }),
        None => History::new(config.history_max),
    };

    let interpreter = Interpreter::new(widths.clone())
        .with_aliases(config.alias_table())
        .with_history(history);
    let mut shell = Shell::new(interpreter, widths)
        .with_keymap(config.keymap())
        .with_prompt(&config.prompt);

    let mut stdout = io::stdout();

    if let Some(line) = cmd_args.command() {
        let status = match shell.run_command(line, &mut stdout).await {
            Ok(status) => status,
            Err(e) => {
                eprintln!("conshell: {:#}", e);
                1
            }
        };
        return exit_with(status, &mut stdout);
    }

    if !atty::is(atty::Stream::Stdin) {
        tracing::info!("stdin is not a terminal, reading commands line by line");
        let status = shell.run_batch(io::stdin().lock(), &mut stdout).await?;
        return exit_with(status, &mut stdout);
    }

    shell.run_interactive(cmd_args.use_system_clipboard()).await
}

fn exit_with(status: i32, stdout: &mut io::Stdout) -> Result<()> {
    stdout.flush()?;
    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}

fn init_tracing_subscriber(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(Mutex::new(file))
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_subscriber_should_write_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conshell.log");

        init_tracing_subscriber(&path).unwrap();
        tracing::error!("logging works");

        let logged = std::fs::read_to_string(&path).unwrap();
        assert!(logged.contains("logging works"));
    }

    #[test]
    fn init_tracing_subscriber_should_fail_for_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("conshell.log");

        assert!(init_tracing_subscriber(&path).is_err());
    }
}
