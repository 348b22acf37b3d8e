//! # Built-in Commands
//!
//! Commands that act on the shell process itself and so cannot run as child
//! processes. A name wrapped in double underscores (`__cd__`) always reaches
//! the built-in, even when an alias of the same name exists.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use regex::Regex;

use super::interpreter::{Interpreter, Next};
use crate::repl::parse_codepoint;

/// Signature shared by every built-in
pub type BuiltinFn = fn(&mut Interpreter, &[String], &mut dyn Write) -> Result<Next>;

const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("alias", cmd_alias),
    ("cd", cmd_cd),
    ("cls", cmd_cls),
    ("echo", cmd_echo),
    ("exit", cmd_exit),
    ("history", cmd_history),
    ("pwd", cmd_pwd),
    ("rem", cmd_rem),
    ("set", cmd_set),
    ("which", cmd_which),
    ("runewidth", cmd_runewidth),
];

/// Entries printed by `history` without a count
const DEFAULT_HISTORY_LISTING: usize = 10;

fn forced_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^__(.+)__$").expect("valid built-in name regex"))
}

/// Find the built-in for a command name, honoring the `__name__` form
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    let name = name.to_lowercase();
    find(&name).or_else(|| {
        let caps = forced_name_pattern().captures(&name)?;
        find(&caps[1])
    })
}

/// Whether `name` is a built-in command
pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

fn find(name: &str) -> Option<BuiltinFn> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, function)| *function)
}

fn cmd_alias(shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    if args.len() < 2 {
        for (name, definition) in shell.aliases().iter() {
            writeln!(out, "{}={}", name, definition)?;
        }
        return Ok(Next::Continue);
    }

    let assignment = args[1..].join(" ");
    match assignment.split_once('=') {
        Some((name, definition)) => shell.aliases_mut().define(name.trim(), definition),
        None => {
            if let Some(definition) = shell.aliases().get(assignment.trim()) {
                writeln!(out, "{}={}", assignment.trim().to_lowercase(), definition)?;
            }
        }
    }
    Ok(Next::Continue)
}

fn cmd_cd(_shell: &mut Interpreter, args: &[String], _out: &mut dyn Write) -> Result<Next> {
    let target = args.get(1).map(String::as_str).unwrap_or("~");
    let expanded = shellexpand::tilde(target);
    env::set_current_dir(expanded.as_ref())
        .with_context(|| format!("cd: {}", target))?;
    tracing::debug!("Changed directory to {}", expanded);
    Ok(Next::Continue)
}

fn cmd_cls(_shell: &mut Interpreter, _args: &[String], out: &mut dyn Write) -> Result<Next> {
    out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    out.flush()?;
    Ok(Next::Continue)
}

fn cmd_echo(_shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    writeln!(out, "{}", args[1..].join(" "))?;
    Ok(Next::Continue)
}

fn cmd_exit(_shell: &mut Interpreter, _args: &[String], _out: &mut dyn Write) -> Result<Next> {
    Ok(Next::Exit)
}

fn cmd_history(shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    let count = match args.get(1) {
        Some(count) => count
            .parse::<usize>()
            .with_context(|| format!("history: invalid count '{}'", count))?,
        None => DEFAULT_HISTORY_LISTING,
    };
    for (index, line) in shell.history().tail(count) {
        writeln!(out, "{:4} {}", index + 1, line)?;
    }
    Ok(Next::Continue)
}

fn cmd_pwd(_shell: &mut Interpreter, _args: &[String], out: &mut dyn Write) -> Result<Next> {
    let cwd = env::current_dir().context("pwd")?;
    writeln!(out, "{}", cwd.display())?;
    Ok(Next::Continue)
}

fn cmd_rem(_shell: &mut Interpreter, _args: &[String], _out: &mut dyn Write) -> Result<Next> {
    Ok(Next::Continue)
}

fn cmd_set(_shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    if args.len() < 2 {
        let mut vars: Vec<(String, String)> = env::vars().collect();
        vars.sort();
        for (name, value) in vars {
            writeln!(out, "{}={}", name, value)?;
        }
        return Ok(Next::Continue);
    }

    let assignment = args[1..].join(" ");
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => {
            if value.is_empty() {
                env::remove_var(name);
            } else {
                env::set_var(name, value);
            }
        }
        Some(_) => bail!("set: missing variable name"),
        None => {
            if let Ok(value) = env::var(&assignment) {
                writeln!(out, "{}={}", assignment, value)?;
            }
        }
    }
    Ok(Next::Continue)
}

fn cmd_which(shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    for name in &args[1..] {
        if let Some(definition) = shell.aliases().get(name) {
            writeln!(out, "aliased to {}", definition)?;
            continue;
        }
        if is_builtin(name) {
            writeln!(out, "{}: built-in command", name)?;
            continue;
        }
        match find_in_path(name) {
            Some(path) => writeln!(out, "{}", path.display())?,
            None => bail!("which: {}: not found", name),
        }
    }
    Ok(Next::Continue)
}

fn cmd_runewidth(shell: &mut Interpreter, args: &[String], out: &mut dyn Write) -> Result<Next> {
    let Some(target) = args.get(1) else {
        bail!("usage: runewidth CODEPOINT [1|2|-]");
    };
    let ch = parse_codepoint(target)?;
    match args.get(2).map(String::as_str) {
        None => writeln!(out, "U+{:04X} {}", ch as u32, shell.widths().width(ch))?,
        Some("-") => shell.widths().clear_override(ch),
        Some(width) => {
            let width = width
                .parse::<usize>()
                .with_context(|| format!("runewidth: invalid width '{}'", width))?;
            shell.widths().set_override(ch, width)?;
        }
    }
    Ok(Next::Continue)
}

/// Resolve a command name the way the process spawner will
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_should_find_builtins_case_insensitively() {
        assert!(lookup("echo").is_some());
        assert!(lookup("ECHO").is_some());
        assert!(lookup("ls").is_none());
    }

    #[test]
    fn lookup_should_accept_forced_builtin_names() {
        assert!(lookup("__cd__").is_some());
        assert!(lookup("__ls__").is_none());
        assert!(lookup("____").is_none());
    }

    #[test]
    fn is_builtin_should_report_table_members() {
        for name in ["alias", "cd", "cls", "exit", "history", "pwd", "rem", "set", "which", "runewidth"] {
            assert!(is_builtin(name), "{} should be a built-in", name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn find_in_path_should_locate_shell() {
        let found = find_in_path("sh").expect("sh should be on PATH");
        assert!(found.ends_with("sh"));
    }

    #[test]
    fn find_in_path_should_return_none_for_unknown_command() {
        assert!(find_in_path("definitely-not-a-real-command-4711").is_none());
    }
}
