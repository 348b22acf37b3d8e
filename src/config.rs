//! Configuration file handling for conshell
//!
//! The configuration is an INI file:
//!
//! ```ini
//! [shell]
//! prompt = $P$G
//!
//! [alias]
//! ll = ls -l $*
//!
//! [width]
//! U+2605 = 2
//!
//! [keys]
//! C_O = kill_whole_line
//!
//! [history]
//! file = ~/.conshell/history
//! max = 1000
//! ```
//!
//! A missing file is not an error; every setting has a default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ini::Ini;

use crate::repl::{parse_codepoint, Keymap, WidthTable, DEFAULT_MAX_ENTRIES};
use crate::shell::AliasTable;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "~/.conshell/config";

/// Environment variable name for overriding the configuration path
pub const CONFIG_PATH_ENV_VAR: &str = "CONSHELL_CONFIG_PATH";

/// Environment variable holding the log filter directives
pub const LOG_FILTER_ENV_VAR: &str = "CONSHELL_LOG";

/// Environment variable naming the log file
pub const LOG_FILE_ENV_VAR: &str = "CONSHELL_LOG_FILE";

/// Prompt used when the configuration sets none
pub const DEFAULT_PROMPT: &str = "$P$G ";

/// Get the configuration file path, checking environment variable first, then falling back to default
pub fn get_config_path() -> String {
    std::env::var_os(CONFIG_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Settings read from the configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub prompt: String,
    pub aliases: Vec<(String, String)>,
    pub widths: Vec<(char, usize)>,
    pub keys: Vec<(String, String)>,
    pub history_file: Option<PathBuf>,
    pub history_max: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            aliases: Vec::new(),
            widths: Vec::new(),
            keys: Vec::new(),
            history_file: None,
            history_max: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl ShellConfig {
    /// Load the file at `path` (tilde-expanded); defaults if it does not exist
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).into_owned();
        if !Path::new(&expanded).exists() {
            tracing::debug!("No configuration at {}, using defaults", expanded);
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(&expanded)
            .with_context(|| format!("Failed to read configuration {}", expanded))?;
        tracing::info!("Loaded configuration from {}", expanded);
        Ok(Self::from_ini(&ini))
    }

    /// Parse configuration text
    pub fn parse(text: &str) -> Result<Self> {
        let ini = Ini::load_from_str(text).context("Invalid configuration")?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        let mut config = Self::default();

        for (section, props) in ini.iter() {
            match section.map(str::to_lowercase).as_deref() {
                Some("shell") => {
                    for (key, value) in props.iter() {
                        match key.to_lowercase().as_str() {
                            "prompt" => config.prompt = value.to_string(),
                            _ => tracing::warn!("Unknown [shell] setting '{}'", key),
                        }
                    }
                }
                Some("alias") => {
                    config.aliases.extend(
                        props
                            .iter()
                            .map(|(name, definition)| (name.to_string(), definition.to_string())),
                    );
                }
                Some("width") => {
                    for (key, value) in props.iter() {
                        match (parse_codepoint(key), value.trim().parse::<usize>()) {
                            (Ok(ch), Ok(width)) => config.widths.push((ch, width)),
                            _ => tracing::warn!("Ignoring width setting '{} = {}'", key, value),
                        }
                    }
                }
                Some("keys") => {
                    config.keys.extend(
                        props
                            .iter()
                            .map(|(key, op)| (key.to_string(), op.to_string())),
                    );
                }
                Some("history") => {
                    for (key, value) in props.iter() {
                        match key.to_lowercase().as_str() {
                            "file" => {
                                let path = shellexpand::tilde(value.trim()).into_owned();
                                config.history_file = Some(PathBuf::from(path));
                            }
                            "max" => match value.trim().parse::<usize>() {
                                Ok(max) => config.history_max = max,
                                Err(_) => tracing::warn!("Invalid history max '{}'", value),
                            },
                            _ => tracing::warn!("Unknown [history] setting '{}'", key),
                        }
                    }
                }
                None if props.is_empty() => {}
                other => tracing::warn!("Unknown configuration section {:?}", other),
            }
        }

        config
    }

    /// Alias table holding the `[alias]` definitions
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::new();
        for (name, definition) in &self.aliases {
            table.define(name, definition);
        }
        table
    }

    /// Install the `[width]` overrides; invalid widths are skipped with a warning
    pub fn apply_widths(&self, widths: &WidthTable) {
        for &(ch, width) in &self.widths {
            if let Err(e) = widths.set_override(ch, width) {
                tracing::warn!("{}", e);
            }
        }
    }

    /// Default keymap with the `[keys]` rebindings applied
    pub fn keymap(&self) -> Keymap {
        let mut keymap = Keymap::default();
        for (key, op) in &self.keys {
            if let Err(e) = keymap.bind_names(key, op) {
                tracing::warn!("Ignoring key binding '{} = {}': {}", key, op, e);
            }
        }
        keymap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::KeyOperation;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    const SAMPLE: &str = r#"
[shell]
prompt = >>

[alias]
ll = ls -l $*
gs = git status

[width]
U+2605 = 2
U+00E9 = 3

[keys]
C_O = kill_whole_line
C_T = no_such_operation

[history]
file = /tmp/conshell-history
max = 50
"#;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "~/.conshell/config");
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(CONFIG_PATH_ENV_VAR, "CONSHELL_CONFIG_PATH");
    }

    #[test]
    fn test_get_config_path_env_override() {
        let original = std::env::var_os(CONFIG_PATH_ENV_VAR);

        let test_path = "/custom/conshell/config";
        std::env::set_var(CONFIG_PATH_ENV_VAR, test_path);
        assert_eq!(get_config_path(), test_path);

        match original {
            Some(val) => std::env::set_var(CONFIG_PATH_ENV_VAR, val),
            None => std::env::remove_var(CONFIG_PATH_ENV_VAR),
        }
    }

    #[test]
    fn parse_should_read_every_section() {
        let config = ShellConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.prompt, ">>");
        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.widths, vec![('\u{2605}', 2), ('\u{00E9}', 3)]);
        assert_eq!(config.keys.len(), 2);
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/conshell-history")));
        assert_eq!(config.history_max, 50);
    }

    #[test]
    fn alias_table_should_hold_definitions() {
        let config = ShellConfig::parse(SAMPLE).unwrap();
        let table = config.alias_table();

        assert_eq!(table.get("ll"), Some("ls -l $*"));
        assert_eq!(table.get("GS"), Some("git status"));
    }

    #[test]
    fn apply_widths_should_skip_invalid_widths() {
        let config = ShellConfig::parse(SAMPLE).unwrap();
        let widths = WidthTable::new();

        config.apply_widths(&widths);

        assert_eq!(widths.width('\u{2605}'), 2);
        assert_eq!(widths.width('\u{00E9}'), 1);
        assert_eq!(widths.override_count(), 1);
    }

    #[test]
    fn keymap_should_apply_valid_rebindings() {
        let config = ShellConfig::parse(SAMPLE).unwrap();
        let keymap = config.keymap();

        let ctrl_o = KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL);
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(keymap.lookup(&ctrl_o), KeyOperation::ClearLine);
        assert_eq!(keymap.lookup(&ctrl_t), KeyOperation::NoOp);
    }

    #[test]
    fn load_should_default_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        let config = ShellConfig::load(path.to_str().unwrap()).unwrap();

        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn load_should_read_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "[shell]\nprompt = % \n").unwrap();

        let config = ShellConfig::load(path.to_str().unwrap()).unwrap();

        assert_eq!(config.prompt, "%");
    }
}
