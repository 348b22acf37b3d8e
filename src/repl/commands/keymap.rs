//! # Keymap
//!
//! Maps a decoded key to the operation it triggers. Printable characters
//! without Ctrl/Alt fall through to `SelfInsert`; everything else that is
//! not bound maps to `NoOp`.
//!
//! Key names accepted by `[keys]` in the configuration file:
//! `C_A`..`C_Z` (Ctrl), `M_A`..`M_Z` (Alt), and `UP`, `DOWN`, `LEFT`,
//! `RIGHT`, `HOME`, `END`, `DEL`, `BACKSPACE`, `ENTER`, `TAB`, `ESCAPE`.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::KeyOperation;

/// Normalized key used as the keymap index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        // Shift is already reflected in the character itself
        let modifiers = modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        let code = match code {
            KeyCode::Char(ch) if !modifiers.is_empty() => KeyCode::Char(ch.to_ascii_lowercase()),
            other => other,
        };
        Self { code, modifiers }
    }

    /// Ctrl + `ch`
    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    /// A key without modifiers
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<&KeyEvent> for KeyBinding {
    fn from(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl FromStr for KeyBinding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        let modified = |prefix: &str, modifiers: KeyModifiers| {
            name.strip_prefix(prefix).and_then(|rest| {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(Self::new(KeyCode::Char(ch), modifiers)),
                    _ => None,
                }
            })
        };

        if let Some(binding) = modified("C_", KeyModifiers::CONTROL) {
            return Ok(binding);
        }
        if let Some(binding) = modified("M_", KeyModifiers::ALT) {
            return Ok(binding);
        }

        let code = match name.as_str() {
            "UP" => KeyCode::Up,
            "DOWN" => KeyCode::Down,
            "LEFT" => KeyCode::Left,
            "RIGHT" => KeyCode::Right,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "DEL" | "DELETE" => KeyCode::Delete,
            "BACKSPACE" => KeyCode::Backspace,
            "ENTER" => KeyCode::Enter,
            "TAB" => KeyCode::Tab,
            "ESCAPE" | "ESC" => KeyCode::Esc,
            _ => return Err(anyhow!("unknown key name '{}'", s)),
        };
        Ok(Self::plain(code))
    }
}

/// Key → operation table
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyBinding, KeyOperation>,
}

impl Keymap {
    /// Keymap with no bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `op`, replacing any previous binding
    pub fn bind(&mut self, key: KeyBinding, op: KeyOperation) {
        self.bindings.insert(key, op);
    }

    /// Bind from configuration names such as `C_A` and `beginning_of_line`
    pub fn bind_names(&mut self, key: &str, op: &str) -> anyhow::Result<()> {
        let binding: KeyBinding = key.parse()?;
        let operation: KeyOperation = op.parse()?;
        tracing::debug!("Binding {} to {}", key, operation);
        self.bind(binding, operation);
        Ok(())
    }

    /// Operation for a decoded key event
    pub fn lookup(&self, event: &KeyEvent) -> KeyOperation {
        let binding = KeyBinding::from(event);
        if let Some(op) = self.bindings.get(&binding) {
            return *op;
        }
        match event.code {
            KeyCode::Char(ch) if binding.modifiers.is_empty() && !ch.is_control() => {
                KeyOperation::SelfInsert
            }
            _ => KeyOperation::NoOp,
        }
    }

    /// Codepoint a key event stands for, as used by `SelfInsert` and
    /// `InsertDiagnostic`
    pub fn unicode_of(event: &KeyEvent) -> char {
        match event.code {
            KeyCode::Char(ch) if event.modifiers.contains(KeyModifiers::CONTROL) => {
                let code = (ch.to_ascii_lowercase() as u32) & 0x1F;
                char::from_u32(code).unwrap_or('\0')
            }
            KeyCode::Char(ch) => ch,
            KeyCode::Enter => '\r',
            KeyCode::Tab => '\t',
            KeyCode::Backspace => '\u{8}',
            KeyCode::Esc => '\u{1b}',
            KeyCode::Delete => '\u{7f}',
            _ => '\0',
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        use KeyOperation::*;

        let mut keymap = Self::empty();
        let ctrl = [
            ('a', MoveToStart),
            ('b', MoveBack),
            ('c', Interrupt),
            ('d', DeleteOrAbort),
            ('e', MoveToEnd),
            ('f', MoveForward),
            ('h', Backspace),
            ('j', Submit),
            ('k', KillToEnd),
            ('l', RedrawScreen),
            ('m', Submit),
            ('n', HistoryNext),
            ('p', HistoryPrev),
            ('q', InsertDiagnostic),
            ('u', ClearBeforeCursor),
            ('y', Paste),
        ];
        for (ch, op) in ctrl {
            keymap.bind(KeyBinding::ctrl(ch), op);
        }

        let plain = [
            (KeyCode::Enter, Submit),
            (KeyCode::Backspace, Backspace),
            (KeyCode::Delete, DeleteForward),
            (KeyCode::Home, MoveToStart),
            (KeyCode::End, MoveToEnd),
            (KeyCode::Left, MoveBack),
            (KeyCode::Right, MoveForward),
            (KeyCode::Up, HistoryPrev),
            (KeyCode::Down, HistoryNext),
            (KeyCode::Tab, Complete),
            (KeyCode::Esc, ClearLine),
        ];
        for (code, op) in plain {
            keymap.bind(KeyBinding::plain(code), op);
        }
        keymap
    }
}
