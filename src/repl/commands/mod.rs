//! # Key Operations
//!
//! The closed set of editing operations a key can be bound to, and the
//! control signal every operation returns to the read loop.
//!
//! Operation names follow the usual readline vocabulary so they can be used
//! in the `[keys]` section of the configuration file.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};

pub mod keymap;

pub use keymap::{KeyBinding, Keymap};

/// What the read loop should do after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep reading keys
    Continue,
    /// Hand the current line to the interpreter
    Enter,
    /// Cancel the input request (end of input on an empty line)
    Abort,
}

/// One editing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOperation {
    Submit,
    Interrupt,
    MoveToStart,
    MoveBack,
    MoveToEnd,
    MoveForward,
    Backspace,
    DeleteForward,
    DeleteOrAbort,
    SelfInsert,
    InsertDiagnostic,
    KillToEnd,
    ClearLine,
    ClearBeforeCursor,
    RedrawScreen,
    Paste,
    HistoryPrev,
    HistoryNext,
    Complete,
    NoOp,
}

const NAMES: &[(KeyOperation, &str)] = &[
    (KeyOperation::Submit, "accept_line"),
    (KeyOperation::Interrupt, "intr"),
    (KeyOperation::MoveToStart, "beginning_of_line"),
    (KeyOperation::MoveBack, "backward_char"),
    (KeyOperation::MoveToEnd, "end_of_line"),
    (KeyOperation::MoveForward, "forward_char"),
    (KeyOperation::Backspace, "backward_delete_char"),
    (KeyOperation::DeleteForward, "delete_char"),
    (KeyOperation::DeleteOrAbort, "delete_or_abort"),
    (KeyOperation::SelfInsert, "self_insert"),
    (KeyOperation::InsertDiagnostic, "insert_keycode"),
    (KeyOperation::KillToEnd, "kill_line"),
    (KeyOperation::ClearLine, "kill_whole_line"),
    (KeyOperation::ClearBeforeCursor, "unix_line_discard"),
    (KeyOperation::RedrawScreen, "clear_screen"),
    (KeyOperation::Paste, "yank"),
    (KeyOperation::HistoryPrev, "previous_history"),
    (KeyOperation::HistoryNext, "next_history"),
    (KeyOperation::Complete, "complete"),
    (KeyOperation::NoOp, "pass"),
];

impl KeyOperation {
    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(op, _)| op == self)
            .map(|(_, name)| *name)
            .unwrap_or("pass")
    }

    /// Every operation, in table order
    pub fn all() -> impl Iterator<Item = KeyOperation> {
        NAMES.iter().map(|(op, _)| *op)
    }
}

impl fmt::Display for KeyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        NAMES
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(op, _)| *op)
            .ok_or_else(|| anyhow!("unknown key operation '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_should_have_a_unique_name() {
        let mut names: Vec<_> = KeyOperation::all().map(|op| op.name()).collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn names_should_parse_back() {
        for op in KeyOperation::all() {
            assert_eq!(op.name().parse::<KeyOperation>().unwrap(), op);
        }
    }

    #[test]
    fn parse_should_accept_case_and_dash_variants() {
        assert_eq!(
            "BEGINNING-OF-LINE".parse::<KeyOperation>().unwrap(),
            KeyOperation::MoveToStart
        );
        assert!("fly_to_moon".parse::<KeyOperation>().is_err());
    }
}
