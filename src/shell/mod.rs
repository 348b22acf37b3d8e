//! # Shell
//!
//! Command interpretation on top of the line editor: argument splitting,
//! aliases, built-in commands, external processes and the session loop.

pub mod alias;
pub mod args;
pub mod builtins;
pub mod interpreter;
pub mod session;

pub use alias::AliasTable;
pub use args::{quote_and_join, CommandLine};
pub use builtins::find_in_path;
pub use interpreter::{Interpreter, Next};
pub use session::{render_prompt, Shell};
