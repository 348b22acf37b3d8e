//! # Aliases
//!
//! Alias names are matched case-insensitively. A definition may refer to the
//! arguments it was called with:
//!
//! - `$0` .. `$N`: a single argument (`$0` is the alias name itself)
//! - `$*`: all arguments, blank-separated, quoted where they contain blanks
//!
//! When a definition uses no placeholder the arguments are appended.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::args::quote_and_join;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\*|[0-9]+)").expect("valid placeholder regex"))
}

/// Alias definitions keyed by lowercased name
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`; an empty definition removes it
    pub fn define(&mut self, name: &str, definition: &str) {
        let key = name.to_lowercase();
        let definition = definition.trim();
        if definition.is_empty() {
            self.entries.remove(&key);
            tracing::debug!("Removed alias '{}'", key);
        } else {
            tracing::debug!("Alias '{}' = '{}'", key, definition);
            self.entries.insert(key, definition.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All definitions sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite a command whose name is an alias into the line it stands for
    ///
    /// Returns `None` when `args[0]` is not an alias.
    pub fn expand(&self, args: &[String]) -> Option<String> {
        let definition = self.get(args.first()?)?;
        let mut replaced = false;

        let expanded = placeholder_pattern().replace_all(definition, |caps: &Captures| {
            let token = &caps[1];
            if token == "*" {
                replaced = true;
                return quote_and_join(&args[1..]);
            }
            match token.parse::<usize>() {
                Ok(index) => {
                    replaced = true;
                    // Out of range placeholders are left as written
                    args.get(index).cloned().unwrap_or_else(|| caps[0].to_string())
                }
                Err(_) => caps[0].to_string(),
            }
        });

        if replaced {
            Some(expanded.into_owned())
        } else if args.len() > 1 {
            Some(format!("{} {}", definition, quote_and_join(&args[1..])))
        } else {
            Some(definition.to_string())
        }
    }
}
