//! # Completion Candidates
//!
//! Supplies candidate strings for the word before the cursor. The editor
//! only inserts the shared prefix and lists the rest; ranking and search are
//! left to implementations.

use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

/// Source of completion candidates
pub trait Completer {
    /// Full replacements for `word`, each starting with `word`
    fn complete(&self, word: &str) -> Vec<String>;
}

/// Completes file and directory names relative to the working directory
#[derive(Debug, Default, Clone)]
pub struct FileCompleter;

impl FileCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for FileCompleter {
    fn complete(&self, word: &str) -> Vec<String> {
        let split = word.rfind(['/', MAIN_SEPARATOR]).map(|i| i + 1).unwrap_or(0);
        let (dir_part, name_part) = word.split_at(split);

        let expanded = shellexpand::tilde(dir_part);
        let dir = if dir_part.is_empty() {
            Path::new(".")
        } else {
            Path::new(expanded.as_ref())
        };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Completion skipped for {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let lowered = name_part.to_lowercase();
        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if !name.to_lowercase().starts_with(&lowered) {
                    return None;
                }
                if name.starts_with('.') && !name_part.starts_with('.') {
                    return None;
                }
                let mut candidate = format!("{}{}", dir_part, name);
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    candidate.push(MAIN_SEPARATOR);
                }
                Some(candidate)
            })
            .collect();
        candidates.sort();
        candidates
    }
}

/// Longest prefix shared by every entry of `list`, compared case-insensitively
///
/// The prefix is returned with the letter case of the first entry.
pub fn common_prefix(list: &[String]) -> String {
    let Some(first) = list.first() else {
        return String::new();
    };
    let mut prefix: Vec<char> = first.chars().collect();
    for other in &list[1..] {
        let shared = prefix
            .iter()
            .zip(other.chars())
            .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
            .count();
        prefix.truncate(shared);
    }
    prefix.into_iter().collect()
}
