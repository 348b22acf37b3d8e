//! # Command History
//!
//! Stores submitted lines for Up/Down navigation and the `history`
//! built-in. The editor only sees the read-only `HistorySource` surface.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Entries kept when no limit is configured
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Read-only view of the history used by the line editor
pub trait HistorySource {
    /// Number of stored entries
    fn len(&self) -> usize;

    /// Entry `index`, oldest first
    fn get(&self, index: usize) -> Option<&str>;

    /// Whether no entries are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory history with optional file persistence
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    max_entries: usize,
    path: Option<PathBuf>,
}

impl History {
    /// Create an empty history that is never written to disk
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
            path: None,
        }
    }

    /// Load history from `path`, one entry per line
    ///
    /// A missing file is not an error; it is created on the first `save`.
    pub fn load(path: impl AsRef<Path>, max_entries: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut history = Self::new(max_entries);

        if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read history file {}", path.display()))?;
            for line in text.lines() {
                history.push(line);
            }
            tracing::debug!(
                "Loaded {} history entries from {}",
                history.len(),
                path.display()
            );
        }

        history.path = Some(path);
        Ok(history)
    }

    /// Append a submitted line
    ///
    /// Blank lines and repeats of the newest entry are skipped.
    pub fn push(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The newest `count` entries with their absolute indices
    pub fn tail(&self, count: usize) -> impl Iterator<Item = (usize, &str)> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, entry)| (i, entry.as_str()))
    }

    /// Write the history back to its file, if it has one
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create history directory {}", parent.display())
                })?;
            }
        }
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to write history file {}", path.display()))?;
        for entry in &self.entries {
            writeln!(file, "{}", entry)?;
        }
        tracing::debug!("Saved {} history entries", self.entries.len());
        Ok(())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HistorySource for History {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}
