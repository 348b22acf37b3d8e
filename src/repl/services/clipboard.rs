//! # Clipboard Port
//!
//! One shared text slot used by kill (Ctrl-K) and yank (Ctrl-Y).
//! Supports both memory-based and system clipboard implementations.
//!
//! The slot can be written from outside the editor at any time, so every
//! `read` is a fresh snapshot and each call locks for its own duration only.

use anyhow::{anyhow, Result};
use std::sync::Mutex;

/// Trait for clipboard implementations
pub trait ClipboardPort: Send + Sync {
    /// Current text of the slot
    fn read(&self) -> Result<String>;

    /// Replace the text of the slot
    fn write(&self, text: &str) -> Result<()>;
}

/// Memory-based clipboard implementation
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create a new empty memory clipboard
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read(&self) -> Result<String> {
        let content = self
            .content
            .lock()
            .map_err(|e| anyhow!("Failed to lock clipboard: {}", e))?;
        content
            .clone()
            .ok_or_else(|| anyhow!("Clipboard is empty"))
    }

    fn write(&self, text: &str) -> Result<()> {
        tracing::debug!("Storing {} characters in memory clipboard", text.len());
        let mut content = self
            .content
            .lock()
            .map_err(|e| anyhow!("Failed to lock clipboard: {}", e))?;
        *content = Some(text.to_string());
        Ok(())
    }
}

/// System clipboard implementation
pub struct SystemClipboard {
    clipboard: Mutex<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("clipboard", &"<system clipboard>")
            .finish()
    }
}

impl SystemClipboard {
    /// Connect to the system clipboard
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| anyhow!("Failed to access system clipboard: {}", e))?;

        Ok(Self {
            clipboard: Mutex::new(clipboard),
        })
    }
}

impl ClipboardPort for SystemClipboard {
    fn read(&self) -> Result<String> {
        let mut clipboard = self
            .clipboard
            .lock()
            .map_err(|e| anyhow!("Failed to lock clipboard: {}", e))?;
        clipboard
            .get_text()
            .map_err(|e| anyhow!("Failed to read clipboard text: {}", e))
    }

    fn write(&self, text: &str) -> Result<()> {
        tracing::debug!("Storing {} characters in system clipboard", text.len());
        let mut clipboard = self
            .clipboard
            .lock()
            .map_err(|e| anyhow!("Failed to lock clipboard: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow!("Failed to set clipboard text: {}", e))
    }
}

/// Open the clipboard the shell should use
///
/// Falls back to a memory slot when the system clipboard is disabled or
/// cannot be reached (no display server, headless CI).
pub fn open_clipboard(use_system: bool) -> Box<dyn ClipboardPort> {
    if use_system {
        match SystemClipboard::new() {
            Ok(clipboard) => {
                tracing::info!("Using system clipboard");
                return Box::new(clipboard);
            }
            Err(e) => {
                tracing::warn!("Falling back to memory clipboard: {}", e);
            }
        }
    }
    Box::new(MemoryClipboard::new())
}
