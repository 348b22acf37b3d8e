//! # Display Width Table
//!
//! Maps a codepoint to the number of terminal cells it occupies. The line
//! editor only understands widths of 1 and 2, so every lookup is clamped
//! into that range.
//!
//! Lookups consult the runtime override map first and fall back to the
//! `unicode-width` classification. The table is created once per process and
//! shared with every edit buffer through an `Arc`; overrides registered while
//! the shell runs (the `runewidth` built-in, the `[width]` config section)
//! apply to the next width query.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use unicode_width::UnicodeWidthChar;

/// Width of a codepoint that occupies a single cell
pub const NARROW: usize = 1;

/// Width of a codepoint that occupies two cells (CJK ideographs, full-width forms)
pub const WIDE: usize = 2;

/// Process-wide codepoint width table with runtime overrides
#[derive(Debug, Default)]
pub struct WidthTable {
    overrides: RwLock<HashMap<char, usize>>,
}

impl WidthTable {
    /// Create a table with no overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared table, the form handed to edit buffers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Display width of `ch`, always 1 or 2
    pub fn width(&self, ch: char) -> usize {
        if let Ok(overrides) = self.overrides.read() {
            if let Some(&w) = overrides.get(&ch) {
                return w;
            }
        }
        default_width(ch)
    }

    /// Sum of the display widths of `chars`
    pub fn width_of<I>(&self, chars: I) -> usize
    where
        I: IntoIterator<Item = char>,
    {
        chars.into_iter().map(|ch| self.width(ch)).sum()
    }

    /// Display width of a string
    pub fn str_width(&self, text: &str) -> usize {
        self.width_of(text.chars())
    }

    /// Register a width exception for `ch`
    ///
    /// Only 1 and 2 are accepted; anything else would break the viewport
    /// arithmetic of the editor.
    pub fn set_override(&self, ch: char, width: usize) -> Result<()> {
        if width != NARROW && width != WIDE {
            return Err(anyhow!(
                "width for U+{:04X} must be 1 or 2, got {}",
                ch as u32,
                width
            ));
        }
        let mut overrides = self
            .overrides
            .write()
            .map_err(|e| anyhow!("width table lock poisoned: {}", e))?;
        overrides.insert(ch, width);
        tracing::debug!("Width override registered: U+{:04X} = {}", ch as u32, width);
        Ok(())
    }

    /// Drop a previously registered exception
    pub fn clear_override(&self, ch: char) {
        if let Ok(mut overrides) = self.overrides.write() {
            overrides.remove(&ch);
        }
    }

    /// Number of registered overrides
    pub fn override_count(&self) -> usize {
        self.overrides.read().map(|o| o.len()).unwrap_or(0)
    }
}

/// Built-in classification: control and zero-width codepoints count as one
/// cell, East-Asian wide ones as two.
fn default_width(ch: char) -> usize {
    match UnicodeWidthChar::width(ch) {
        Some(w) if w >= WIDE => WIDE,
        _ => NARROW,
    }
}

/// Parse a codepoint written as `U+2605`, `0x2605`, `2605` or a literal
/// single character.
pub fn parse_codepoint(text: &str) -> Result<char> {
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"));

    let mut chars = trimmed.chars();
    if let (Some(ch), None, None) = (chars.next(), chars.next(), hex) {
        if !ch.is_ascii_hexdigit() {
            return Ok(ch);
        }
    }

    let digits = hex.unwrap_or(trimmed);
    let value =
        u32::from_str_radix(digits, 16).map_err(|_| anyhow!("invalid codepoint '{}'", text))?;
    char::from_u32(value).ok_or_else(|| anyhow!("U+{:04X} is not a Unicode scalar value", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_should_be_narrow() {
        let table = WidthTable::new();
        assert_eq!(table.width('a'), 1);
        assert_eq!(table.width(' '), 1);
        assert_eq!(table.width('~'), 1);
    }

    #[test]
    fn cjk_should_be_wide() {
        let table = WidthTable::new();
        assert_eq!(table.width('あ'), 2);
        assert_eq!(table.width('漢'), 2);
        assert_eq!(table.width('Ａ'), 2);
    }

    #[test]
    fn control_and_combining_should_count_as_one_cell() {
        let table = WidthTable::new();
        assert_eq!(table.width('\u{7}'), 1);
        assert_eq!(table.width('\u{301}'), 1);
    }

    #[test]
    fn override_should_take_precedence() {
        let table = WidthTable::new();
        assert_eq!(table.width('★'), 1);

        table.set_override('★', 2).unwrap();
        assert_eq!(table.width('★'), 2);
        assert_eq!(table.override_count(), 1);

        table.set_override('漢', 1).unwrap();
        assert_eq!(table.width('漢'), 1);

        table.clear_override('★');
        assert_eq!(table.width('★'), 1);
    }

    #[test]
    fn override_should_reject_unsupported_widths() {
        let table = WidthTable::new();
        assert!(table.set_override('x', 0).is_err());
        assert!(table.set_override('x', 3).is_err());
        assert_eq!(table.override_count(), 0);
    }

    #[test]
    fn str_width_should_sum_mixed_text() {
        let table = WidthTable::new();
        assert_eq!(table.str_width("abc"), 3);
        assert_eq!(table.str_width("aあb"), 4);
        assert_eq!(table.str_width(""), 0);
    }

    #[test]
    fn parse_codepoint_should_accept_common_spellings() {
        assert_eq!(parse_codepoint("U+2605").unwrap(), '★');
        assert_eq!(parse_codepoint("0x41").unwrap(), 'A');
        assert_eq!(parse_codepoint("3042").unwrap(), 'あ');
        assert_eq!(parse_codepoint("★").unwrap(), '★');
        assert!(parse_codepoint("U+D800").is_err());
        assert!(parse_codepoint("zz").is_err());
    }
}
