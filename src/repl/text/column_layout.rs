//! # Column Layout
//!
//! Lays out a list of names in as many columns as fit the terminal,
//! column-major like `ls`. Used for completion candidates. Entries may
//! carry ANSI colour sequences; those are stripped before measuring.

use std::sync::OnceLock;

use regex::Regex;

use super::WidthTable;

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("\x1B[^a-zA-Z]*[A-Za-z]").expect("ANSI escape pattern is valid")
    })
}

/// Remove ANSI escape sequences from `text`
pub fn strip_ansi(text: &str) -> String {
    ansi_pattern().replace_all(text, "").into_owned()
}

/// Arrange `nodes` into lines no wider than `width` columns
///
/// Every column is as wide as the widest entry plus one separator blank.
/// Trailing blanks are trimmed from each line.
pub fn print_columns(nodes: &[String], width: usize, widths: &WidthTable) -> Vec<String> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let measured: Vec<usize> = nodes
        .iter()
        .map(|node| widths.str_width(&strip_ansi(node)))
        .collect();
    let max_len = measured.iter().copied().max().unwrap_or(1).max(1);

    let per_line = (width.saturating_sub(1) / (max_len + 1)).max(1);
    let line_count = nodes.len().div_ceil(per_line);

    let mut lines = vec![String::new(); line_count];
    for (i, (node, node_width)) in nodes.iter().zip(&measured).enumerate() {
        let line = &mut lines[i % line_count];
        line.push_str(node);
        line.push_str(&" ".repeat(max_len + 1 - node_width));
    }

    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .collect()
}
