//! # Text Measurement
//!
//! Display-width lookups and column layout of candidate lists.

pub mod column_layout;
pub mod width_table;

pub use column_layout::{print_columns, strip_ansi};
pub use width_table::{parse_codepoint, WidthTable};
