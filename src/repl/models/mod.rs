//! # Models Module
//!
//! State owned by one editing session.

pub mod edit_buffer;

pub use edit_buffer::{EditBuffer, MIN_VIEW_WIDTH};
