//! # Controllers Module
//!
//! Drives the line editor from a stream of input events.

pub mod line_reader;

pub use line_reader::{LineReader, ReadOutcome};
