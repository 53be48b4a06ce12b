//! CLI module for IChingSage
//!
//! Command-line argument parsing; configuration lives in `crate::config`.

pub mod args;

pub use args::{parse_level, parse_line_values, Args, Commands, Verbosity};
