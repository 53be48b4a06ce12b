//! Command-line argument parsing for IChingSage
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::hexagram::LINE_COUNT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

/// IChingSage - I Ching coin casting with cost-aware AI interpretation
#[derive(Parser, Debug)]
#[command(name = "ichingsage")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Cast I Ching hexagrams and interpret them with an LLM", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Cast a hexagram with three virtual coins and draw it
    Cast {
        /// Seed for a reproducible cast
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Ask a question and receive an interpretation
    Ask {
        /// The question to put to the oracle
        #[arg(value_name = "QUESTION")]
        question: String,

        /// User the consultation is recorded for
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Manually entered line values, bottom to top (e.g. 7,8,9,7,6,8)
        #[arg(long, value_name = "VALUES")]
        lines: Option<String>,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Log level forced by the flags; `None` defers to the configured level
    pub fn log_level(&self) -> Option<Level> {
        match self {
            Verbosity::Quiet => Some(Level::ERROR),
            Verbosity::Normal => None,
            Verbosity::Verbose => Some(Level::DEBUG),
            Verbosity::VeryVerbose => Some(Level::TRACE),
        }
    }
}

/// Parse a configured level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::INFO)
}

/// Parse `--lines` input: six comma or space separated values
pub fn parse_line_values(input: &str) -> Result<[u8; LINE_COUNT], String> {
    let values: Vec<u8> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| format!("'{}' is not a line value", part))
        })
        .collect::<Result<_, _>>()?;

    values
        .try_into()
        .map_err(|v: Vec<u8>| format!("Expected {} line values, got {}", LINE_COUNT, v.len()))
}
