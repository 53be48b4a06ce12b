//! Hexagram casting and catalog
//!
//! - Three-coin casting with the traditional line distribution
//! - King Wen numbering and canonical names
//! - Trigram decomposition and relating hexagrams

pub mod caster;
pub mod catalog;
pub mod types;

// Re-export commonly used types
pub use caster::HexagramCaster;
pub use catalog::{name_of, number_for_lines, number_for_pattern, CATALOG};
pub use types::{changing_lines_of, CastingMethod, Hexagram, LineValue, Trigram, LINE_COUNT};
