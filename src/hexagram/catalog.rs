//! Static King Wen catalog
//!
//! Two fixed tables: the 64 canonical names in sequence order, and the
//! lower × upper trigram table that maps any six-line pattern to its
//! sequence number. Both are immutable for the life of the process.

use crate::errors::{ConsultationError, Result};
use crate::hexagram::types::{LineValue, Trigram, LINE_COUNT};

/// Canonical names, index = number - 1
pub const CATALOG: [&str; 64] = [
    "The Creative",
    "The Receptive",
    "Difficulty at the Beginning",
    "Youthful Folly",
    "Waiting",
    "Conflict",
    "The Army",
    "Holding Together",
    "The Taming Power of the Small",
    "Treading",
    "Peace",
    "Standstill",
    "Fellowship with Men",
    "Possession in Great Measure",
    "Modesty",
    "Enthusiasm",
    "Following",
    "Work on What Has Been Spoiled",
    "Approach",
    "Contemplation",
    "Biting Through",
    "Grace",
    "Splitting Apart",
    "Return",
    "Innocence",
    "The Taming Power of the Great",
    "The Corners of the Mouth",
    "Preponderance of the Great",
    "The Abysmal",
    "The Clinging",
    "Influence",
    "Duration",
    "Retreat",
    "The Power of the Great",
    "Progress",
    "Darkening of the Light",
    "The Family",
    "Opposition",
    "Obstruction",
    "Deliverance",
    "Decrease",
    "Increase",
    "Break-through",
    "Coming to Meet",
    "Gathering Together",
    "Pushing Upward",
    "Oppression",
    "The Well",
    "Revolution",
    "The Caldron",
    "The Arousing",
    "Keeping Still",
    "Development",
    "The Marrying Maiden",
    "Abundance",
    "The Wanderer",
    "The Gentle",
    "The Joyous",
    "Dispersion",
    "Limitation",
    "Inner Truth",
    "Preponderance of the Small",
    "After Completion",
    "Before Completion",
];

/// King Wen numbers indexed `[lower][upper]`, both in `Trigram` order:
/// Qian, Zhen, Kan, Gen, Kun, Xun, Li, Dui
const KING_WEN_TABLE: [[u8; 8]; 8] = [
    [1, 34, 5, 26, 11, 9, 14, 43],
    [25, 51, 3, 27, 24, 42, 21, 17],
    [6, 40, 29, 4, 7, 59, 64, 47],
    [33, 62, 39, 52, 15, 53, 56, 31],
    [12, 16, 8, 23, 2, 20, 35, 45],
    [44, 32, 48, 18, 46, 57, 50, 28],
    [13, 55, 63, 22, 36, 37, 30, 49],
    [10, 54, 60, 41, 19, 61, 38, 58],
];

/// Canonical name for a King Wen number
pub fn name_of(number: u32) -> Result<&'static str> {
    if !(1..=64).contains(&number) {
        return Err(ConsultationError::HexagramOutOfRange { number });
    }
    Ok(CATALOG[(number - 1) as usize])
}

/// Sequence number for a pair of trigrams
pub fn number_for_trigrams(lower: Trigram, upper: Trigram) -> u8 {
    KING_WEN_TABLE[lower.table_index()][upper.table_index()]
}

/// Sequence number for six lines in their primary (untransformed) reading
pub fn number_for_lines(lines: &[LineValue; LINE_COUNT]) -> u8 {
    let lower = Trigram::from_lines(&lines[0..3]);
    let upper = Trigram::from_lines(&lines[3..6]);
    number_for_trigrams(lower, upper)
}

/// Sequence number for a 6-bit pattern (bit 0 = bottom line, set = yang)
pub fn number_for_pattern(pattern: u8) -> u8 {
    let lower = Trigram::from_bits(pattern & 0b111);
    let upper = Trigram::from_bits((pattern >> 3) & 0b111);
    number_for_trigrams(lower, upper)
}
