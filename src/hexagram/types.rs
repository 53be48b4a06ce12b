//! Core hexagram data structures
//!
//! Lines are stored bottom-to-top (index 0 is the first line cast), which is
//! the traditional reading order. Changing lines are 1-indexed positions.

use crate::errors::{ConsultationError, Result};
use crate::hexagram::catalog;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of lines in a hexagram
pub const LINE_COUNT: usize = 6;

/// Outcome of a three-coin toss for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LineValue {
    /// 6: changing yin
    OldYin,
    /// 7: stable yang
    YoungYang,
    /// 8: stable yin
    YoungYin,
    /// 9: changing yang
    OldYang,
}

impl LineValue {
    /// Traditional numeric value (6, 7, 8 or 9)
    pub fn value(self) -> u8 {
        match self {
            LineValue::OldYin => 6,
            LineValue::YoungYang => 7,
            LineValue::YoungYin => 8,
            LineValue::OldYang => 9,
        }
    }

    /// Build from the sum of three coins
    pub fn from_value(value: u8) -> Result<Self> {
        match value {
            6 => Ok(LineValue::OldYin),
            7 => Ok(LineValue::YoungYang),
            8 => Ok(LineValue::YoungYin),
            9 => Ok(LineValue::OldYang),
            other => Err(ConsultationError::LineValueOutOfRange { value: other }),
        }
    }

    /// Old lines (6 and 9) transform in the relating hexagram
    pub fn is_changing(self) -> bool {
        matches!(self, LineValue::OldYin | LineValue::OldYang)
    }

    /// Yang in the primary reading
    pub fn is_yang(self) -> bool {
        matches!(self, LineValue::YoungYang | LineValue::OldYang)
    }

    /// The line after transformation. Stable lines are unchanged.
    pub fn changed(self) -> Self {
        match self {
            LineValue::OldYin => LineValue::YoungYang,
            LineValue::OldYang => LineValue::YoungYin,
            stable => stable,
        }
    }

    /// Line glyph; changing lines carry a marker
    pub fn symbol(self) -> &'static str {
        match self {
            LineValue::OldYin => "━━  ━━ x",
            LineValue::YoungYang => "━━━━━━",
            LineValue::YoungYin => "━━  ━━",
            LineValue::OldYang => "━━━━━━ o",
        }
    }
}

impl TryFrom<u8> for LineValue {
    type Error = ConsultationError;

    fn try_from(value: u8) -> Result<Self> {
        LineValue::from_value(value)
    }
}

impl From<LineValue> for u8 {
    fn from(line: LineValue) -> u8 {
        line.value()
    }
}

impl fmt::Display for LineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How the hexagram for a consultation was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CastingMethod {
    #[default]
    DigitalCoins,
    ManualEntry,
}

impl fmt::Display for CastingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastingMethod::DigitalCoins => write!(f, "digital_coins"),
            CastingMethod::ManualEntry => write!(f, "manual_entry"),
        }
    }
}

/// A cast hexagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hexagram {
    /// King Wen sequence number (1-64)
    pub number: u8,

    /// Canonical name from the catalog
    pub name: String,

    /// Lines, bottom to top
    pub lines: [LineValue; LINE_COUNT],

    /// Sorted 1-indexed positions of lines valued 6 or 9
    pub changing_lines: Vec<u8>,
}

impl Hexagram {
    /// Build a hexagram from six lines, deriving number, name and changing lines
    pub fn from_lines(lines: [LineValue; LINE_COUNT]) -> Self {
        let number = catalog::number_for_lines(&lines);
        let name = catalog::CATALOG[(number - 1) as usize].to_string();

        Self {
            number,
            name,
            changing_lines: changing_lines_of(&lines),
            lines,
        }
    }

    /// Build from raw numeric values such as a manual entry `[6, 7, 8, 9, 7, 8]`
    pub fn from_values(values: [u8; LINE_COUNT]) -> Result<Self> {
        let mut lines = [LineValue::YoungYang; LINE_COUNT];
        for (slot, value) in lines.iter_mut().zip(values) {
            *slot = LineValue::from_value(value)?;
        }
        Ok(Self::from_lines(lines))
    }

    /// Check the structural invariants of a hexagram supplied from outside
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.number) {
            return Err(ConsultationError::InvalidHexagram(format!(
                "number {} is outside 1-64",
                self.number
            )));
        }

        let derived = catalog::number_for_lines(&self.lines);
        if self.number != derived {
            return Err(ConsultationError::InvalidHexagram(format!(
                "number {} does not match its lines (expected {})",
                self.number, derived
            )));
        }

        let canonical = catalog::CATALOG[(self.number - 1) as usize];
        if self.name != canonical {
            return Err(ConsultationError::InvalidHexagram(format!(
                "name {:?} does not match hexagram {} ({:?})",
                self.name, self.number, canonical
            )));
        }

        let expected = changing_lines_of(&self.lines);
        if self.changing_lines != expected {
            return Err(ConsultationError::InvalidHexagram(format!(
                "changing lines {:?} do not match line values (expected {:?})",
                self.changing_lines, expected
            )));
        }

        Ok(())
    }

    pub fn has_changing_lines(&self) -> bool {
        !self.changing_lines.is_empty()
    }

    /// Comma-separated changing line positions, e.g. "1, 4"
    pub fn changing_lines_label(&self) -> String {
        self.changing_lines
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The hexagram obtained once every changing line has transformed
    pub fn relating(&self) -> Option<Hexagram> {
        if !self.has_changing_lines() {
            return None;
        }

        let mut lines = self.lines;
        for line in lines.iter_mut() {
            *line = line.changed();
        }
        Some(Hexagram::from_lines(lines))
    }

    /// Lower (inner) trigram, lines 1-3
    pub fn lower_trigram(&self) -> Trigram {
        Trigram::from_lines(&self.lines[0..3])
    }

    /// Upper (outer) trigram, lines 4-6
    pub fn upper_trigram(&self) -> Trigram {
        Trigram::from_lines(&self.lines[3..6])
    }

    /// Draw the figure top line first, as it is read on paper
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .enumerate()
            .rev()
            .map(|(i, line)| format!("{} {}", i + 1, line.symbol()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Hexagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hexagram {}: {}", self.number, self.name)
    }
}

/// Sorted 1-indexed positions whose value is 6 or 9
pub fn changing_lines_of(lines: &[LineValue]) -> Vec<u8> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.is_changing())
        .map(|(i, _)| (i + 1) as u8)
        .collect()
}

/// The eight trigrams, in King Wen table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigram {
    Qian,
    Zhen,
    Kan,
    Gen,
    Kun,
    Xun,
    Li,
    Dui,
}

impl Trigram {
    /// Read a trigram from three lines, bottom first
    pub fn from_lines(lines: &[LineValue]) -> Self {
        let bits = lines
            .iter()
            .take(3)
            .enumerate()
            .fold(0u8, |acc, (i, line)| acc | ((line.is_yang() as u8) << i));
        Self::from_bits(bits)
    }

    /// Bit 0 is the bottom line; a set bit is yang
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b111 => Trigram::Qian,
            0b001 => Trigram::Zhen,
            0b010 => Trigram::Kan,
            0b100 => Trigram::Gen,
            0b000 => Trigram::Kun,
            0b110 => Trigram::Xun,
            0b101 => Trigram::Li,
            _ => Trigram::Dui,
        }
    }

    /// Row/column index into the King Wen lookup table
    pub fn table_index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Trigram::Qian => "The Creative",
            Trigram::Zhen => "The Arousing",
            Trigram::Kan => "The Abysmal",
            Trigram::Gen => "Keeping Still",
            Trigram::Kun => "The Receptive",
            Trigram::Xun => "The Gentle",
            Trigram::Li => "The Clinging",
            Trigram::Dui => "The Joyous",
        }
    }

    /// Natural image associated with the trigram
    pub fn image(self) -> &'static str {
        match self {
            Trigram::Qian => "heaven",
            Trigram::Zhen => "thunder",
            Trigram::Kan => "water",
            Trigram::Gen => "mountain",
            Trigram::Kun => "earth",
            Trigram::Xun => "wind",
            Trigram::Li => "fire",
            Trigram::Dui => "lake",
        }
    }
}
