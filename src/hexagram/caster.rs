//! Three-coin hexagram casting
//!
//! Each line is the sum of three fair coins (heads = 3, tails = 2), giving
//! the traditional distribution:
//!
//! ```text
//! P(6) = 1/8   P(7) = 3/8   P(8) = 3/8   P(9) = 1/8
//! ```
//!
//! Six lines are cast bottom to top. Casting is total: it always yields a
//! structurally valid hexagram.

use crate::hexagram::types::{Hexagram, LineValue, LINE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEADS: u8 = 3;
const TAILS: u8 = 2;

/// Hexagram caster backed by a seedable RNG
#[derive(Debug, Clone)]
pub struct HexagramCaster {
    rng: StdRng,
}

impl HexagramCaster {
    /// Create a caster seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible caster
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Toss one coin
    fn toss(&mut self) -> u8 {
        if self.rng.gen_bool(0.5) {
            HEADS
        } else {
            TAILS
        }
    }

    /// Cast a single line from three coin tosses
    pub fn cast_line(&mut self) -> LineValue {
        let sum = self.toss() + self.toss() + self.toss();
        match sum {
            6 => LineValue::OldYin,
            7 => LineValue::YoungYang,
            8 => LineValue::YoungYin,
            _ => LineValue::OldYang,
        }
    }

    /// Cast a full hexagram, first line at the bottom
    pub fn cast(&mut self) -> Hexagram {
        let mut lines = [LineValue::YoungYang; LINE_COUNT];
        for line in lines.iter_mut() {
            *line = self.cast_line();
        }
        Hexagram::from_lines(lines)
    }
}

impl Default for HexagramCaster {
    fn default() -> Self {
        Self::new()
    }
}
