//! Deterministic cache keys for interpretations
//!
//! ```text
//! key = "hexagram:{number}:changing:{positions|none}:q:{sha256(normalized)[..16]}"
//! ```
//!
//! Normalization: lowercase, collapse whitespace runs, trim, strip trailing
//! punctuation. The changing-line positions are part of the key because two
//! readings of the same primary hexagram with different moving lines are
//! different consultations.

use crate::hexagram::Hexagram;
use sha2::{Digest, Sha256};

/// Hex chars of the question digest kept in the key
const DIGEST_CHARS: usize = 16;

/// Full-width and CJK sentence marks stripped alongside ASCII punctuation
const TRAILING_MARKS: &[char] = &[
    '？', '！', '。', '．', '，', '、', '；', '：', '…', '」', '』', '”', '’', '）',
];

/// Normalize a question for cache comparison
pub fn normalize_question(question: &str) -> String {
    let collapsed = question
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    collapsed
        .trim_end_matches(|c: char| {
            c.is_ascii_punctuation() || c.is_whitespace() || TRAILING_MARKS.contains(&c)
        })
        .to_string()
}

/// Builds cache keys from a reading and a question
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator;

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn key(&self, hexagram: &Hexagram, question: &str) -> String {
        let normalized = normalize_question(question);
        let digest = hex::encode(Sha256::digest(normalized.as_bytes()));

        let changing = if hexagram.has_changing_lines() {
            hexagram
                .changing_lines
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("-")
        } else {
            "none".to_string()
        };

        format!(
            "hexagram:{}:changing:{}:q:{}",
            hexagram.number,
            changing,
            &digest[..DIGEST_CHARS]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn hexagram() -> Hexagram {
        Hexagram::from_values([7, 7, 8, 8, 7, 8]).unwrap()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_question("What should I do?"), "what should i do");
        assert_eq!(normalize_question("WHAT SHOULD I DO?"), "what should i do");
        assert_eq!(normalize_question("what   should  i   do"), "what should i do");
        assert_eq!(normalize_question("What should I do???"), "what should i do");
        assert_eq!(normalize_question("  What should I do ?! "), "what should i do");
    }

    #[test]
    fn test_normalization_strips_full_width_punctuation() {
        assert_eq!(normalize_question("What about my career？"), "what about my career");
        assert_eq!(normalize_question("What about my career。"), "what about my career");
        assert_eq!(normalize_question("What about my career？！ "), "what about my career");
        assert_eq!(normalize_question("我的事业如何？"), "我的事业如何");

        let generator = CacheKeyGenerator::new();
        let h = hexagram();
        assert_eq!(
            generator.key(&h, "What about my career？"),
            generator.key(&h, "What about my career?")
        );
    }

    #[test]
    fn test_equivalent_questions_share_key() {
        let generator = CacheKeyGenerator::new();
        let h = hexagram();
        let base = generator.key(&h, "What about my career?");
        assert_eq!(base, generator.key(&h, "WHAT ABOUT MY CAREER?"));
        assert_eq!(base, generator.key(&h, "what   about  my  career"));
        assert_eq!(base, generator.key(&h, "What about my career???"));
    }

    #[test]
    fn test_changing_lines_discriminate() {
        let generator = CacheKeyGenerator::new();
        let q = "What about my career?";

        // Same primary hexagram (all yang), different moving line
        let first = Hexagram::from_values([9, 7, 7, 7, 7, 7]).unwrap();
        let second = Hexagram::from_values([7, 9, 7, 7, 7, 7]).unwrap();
        assert_eq!(first.number, second.number);
        assert_ne!(generator.key(&first, q), generator.key(&second, q));

        let stable = Hexagram::from_values([7; 6]).unwrap();
        assert_ne!(generator.key(&stable, q), generator.key(&first, q));
    }

    #[test]
    fn test_question_discriminates() {
        let generator = CacheKeyGenerator::new();
        let h = hexagram();
        assert_ne!(
            generator.key(&h, "What about my career?"),
            generator.key(&h, "What about my health?")
        );
    }

    #[test]
    fn test_hexagram_number_discriminates() {
        let generator = CacheKeyGenerator::new();
        let a = Hexagram::from_values([7; 6]).unwrap();
        let b = Hexagram::from_values([8; 6]).unwrap();
        assert_ne!(generator.key(&a, "Same?"), generator.key(&b, "Same?"));
    }

    #[test]
    fn test_key_shape() {
        let generator = CacheKeyGenerator::new();
        let h = Hexagram::from_values([6, 7, 8, 9, 7, 8]).unwrap();
        let key = generator.key(&h, "Where next?");
        assert!(key.starts_with(&format!("hexagram:{}:changing:1-4:q:", h.number)));
        assert_eq!(key.rsplit(':').next().unwrap().len(), DIGEST_CHARS);
    }

    #[quickcheck]
    fn prop_key_case_insensitive(question: String) -> bool {
        let generator = CacheKeyGenerator::new();
        let h = hexagram();
        // ASCII only: Unicode case mapping is not always an involution
        if !question.is_ascii() {
            return true;
        }
        generator.key(&h, &question) == generator.key(&h, &question.to_uppercase())
    }
}
