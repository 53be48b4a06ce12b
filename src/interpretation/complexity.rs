//! Question complexity scoring
//!
//! Provides a weighted score used for model routing and prompt strategy:
//! - Bounded output: [0.0, 1.0]
//! - Monotonic: more changing lines → score never decreases
//!
//! ```text
//! complexity = 0.40 × philosophical + 0.20 × length + 0.40 × transformation
//!            - transactional_penalty
//! ```

/// Vocabulary that signals reflective, existential questions
const PHILOSOPHICAL_TERMS: &[&str] = &[
    "purpose",
    "meaning",
    "destiny",
    "spiritual",
    "soul",
    "path",
    "life",
    "journey",
    "fulfil",
    "calling",
    "truth",
    "wisdom",
    "existence",
    "transform",
    "inner",
    "balance",
    "harmony",
    "identity",
];

/// Markers of short, transactional questions
const TRANSACTIONAL_MARKERS: &[&str] = &[
    "quick",
    "yes or no",
    "today",
    "tonight",
    "right now",
    "should i buy",
];

/// Words at which the length signal saturates
const LENGTH_SATURATION_WORDS: f64 = 40.0;

/// Changing lines at which the transformation signal saturates
const TRANSFORMATION_SATURATION_LINES: f64 = 4.0;

/// Complexity scorer with 3-factor weighted scoring
#[derive(Debug, Clone)]
pub struct ComplexityScorer {
    /// Weight for philosophical vocabulary (0.40)
    weight_philosophical: f64,

    /// Weight for question length (0.20)
    weight_length: f64,

    /// Weight for changing line count (0.40)
    weight_transformation: f64,

    /// Subtracted when the question reads as transactional (0.15)
    transactional_penalty: f64,
}

impl ComplexityScorer {
    /// Create new scorer with standard weights
    pub fn new() -> Self {
        Self {
            weight_philosophical: 0.40,
            weight_length: 0.20,
            weight_transformation: 0.40,
            transactional_penalty: 0.15,
        }
    }

    /// Score a question together with its reading
    ///
    /// Returns: complexity ∈ [0.0, 1.0]
    pub fn score(&self, question: &str, changing_line_count: usize) -> f64 {
        let philosophical = self.philosophical_signal(question);
        let length = self.length_signal(question);
        let transformation = self.transformation_signal(changing_line_count);

        let mut complexity = self.weight_philosophical * philosophical
            + self.weight_length * length
            + self.weight_transformation * transformation;

        if self.is_transactional(question) {
            complexity -= self.transactional_penalty;
        }

        complexity.clamp(0.0, 1.0)
    }

    /// Each distinct philosophical term adds 0.25, saturating at 1.0
    fn philosophical_signal(&self, question: &str) -> f64 {
        let lower = question.to_lowercase();
        let hits = PHILOSOPHICAL_TERMS
            .iter()
            .filter(|term| lower.contains(*term))
            .count();

        (hits as f64 * 0.25).min(1.0)
    }

    /// Word count normalized to [0.0, 1.0]
    fn length_signal(&self, question: &str) -> f64 {
        let words = question.split_whitespace().count() as f64;
        (words / LENGTH_SATURATION_WORDS).min(1.0)
    }

    /// Changing lines normalized to [0.0, 1.0]
    fn transformation_signal(&self, changing_line_count: usize) -> f64 {
        (changing_line_count as f64 / TRANSFORMATION_SATURATION_LINES).min(1.0)
    }

    fn is_transactional(&self, question: &str) -> bool {
        let lower = question.to_lowercase();
        TRANSACTIONAL_MARKERS.iter().any(|marker| lower.contains(marker))
    }
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    const DEEP_QUESTION: &str = "What is the deeper meaning and purpose of my spiritual journey, \
        and how can I align my life path with my true destiny and find lasting fulfilment?";

    #[test]
    fn test_scorer_creation() {
        let scorer = ComplexityScorer::new();
        let total =
            scorer.weight_philosophical + scorer.weight_length + scorer.weight_transformation;
        assert!((total - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_simple_question_scores_low() {
        let scorer = ComplexityScorer::new();
        assert!(scorer.score("Quick advice?", 0) < 0.5);
        assert!(scorer.score("Should I call her?", 0) < 0.5);
    }

    #[test]
    fn test_deep_question_with_changes_scores_high() {
        let scorer = ComplexityScorer::new();
        let score = scorer.score(DEEP_QUESTION, 3);
        assert!(score > 0.7, "score was {}", score);
    }

    #[test]
    fn test_transactional_penalty() {
        let scorer = ComplexityScorer::new();
        let plain = scorer.score("Should I take the job offer", 1);
        let quick = scorer.score("Quick: should I take the job offer", 1);
        assert!(quick < plain);
    }

    #[test]
    fn test_changing_lines_increase_score() {
        let scorer = ComplexityScorer::new();
        let q = "How should I approach this change at work?";
        assert!(scorer.score(q, 0) <= scorer.score(q, 4));
        assert!(scorer.score(q, 0) < scorer.score(q, 2));
    }

    #[test]
    fn test_bounds() {
        let scorer = ComplexityScorer::new();
        let rambling = DEEP_QUESTION.repeat(10);
        for (q, n) in [("", 0), ("quick yes or no today", 0), (rambling.as_str(), 6)] {
            let s = scorer.score(q, n);
            assert!((0.0..=1.0).contains(&s), "score {} out of bounds", s);
        }
    }

    #[quickcheck]
    fn prop_monotonic_in_changing_lines(question: String, a: u8, b: u8) -> bool {
        let scorer = ComplexityScorer::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = (lo % 7) as usize;
        let hi = (hi % 7) as usize;
        if lo > hi {
            return true;
        }
        scorer.score(&question, lo) <= scorer.score(&question, hi)
    }

    #[quickcheck]
    fn prop_score_bounded(question: String, changes: u8) -> bool {
        let s = ComplexityScorer::new().score(&question, (changes % 7) as usize);
        (0.0..=1.0).contains(&s)
    }
}
