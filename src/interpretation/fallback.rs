//! Deterministic fallback interpretations
//!
//! Used when the provider fails, times out, or returns something the
//! validator rejects. Output depends only on the hexagram, so the same
//! reading always yields the same text, and it always passes
//! `ResponseValidator`.

use crate::hexagram::Hexagram;
use crate::interpretation::types::AIInterpretation;

/// Builds hexagram-specific interpretations without a model call
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, hexagram: &Hexagram) -> AIInterpretation {
        let lower = hexagram.lower_trigram();
        let upper = hexagram.upper_trigram();

        let mut interpretation = format!(
            "Hexagram {number}, {name}, joins {lower_image} below with {upper_image} above. \
             In the traditional reading this image invites you to reflect on how {lower_name} \
             within meets {upper_name} without, and the ancient wisdom of the Book of Changes \
             suggests meeting your question with patience and clarity.",
            number = hexagram.number,
            name = hexagram.name,
            lower_image = lower.image(),
            upper_image = upper.image(),
            lower_name = lower.name(),
            upper_name = upper.name(),
        );

        if let Some(relating) = hexagram.relating() {
            interpretation.push_str(&format!(
                " With changing lines at {}, the situation is in motion toward {}.",
                hexagram.changing_lines_label(),
                relating
            ));
        } else {
            interpretation.push_str(" With no changing lines, the situation is settled for now.");
        }

        let guidance = format!(
            "Consider what {} asks of you at this moment, and which small step honors it.",
            hexagram.name
        );

        let practical_advice = if hexagram.has_changing_lines() {
            "Reflect on what is already shifting and may ask for your attention; \
             write down one change you can support rather than resist."
                .to_string()
        } else {
            "Reflect on what is steady in your situation; \
             consider how to strengthen it before seeking something new."
                .to_string()
        };

        let cultural_context = format!(
            "The I Ching pairs eight trigrams into sixty-four hexagrams. {} is formed from {} ({}) and {} ({}), \
             a combination classical commentators read as guidance for reflection rather than a fixed outcome.",
            hexagram.name,
            lower.name(),
            lower.image(),
            upper.name(),
            upper.image(),
        );

        AIInterpretation::new(interpretation)
            .with_guidance(guidance)
            .with_practical_advice(practical_advice)
            .with_cultural_context(cultural_context)
    }
}
