//! Token scoring
//!
//! A single left-to-right fold over the token sequence. Intensifiers and negators do not
//! produce scores themselves; they set pending modifiers that the next sentiment word
//! consumes. Unknown words pass through without touching the pending modifiers.

use crate::lexicon::Lexicon;

/// Factor applied to the magnitude of a negated sentiment word
pub const NEGATION_DAMPING: f64 = 0.8;

/// Modifiers pending for the next sentiment word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerState {
    pub multiplier: f64,
    pub negation_active: bool,
}

impl Default for ScorerState {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            negation_active: false,
        }
    }
}

impl ScorerState {
    /// Advance over one token, returning the next state and the score it emits (if any)
    pub fn step(self, token: &str, lexicon: &Lexicon) -> (Self, Option<f64>) {
        if let Some(multiplier) = lexicon.intensifier(token) {
            return (Self { multiplier, ..self }, None);
        }

        if lexicon.is_negator(token) {
            return (
                Self {
                    negation_active: true,
                    ..self
                },
                None,
            );
        }

        let base = lexicon.weight(token);
        if base == 0.0 {
            return (self, None);
        }

        let mut score = base * self.multiplier;
        if self.negation_active {
            score = -score * NEGATION_DAMPING;
        }

        (Self::default(), Some(score))
    }
}

/// Score tokens against the reference lexicon
pub fn score<S: AsRef<str>>(tokens: &[S]) -> Vec<f64> {
    score_with(Lexicon::global(), tokens)
}

/// Score tokens against `lexicon`.
///
/// Never empty: text without any sentiment word scores `[0.0]`.
pub fn score_with<S: AsRef<str>>(lexicon: &Lexicon, tokens: &[S]) -> Vec<f64> {
    let (_, scores) = tokens.iter().fold(
        (ScorerState::default(), Vec::new()),
        |(state, mut scores), token| {
            let (next, emitted) = state.step(token.as_ref(), lexicon);
            scores.extend(emitted);
            (next, scores)
        },
    );

    if scores.is_empty() {
        vec![0.0]
    } else {
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_plain_sentiment_words() {
        approx(&score(&["i", "love", "it", "amazing"]), &[4.0, 5.0]);
    }

    #[test]
    fn test_no_sentiment_yields_zero() {
        approx(&score(&["the", "weather", "today"]), &[0.0]);
        approx(&score::<&str>(&[]), &[0.0]);
    }

    #[test]
    fn test_negation_flips_and_damps() {
        approx(&score(&["not", "good"]), &[-3.0 * 0.8]);
        approx(&score(&["not", "terrible"]), &[5.0 * 0.8]);
    }

    #[test]
    fn test_intensifier_multiplies() {
        approx(&score(&["very", "good"]), &[3.0 * 1.6]);
        approx(&score(&["absolutely", "awful"]), &[-4.0 * 2.2]);
    }

    #[test]
    fn test_negated_intensified_word() {
        // Both modifiers apply to the same word: (3 * 1.6) negated and damped
        approx(&score(&["not", "very", "good"]), &[-(3.0 * 1.6) * 0.8]);
        approx(&score(&["very", "not", "good"]), &[-(3.0 * 1.6) * 0.8]);
    }

    #[test]
    fn test_later_intensifier_replaces_earlier() {
        approx(&score(&["very", "absolutely", "good"]), &[3.0 * 2.2]);
    }

    #[test]
    fn test_double_negator_does_not_cancel() {
        approx(&score(&["not", "never", "good"]), &[-3.0 * 0.8]);
    }

    #[test]
    fn test_filler_keeps_pending_modifiers() {
        approx(&score(&["very", "banana", "good"]), &[3.0 * 1.6]);
        approx(&score(&["not", "a", "single", "good", "thing"]), &[-3.0 * 0.8]);
    }

    #[test]
    fn test_modifiers_apply_to_one_word_only() {
        approx(&score(&["very", "good", "nice"]), &[3.0 * 1.6, 3.0]);
        approx(&score(&["not", "bad", "sad"]), &[3.0 * 0.8, -3.0]);
    }

    #[test]
    fn test_trailing_modifier_is_discarded() {
        approx(&score(&["good", "very"]), &[3.0]);
        approx(&score(&["not"]), &[0.0]);
    }

    #[test]
    fn test_step_resets_state_after_emit() {
        let lexicon = Lexicon::global();
        let (state, emitted) = ScorerState::default().step("very", lexicon);
        assert_eq!(emitted, None);
        assert_eq!(state.multiplier, 1.6);

        let (state, emitted) = state.step("banana", lexicon);
        assert_eq!(emitted, None);
        assert_eq!(state.multiplier, 1.6);

        let (state, emitted) = state.step("good", lexicon);
        assert!(emitted.is_some());
        assert_eq!(state, ScorerState::default());
    }
}
