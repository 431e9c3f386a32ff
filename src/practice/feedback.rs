//! Answer checking and learning hints.

use serde::Serialize;

use crate::llm::{PromptBuilder, ResponseGenerator};

/// Served when the model cannot produce a hint.
pub const FALLBACK_HINT: &str =
    "Focus on pronouncing each syllable clearly and listen for the tone.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub message: String,
}

/// Compare a learner's answer with the expected one.
///
/// Surrounding whitespace is ignored; everything else must match exactly.
///
/// ```rust
/// use hindi_learn::practice::check_answer;
///
/// assert!(check_answer(" Hello ", "Hello").correct);
/// let miss = check_answer("Goodbye", "Hello");
/// assert_eq!(miss.message, "Not quite. The correct answer is: Hello");
/// ```
pub fn check_answer(user_answer: &str, correct_answer: &str) -> AnswerFeedback {
    let correct = user_answer.trim() == correct_answer.trim();
    let message = if correct {
        "Correct! Great job!".to_string()
    } else {
        format!("Not quite. The correct answer is: {correct_answer}")
    };
    AnswerFeedback { correct, message }
}

/// A short learning hint for `phrase`.
pub async fn hint(generator: &ResponseGenerator, phrase: &str) -> String {
    let prompt = PromptBuilder::new().hint(phrase);
    match generator.generate(&prompt, None).await {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => FALLBACK_HINT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, ScriptedBackend};

    #[test]
    fn correct_and_incorrect_feedback() {
        let hit = check_answer("Water", "Water");
        assert!(hit.correct);
        assert_eq!(hit.message, "Correct! Great job!");

        let miss = check_answer("water", "Water");
        assert!(!miss.correct);
        assert!(miss.message.ends_with("Water"));
    }

    #[tokio::test]
    async fn hint_uses_model_reply() {
        let generator = ResponseGenerator::new(ScriptedBackend::always("  Say na-ma-stay.  "));
        assert_eq!(hint(&generator, "नमस्ते").await, "Say na-ma-stay.");
    }

    #[tokio::test]
    async fn hint_falls_back_on_transient_failure() {
        let generator = ResponseGenerator::new(ScriptedBackend::new(vec![Err(LlmError::Timeout)]));
        assert_eq!(hint(&generator, "नमस्ते").await, FALLBACK_HINT);
    }
}
