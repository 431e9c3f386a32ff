//! Multiple-choice vocabulary quizzes.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::Vocabulary;
use crate::extract::{Extractor, Shape};
use crate::llm::{PromptBuilder, ResponseGenerator};
use crate::practice::chain::{Resolved, Tier};
use crate::practice::exercise::{normalize, Question, Quiz, RawQuiz};
use crate::practice::fixtures::{self, QUIZ_TITLE};

/// Pads options when local vocabulary cannot supply enough distractors.
pub const GENERIC_DISTRACTORS: &[&str] = &[
    "greeting", "thank you", "goodbye", "yes", "no", "please", "friend", "family", "food",
    "water", "help", "good", "bad", "big", "small",
];

/// Where local quiz distractors are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractorPolicy {
    /// Only meanings of words that are not themselves asked about.
    #[default]
    SkipQuestionWords,
    /// Any meaning in the vocabulary except the question's own.
    ExcludeAnswerOnly,
}

/// Builds vocabulary quizzes.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use hindi_learn::config::AppConfig;
/// use hindi_learn::content::Vocabulary;
/// use hindi_learn::llm::ResponseGenerator;
/// use hindi_learn::practice::QuizGenerator;
///
/// # async fn run() {
/// let generator = Arc::new(ResponseGenerator::from_config(&AppConfig::default()));
/// let quiz = QuizGenerator::new(generator, Vocabulary::new()).generate(5).await;
/// assert!(!quiz.value.questions.is_empty());
/// # }
/// ```
pub struct QuizGenerator {
    generator: Arc<ResponseGenerator>,
    prompts: PromptBuilder,
    vocabulary: Vocabulary,
    policy: DistractorPolicy,
    extractor: Extractor,
}

impl QuizGenerator {
    pub fn new(generator: Arc<ResponseGenerator>, vocabulary: Vocabulary) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            vocabulary,
            policy: DistractorPolicy::default(),
            extractor: Extractor::new(Shape::Object).lead_key("title"),
        }
    }

    pub fn with_policy(mut self, policy: DistractorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A quiz of up to `num_questions` questions (at least one).
    pub async fn generate(&self, num_questions: usize) -> Resolved<Quiz> {
        let n = num_questions.max(1);

        let local = self.from_vocabulary(n, &mut rand::thread_rng());
        if let Some(quiz) = local {
            return Resolved::new(quiz, Tier::LocalLookup);
        }
        if let Some(quiz) = self.from_model(n).await {
            return Resolved::new(quiz, Tier::LlmGeneration);
        }
        log::info!("using built-in vocabulary quiz");
        let quiz = fixtures::basic_quiz(n, &mut rand::thread_rng());
        Resolved::new(quiz, Tier::FixedFallback)
    }

    /// Needs twice as many words as questions so distractors are real words.
    fn from_vocabulary<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Option<Quiz> {
        if self.vocabulary.len() < n * 2 {
            log::debug!(
                "{} vocabulary items, need {} for a local quiz",
                self.vocabulary.len(),
                n * 2
            );
            return None;
        }

        let mut items: Vec<(&str, &str)> = self
            .vocabulary
            .iter()
            .map(|(w, m)| (w.as_str(), m.as_str()))
            .collect();
        items.shuffle(rng);

        let mut questions = Vec::with_capacity(n);
        for &(word, meaning) in &items[..n] {
            let pool: Vec<&str> = match self.policy {
                DistractorPolicy::SkipQuestionWords => items[n..].iter().map(|(_, m)| *m).collect(),
                DistractorPolicy::ExcludeAnswerOnly => items
                    .iter()
                    .filter(|(w, _)| *w != word)
                    .map(|(_, m)| *m)
                    .collect(),
            };
            let question = Question {
                prompt: format!("What is the meaning of '{word}'?"),
                options: build_options(meaning, &pool, rng),
                answer: meaning.to_string(),
            };
            if question.is_valid() {
                questions.push(question);
            }
        }

        (!questions.is_empty()).then(|| Quiz {
            title: QUIZ_TITLE.into(),
            questions,
        })
    }

    async fn from_model(&self, n: usize) -> Option<Quiz> {
        let response = self
            .generator
            .generate(&self.prompts.vocabulary_quiz(n), None)
            .await?;
        let raw: RawQuiz = self.extractor.extract_as(&response)?;

        let mut questions = raw.questions.into_valid(&mut rand::thread_rng());
        questions.truncate(n);
        if questions.is_empty() {
            log::warn!("model quiz contained no valid questions");
            return None;
        }
        Some(Quiz {
            title: raw.title.unwrap_or_else(|| QUIZ_TITLE.into()),
            questions,
        })
    }
}

/// The answer plus three distinct distractors, shuffled.
///
/// Distractors come from `pool` first, then from [`GENERIC_DISTRACTORS`];
/// none equals the answer.
pub fn build_options<R: Rng + ?Sized>(answer: &str, pool: &[&str], rng: &mut R) -> Vec<String> {
    let mut local = pool.to_vec();
    local.shuffle(rng);
    let mut generic = GENERIC_DISTRACTORS.to_vec();
    generic.shuffle(rng);

    let mut options = vec![answer.to_string()];
    let mut seen = vec![normalize(answer)];
    for candidate in local.into_iter().chain(generic) {
        if options.len() == Question::OPTION_COUNT {
            break;
        }
        let key = normalize(candidate);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        options.push(candidate.to_string());
    }

    options.shuffle(rng);
    options
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GeneratorMode, LlmError, ScriptedBackend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn vocabulary(pairs: &[(&str, &str)]) -> Vocabulary {
        pairs
            .iter()
            .map(|(w, m)| (w.to_string(), m.to_string()))
            .collect()
    }

    fn ten_words() -> Vocabulary {
        vocabulary(&[
            ("नमस्ते", "Hello"),
            ("धन्यवाद", "Thank you"),
            ("पानी", "Water"),
            ("खाना", "Food"),
            ("घर", "House"),
            ("दोस्त", "Friend"),
            ("किताब", "Book"),
            ("स्कूल", "School"),
            ("बड़ा", "Big"),
            ("छोटा", "Small"),
        ])
    }

    fn offline(vocab: Vocabulary) -> QuizGenerator {
        QuizGenerator::new(
            Arc::new(ResponseGenerator::new(ScriptedBackend::unreachable())),
            vocab,
        )
    }

    #[test]
    fn options_are_four_distinct_and_contain_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let options = build_options("Water", &["water", "Food", "Food"], &mut rng);
            let q = Question::new("q", options, "Water");
            assert!(q.is_valid(), "{q:?}");
        }
    }

    #[test]
    fn generic_pool_pads_when_pool_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let options = build_options("yes", &[], &mut rng);
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| o.as_str() == "yes").count(), 1);
    }

    #[test]
    fn local_quiz_skips_question_words_for_distractors() {
        let quiz_gen = offline(ten_words());
        let mut rng = StdRng::seed_from_u64(42);
        let quiz = quiz_gen.from_vocabulary(5, &mut rng).expect("enough vocabulary");

        assert_eq!(quiz.questions.len(), 5);
        let answers: Vec<&str> = quiz.questions.iter().map(|q| q.answer.as_str()).collect();
        for q in &quiz.questions {
            assert!(q.is_valid());
            for option in q.options.iter().filter(|o| **o != q.answer) {
                assert!(
                    !answers.contains(&option.as_str()),
                    "distractor {option} is another question's answer"
                );
            }
        }
    }

    #[test]
    fn exclude_answer_only_policy_still_valid() {
        let quiz_gen = offline(ten_words()).with_policy(DistractorPolicy::ExcludeAnswerOnly);
        let mut rng = StdRng::seed_from_u64(3);
        let quiz = quiz_gen.from_vocabulary(5, &mut rng).unwrap();
        assert!(quiz.questions.iter().all(Question::is_valid));
    }

    #[test]
    fn duplicate_meanings_never_become_distractors() {
        let quiz_gen = offline(vocabulary(&[
            ("हाँ", "Yes"),
            ("जी", "Yes"),
            ("जी हाँ", "yes"),
            ("नहीं", "No"),
        ]));
        let mut rng = StdRng::seed_from_u64(9);
        let quiz = quiz_gen.from_vocabulary(2, &mut rng).unwrap();
        assert!(quiz.questions.iter().all(Question::is_valid));
    }

    #[tokio::test]
    async fn small_vocabulary_falls_through_to_model() {
        let reply = r#"```json
{"title": "Hindi Vocabulary Quiz", "questions": [
  {"question": "What is the meaning of 'घर'?", "options": ["House", "Car", "Tree", "Road"]},
  {"question": "broken", "options": ["a", "a", "b", "c"], "answer": "a"}
], "answers": {"What is the meaning of 'घर'?": "House"}}
```"#;
        let quiz_gen = QuizGenerator::new(
            Arc::new(ResponseGenerator::new(ScriptedBackend::always(reply))),
            vocabulary(&[("पानी", "Water")]),
        );

        let resolved = quiz_gen.generate(5).await;
        assert_eq!(resolved.tier, Tier::LlmGeneration);
        assert_eq!(resolved.value.questions.len(), 1);
        assert_eq!(resolved.value.questions[0].answer, "House");
    }

    #[tokio::test]
    async fn mock_mode_serves_fixed_quiz() {
        let generator = Arc::new(ResponseGenerator::new(ScriptedBackend::unreachable()));
        let quiz_gen = QuizGenerator::new(Arc::clone(&generator), Vocabulary::new());

        let resolved = quiz_gen.generate(5).await;
        assert_eq!(generator.mode(), GeneratorMode::Mocked);
        assert_eq!(resolved.tier, Tier::FixedFallback);
        assert_eq!(resolved.value.questions.len(), 5);
        assert!(resolved.value.questions.iter().all(Question::is_valid));
    }

    #[tokio::test]
    async fn fixed_quiz_has_requested_question_count() {
        let quiz_gen = QuizGenerator::new(
            Arc::new(ResponseGenerator::new(ScriptedBackend::unreachable())),
            Vocabulary::new(),
        );
        for n in [1, 3] {
            let resolved = quiz_gen.generate(n).await;
            assert_eq!(resolved.tier, Tier::FixedFallback);
            assert_eq!(resolved.value.questions.len(), n);
        }
    }

    #[tokio::test]
    async fn transient_failure_serves_fixed_quiz() {
        let quiz_gen = QuizGenerator::new(
            Arc::new(ResponseGenerator::new(ScriptedBackend::new(vec![Err(
                LlmError::Timeout,
            )]))),
            Vocabulary::new(),
        );
        assert_eq!(quiz_gen.generate(3).await.tier, Tier::FixedFallback);
    }

    #[tokio::test]
    async fn local_tier_wins_with_enough_vocabulary() {
        let backend = ScriptedBackend::always("unused");
        let calls = backend.call_counter();
        let quiz_gen = QuizGenerator::new(Arc::new(ResponseGenerator::new(backend)), ten_words());

        let resolved = quiz_gen.generate(5).await;
        assert_eq!(resolved.tier, Tier::LocalLookup);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
