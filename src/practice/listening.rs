//! Listening comprehension exercises.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::LanguagePair;
use crate::extract::{Extractor, Shape};
use crate::llm::{PromptBuilder, ResponseGenerator};
use crate::practice::chain::{Resolved, Tier};
use crate::practice::exercise::{ListeningExercise, RawListening, RawQuestionSet};
use crate::practice::fixtures;
use crate::practice::Difficulty;

/// Phrases need more words than this to make a listening passage.
const MIN_PASSAGE_WORDS: usize = 3;

pub struct ListeningGenerator {
    generator: Arc<ResponseGenerator>,
    prompts: PromptBuilder,
    pairs: Vec<LanguagePair>,
    questions: Extractor,
    exercise: Extractor,
}

impl ListeningGenerator {
    pub fn new(generator: Arc<ResponseGenerator>, pairs: Vec<LanguagePair>) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            pairs,
            questions: Extractor::new(Shape::Object).lead_key("questions"),
            exercise: Extractor::new(Shape::Object).lead_key("title"),
        }
    }

    /// A listening exercise for `difficulty`; never fails.
    pub async fn generate(&self, difficulty: Difficulty) -> Resolved<ListeningExercise> {
        let passage = self.pick_passage(difficulty, &mut rand::thread_rng()).cloned();
        if let Some(pair) = passage {
            if let Some(exercise) = self.from_passage(&pair, difficulty).await {
                return Resolved::new(exercise, Tier::LocalLookup);
            }
        }
        if let Some(exercise) = self.from_model(difficulty).await {
            return Resolved::new(exercise, Tier::LlmGeneration);
        }
        log::info!("using built-in {difficulty} listening exercise");
        let exercise = fixtures::basic_listening(difficulty, &mut rand::thread_rng());
        Resolved::new(exercise, Tier::FixedFallback)
    }

    /// A stored phrase long enough to listen to and on a `difficulty` theme.
    fn pick_passage<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<&LanguagePair> {
        let suitable: Vec<&LanguagePair> = self
            .pairs
            .iter()
            .filter(|p| p.source_word_count() > MIN_PASSAGE_WORDS)
            .filter(|p| difficulty.matches(&p.source_text) || difficulty.matches(&p.target_text))
            .collect();
        suitable.choose(rng).copied()
    }

    /// Local passage plus model-written questions; a miss if none validate.
    async fn from_passage(
        &self,
        pair: &LanguagePair,
        difficulty: Difficulty,
    ) -> Option<ListeningExercise> {
        let prompt =
            self.prompts
                .comprehension_questions(&pair.source_text, &pair.target_text, difficulty);
        let response = self.generator.generate(&prompt, None).await?;
        let raw: RawQuestionSet = self.questions.extract_as(&response)?;

        let questions = raw.into_valid(&mut rand::thread_rng());
        if questions.is_empty() {
            log::warn!("no valid comprehension questions for stored passage");
            return None;
        }
        Some(ListeningExercise {
            title: fixtures::listening_title(difficulty),
            difficulty,
            passage: pair.source_text.clone(),
            translation: pair.target_text.clone(),
            questions,
        })
    }

    async fn from_model(&self, difficulty: Difficulty) -> Option<ListeningExercise> {
        let response = self
            .generator
            .generate(&self.prompts.listening_exercise(difficulty), None)
            .await?;
        let raw: RawListening = self.exercise.extract_as(&response)?;
        if raw.audio_text.trim().is_empty() {
            return None;
        }

        let questions = raw.questions.into_valid(&mut rand::thread_rng());
        if questions.is_empty() {
            log::warn!("model listening exercise had no valid questions");
            return None;
        }
        Some(ListeningExercise {
            title: raw
                .title
                .unwrap_or_else(|| fixtures::listening_title(difficulty)),
            difficulty,
            passage: raw.audio_text,
            translation: raw.translation,
            questions,
        })
    }
}
