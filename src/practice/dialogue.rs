//! Dialogue rehearsal scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::content::{enforce_turn_order, Dialogue};
use crate::extract::{Extractor, Shape};
use crate::llm::{PromptBuilder, ResponseGenerator};
use crate::practice::chain::{Resolved, Tier};
use crate::practice::exercise::{DialoguePractice, RawDialoguePractice};
use crate::practice::fixtures;
use crate::practice::Difficulty;

/// Maximum number of cues taken from a dialogue.
const MAX_CUES: usize = 4;
/// An English turn this close (in position) to a Hindi turn translates it.
const CUE_WINDOW: f64 = 5.0;

pub struct DialogueGenerator {
    generator: Arc<ResponseGenerator>,
    prompts: PromptBuilder,
    dialogues: Vec<Dialogue>,
    extractor: Extractor,
}

impl DialogueGenerator {
    pub fn new(generator: Arc<ResponseGenerator>, dialogues: Vec<Dialogue>) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            dialogues,
            extractor: Extractor::new(Shape::Object).lead_key("title"),
        }
    }

    /// A practice scenario for `difficulty`; never fails.
    pub async fn generate(&self, difficulty: Difficulty) -> Resolved<DialoguePractice> {
        let local = self.from_local(difficulty, &mut rand::thread_rng());
        if let Some(practice) = local {
            return Resolved::new(practice, Tier::LocalLookup);
        }
        if let Some(practice) = self.from_model(difficulty).await {
            return Resolved::new(practice, Tier::LlmGeneration);
        }
        log::info!("using built-in {difficulty} dialogue");
        Resolved::new(fixtures::greeting_dialogue(difficulty), Tier::FixedFallback)
    }

    fn from_local<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<DialoguePractice> {
        let matching: Vec<&Dialogue> = self
            .dialogues
            .iter()
            .filter(|d| !d.turns.is_empty() && difficulty.matches(&d.text()))
            .collect();
        log::debug!(
            "{} of {} stored dialogues match {difficulty}",
            matching.len(),
            self.dialogues.len()
        );
        matching
            .choose(rng)
            .map(|dialogue| practice_from_dialogue(dialogue, difficulty))
    }

    async fn from_model(&self, difficulty: Difficulty) -> Option<DialoguePractice> {
        let response = self
            .generator
            .generate(&self.prompts.dialogue_practice(difficulty), None)
            .await?;
        let mut raw: RawDialoguePractice = self.extractor.extract_as(&response)?;
        if raw.dialogue.is_empty() {
            log::warn!("model dialogue had no turns");
            return None;
        }
        enforce_turn_order(&mut raw.dialogue);

        // Cues without a translation are useless to the learner.
        let cues = raw
            .cues
            .into_iter()
            .filter(|cue| raw.translations.contains_key(cue))
            .collect();
        Some(DialoguePractice {
            title: raw.title.unwrap_or_else(|| fixtures::dialogue_title(difficulty)),
            difficulty,
            scenario: raw.scenario,
            dialogue: raw.dialogue,
            cues,
            translations: raw.translations,
        })
    }
}

/// Build a practice scenario from a stored dialogue.
///
/// Each of the first four Hindi turns is paired with the first English turn
/// within [`CUE_WINDOW`] of it; that English line becomes a cue.
pub fn practice_from_dialogue(dialogue: &Dialogue, difficulty: Difficulty) -> DialoguePractice {
    let english: Vec<_> = dialogue
        .turns
        .iter()
        .filter(|t| !t.is_source_language)
        .collect();

    let mut cues = Vec::new();
    let mut translations = BTreeMap::new();
    for hindi in dialogue
        .turns
        .iter()
        .filter(|t| t.is_source_language)
        .take(MAX_CUES)
    {
        let Some(line) = english
            .iter()
            .find(|e| (e.position - hindi.position).abs() < CUE_WINDOW)
        else {
            continue;
        };
        if translations.contains_key(&line.text) {
            continue;
        }
        cues.push(line.text.clone());
        translations.insert(line.text.clone(), hindi.text.clone());
    }

    DialoguePractice {
        title: fixtures::dialogue_title(difficulty),
        difficulty,
        scenario: format!("Practice this {difficulty} level Hindi dialogue"),
        dialogue: dialogue.turns.clone(),
        cues,
        translations,
    }
}
