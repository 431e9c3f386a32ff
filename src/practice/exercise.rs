//! Exercise types and validation of model-generated questions.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::DialogueTurn;
use crate::practice::Difficulty;

// ---------------------------------------------------------------------------
// Question / Quiz
// ---------------------------------------------------------------------------

/// A multiple-choice question.
///
/// A valid question has exactly [`Question::OPTION_COUNT`] distinct options
/// and its answer is one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    pub const OPTION_COUNT: usize = 4;

    pub fn new<S: Into<String>>(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        if self.prompt.trim().is_empty() || self.options.len() != Self::OPTION_COUNT {
            return false;
        }
        let mut seen = HashSet::new();
        let distinct = self
            .options
            .iter()
            .all(|o| !o.trim().is_empty() && seen.insert(normalize(o)));
        distinct && self.options.iter().any(|o| o == &self.answer)
    }

    /// The same question with its options in random order.
    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.options.shuffle(rng);
        self
    }
}

/// Key used when comparing options for equality.
pub(crate) fn normalize(option: &str) -> String {
    option.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
}

// ---------------------------------------------------------------------------
// ListeningExercise
// ---------------------------------------------------------------------------

/// A passage to listen to plus comprehension questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningExercise {
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(rename = "audio_text")]
    pub passage: String,
    pub translation: String,
    pub questions: Vec<Question>,
}

// ---------------------------------------------------------------------------
// DialoguePractice
// ---------------------------------------------------------------------------

/// A dialogue to rehearse.  `cues` are English prompts; `translations` maps
/// each cue to the Hindi line the learner should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialoguePractice {
    pub title: String,
    pub difficulty: Difficulty,
    pub scenario: String,
    pub dialogue: Vec<DialogueTurn>,
    pub cues: Vec<String>,
    pub translations: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Model output parsing
// ---------------------------------------------------------------------------

/// Questions as the model returns them.
///
/// The answer may sit on each question (`answer` / `correct_answer`) or in a
/// separate `answers` map keyed by question text.  Elements that do not even
/// look like questions are skipped individually.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawQuestionSet {
    #[serde(default)]
    questions: Vec<Value>,
    #[serde(default)]
    answers: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "correct_answer")]
    answer: Option<String>,
}

impl RawQuestionSet {
    /// Questions that pass validation, in model order, options shuffled.
    pub(crate) fn into_valid<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<Question> {
        let answers = self.answers;
        self.questions
            .into_iter()
            .filter_map(|value| serde_json::from_value::<RawQuestion>(value).ok())
            .filter_map(|raw| {
                let answer = raw
                    .answer
                    .or_else(|| answers.get(&raw.question).cloned())?;
                Some(Question {
                    prompt: raw.question,
                    options: raw.options,
                    answer,
                })
            })
            .filter(|q| {
                let ok = q.is_valid();
                if !ok {
                    log::debug!("dropping invalid question: {:?}", q.prompt);
                }
                ok
            })
            .map(|q| q.shuffled(rng))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawQuiz {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub questions: RawQuestionSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawListening {
    #[serde(default)]
    pub title: Option<String>,
    pub audio_text: String,
    #[serde(default)]
    pub translation: String,
    #[serde(flatten)]
    pub questions: RawQuestionSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDialoguePractice {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub scenario: String,
    pub dialogue: Vec<DialogueTurn>,
    #[serde(default)]
    pub cues: Vec<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
