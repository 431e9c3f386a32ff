//! Interactive exercises: dialogue practice, vocabulary quizzes and
//! listening comprehension.
//!
//! Every generator resolves through the same ordered tiers and never comes
//! back empty-handed:
//!
//! ```text
//! LocalLookup (stored content) ─miss─▶ LlmGeneration (validated) ─miss─▶ FixedFallback
//! ```
//!
//! The returned [`Resolved`] records which tier produced the exercise.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hindi_learn::config::AppConfig;
//! use hindi_learn::llm::ResponseGenerator;
//! use hindi_learn::practice::{Difficulty, DialogueGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = Arc::new(ResponseGenerator::from_config(&AppConfig::default()));
//!     let practice = DialogueGenerator::new(generator, Vec::new())
//!         .generate(Difficulty::Beginner)
//!         .await;
//!     println!("{} ({:?})", practice.value.title, practice.tier);
//! }
//! ```

pub mod chain;
pub mod dialogue;
pub mod difficulty;
pub mod exercise;
pub mod feedback;
pub mod fixtures;
pub mod listening;
pub mod quiz;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use chain::{Resolved, Tier};
pub use dialogue::{practice_from_dialogue, DialogueGenerator};
pub use difficulty::{Difficulty, UnknownDifficulty};
pub use exercise::{DialoguePractice, ListeningExercise, Question, Quiz};
pub use feedback::{check_answer, hint, AnswerFeedback, FALLBACK_HINT};
pub use listening::ListeningGenerator;
pub use quiz::{build_options, DistractorPolicy, QuizGenerator, GENERIC_DISTRACTORS};
