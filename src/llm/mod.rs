//! Text-generation module.
//!
//! This module provides:
//! * [`CompletionBackend`]: async trait implemented by all completion backends.
//! * [`ApiBackend`]: OpenAI-compatible REST API backend.
//! * [`ResponseGenerator`]: wraps a backend; degrades to canned replies
//!   (mock mode) once the backend is unreachable.
//! * [`GenerationParams`]: temperature / top-p / max tokens / stop sequences.
//! * [`PromptBuilder`]: builds extraction and exercise prompts.
//! * [`LlmError`]: error variants for completion calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use hindi_learn::config::AppConfig;
//! use hindi_learn::llm::{PromptBuilder, ResponseGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = ResponseGenerator::from_config(&config);
//!
//!     let prompt = PromptBuilder::new().hint("नमस्ते");
//!     if let Some(text) = generator.generate(&prompt, None).await {
//!         println!("{text}");
//!     }
//! }
//! ```

pub mod backend;
pub mod generator;
pub mod params;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{ApiBackend, CompletionBackend, LlmError};
pub use generator::{GeneratorMode, ResponseGenerator, MOCK_RESPONSES};
pub use params::GenerationParams;
pub use prompt::{PromptBuilder, TRANSCRIPT_CHAR_LIMIT};

#[cfg(test)]
pub use generator::ScriptedBackend;
