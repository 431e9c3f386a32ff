//! Learning content: the persisted data model and transcript processing.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hindi_learn::config::{AppConfig, AppPaths};
//! use hindi_learn::content::{FileTranscriptSource, TranscriptProcessor};
//! use hindi_learn::llm::ResponseGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let paths = AppPaths::new();
//!     let generator = Arc::new(ResponseGenerator::from_config(&config));
//!
//!     let processor = TranscriptProcessor::new(generator);
//!     let source = FileTranscriptSource::new(&paths.transcripts_dir);
//!     let out = processor.process(&source, "lesson-01.txt").await.unwrap();
//!     out.content.save_to(&paths.structured_data_file).unwrap();
//! }
//! ```

pub mod model;
pub mod transcript;

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ContentError
// ---------------------------------------------------------------------------

/// Errors from loading transcripts or persisting structured content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No transcript exists for the identifier, or it is empty.
    #[error("Transcript not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ── Public re-exports ──────────────────────────────────────────────────────

pub use model::{
    enforce_turn_order, vocabulary_entries, Dialogue, DialogueTurn, LanguagePair, Position,
    StructuredContent, Vocabulary, VocabularyEntry,
};
pub use transcript::{
    is_devanagari, is_hindi, FileTranscriptSource, ProcessedTranscript, ProcessingStats,
    TranscriptProcessor, TranscriptSource, TranscriptStats,
};
