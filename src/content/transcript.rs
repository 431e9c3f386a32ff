//! Transcript loading and transcript → structured content extraction.
//!
//! [`TranscriptProcessor`] sends one prompt per content kind (phrase pairs,
//! dialogues, vocabulary) and runs each response through the
//! [`Extractor`].  A response that yields nothing simply contributes an
//! empty collection; only a missing transcript is reported as an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::content::model::{Dialogue, LanguagePair, StructuredContent, Vocabulary};
use crate::content::ContentError;
use crate::extract::{Extractor, Shape, POSITION_KEY};
use crate::llm::{PromptBuilder, ResponseGenerator};

/// Seconds allotted to each generated dialogue.
const DIALOGUE_SPAN: u64 = 60;
/// Seconds between generated dialogue turns.
const TURN_STEP: u64 = 10;

// ---------------------------------------------------------------------------
// Transcript source
// ---------------------------------------------------------------------------

/// Supplies raw transcript text for an identifier.
pub trait TranscriptSource: Send + Sync {
    fn load(&self, identifier: &str) -> Result<String, ContentError>;
}

/// Reads transcripts from disk.
///
/// An identifier is tried as a path first, then relative to `dir`.
#[derive(Debug, Clone)]
pub struct FileTranscriptSource {
    dir: PathBuf,
}

impl FileTranscriptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        let direct = Path::new(identifier);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        let joined = self.dir.join(identifier);
        joined.is_file().then_some(joined)
    }
}

impl TranscriptSource for FileTranscriptSource {
    fn load(&self, identifier: &str) -> Result<String, ContentError> {
        let path = self
            .resolve(identifier)
            .ok_or_else(|| ContentError::NotFound(identifier.to_string()))?;
        std::fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
    }
}

// ---------------------------------------------------------------------------
// Text statistics
// ---------------------------------------------------------------------------

/// `true` for code points in the Devanagari block (U+0900–U+097F).
pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// `true` when `text` contains at least one Devanagari character.
pub fn is_hindi(text: &str) -> bool {
    text.chars().any(is_devanagari)
}

/// Character and line counts for a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranscriptStats {
    pub total_chars: usize,
    pub hindi_chars: usize,
    pub lines: usize,
}

impl TranscriptStats {
    pub fn of(text: &str) -> Self {
        Self {
            total_chars: text.chars().count(),
            hindi_chars: text.chars().filter(|c| is_devanagari(*c)).count(),
            lines: text.lines().count(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptProcessor
// ---------------------------------------------------------------------------

/// Counts reported after processing a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub transcript_length: usize,
    pub language_pairs: usize,
    pub dialogues: usize,
    pub vocabulary_items: usize,
}

/// Structured content plus the counts describing it.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTranscript {
    #[serde(flatten)]
    pub content: StructuredContent,
    pub stats: ProcessingStats,
}

/// Turns transcript text into [`StructuredContent`].
pub struct TranscriptProcessor {
    generator: Arc<ResponseGenerator>,
    prompts: PromptBuilder,
    pairs: Extractor,
    dialogues: Extractor,
    vocabulary: Extractor,
}

impl TranscriptProcessor {
    pub fn new(generator: Arc<ResponseGenerator>) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(),
            pairs: Extractor::new(Shape::ObjectArray).lead_key("hindi"),
            dialogues: Extractor::new(Shape::ObjectArray).lead_key("dialogue"),
            vocabulary: Extractor::new(Shape::StringMap),
        }
    }

    /// Load `identifier` from `source` and extract all content kinds.
    pub async fn process(
        &self,
        source: &dyn TranscriptSource,
        identifier: &str,
    ) -> Result<ProcessedTranscript, ContentError> {
        let transcript = source.load(identifier)?;
        self.process_text(identifier, &transcript).await
    }

    /// Extract all content kinds from already-loaded `transcript` text.
    ///
    /// `identifier` names the transcript in logs and errors; blank text is
    /// reported as [`ContentError::NotFound`].
    pub async fn process_text(
        &self,
        identifier: &str,
        transcript: &str,
    ) -> Result<ProcessedTranscript, ContentError> {
        if transcript.trim().is_empty() {
            return Err(ContentError::NotFound(identifier.to_string()));
        }
        log::info!(
            "processing transcript {identifier} ({} chars)",
            transcript.chars().count()
        );

        let content = StructuredContent {
            language_pairs: self.generate_language_pairs(transcript).await,
            dialogues: self.generate_dialogues(transcript).await,
            vocabulary: self.generate_vocabulary(transcript).await,
        };
        let stats = ProcessingStats {
            transcript_length: transcript.chars().count(),
            language_pairs: content.language_pairs.len(),
            dialogues: content.dialogues.len(),
            vocabulary_items: content.vocabulary.len(),
        };
        log::info!("extracted {stats:?}");

        Ok(ProcessedTranscript { content, stats })
    }

    /// Phrase pairs; empty when the model output could not be used.
    pub async fn generate_language_pairs(&self, transcript: &str) -> Vec<LanguagePair> {
        let Some(items) = self
            .ask_for_array(&self.prompts.language_pairs(transcript), &self.pairs)
            .await
        else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| typed_element::<LanguagePair>(item, "language pair"))
            .filter(|p| !p.source_text.trim().is_empty() && !p.target_text.trim().is_empty())
            .collect()
    }

    /// Dialogues with start/end times and turn positions filled in.
    pub async fn generate_dialogues(&self, transcript: &str) -> Vec<Dialogue> {
        let Some(items) = self
            .ask_for_array(&self.prompts.dialogues(transcript), &self.dialogues)
            .await
        else {
            return Vec::new();
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, mut item)| {
                place_dialogue(&mut item, i as u64);
                typed_element::<Dialogue>(item, "dialogue")
            })
            .filter(|d| !d.turns.is_empty())
            .map(|mut d| {
                d.enforce_order();
                d
            })
            .collect()
    }

    /// Hindi word → meaning map; empty when nothing was recovered.
    pub async fn generate_vocabulary(&self, transcript: &str) -> Vocabulary {
        let Some(response) = self
            .generator
            .generate(&self.prompts.vocabulary(transcript), None)
            .await
        else {
            return Vocabulary::new();
        };

        let mut vocabulary: Vocabulary = self.vocabulary.extract_as(&response).unwrap_or_default();
        vocabulary.retain(|word, meaning| !word.trim().is_empty() && !meaning.trim().is_empty());
        vocabulary
    }

    async fn ask_for_array(&self, prompt: &str, extractor: &Extractor) -> Option<Vec<Value>> {
        let response = self.generator.generate(prompt, None).await?;
        match extractor.extract(&response).into_value()? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Fill dialogue `index`'s time window and any missing turn positions.
fn place_dialogue(item: &mut Value, index: u64) {
    let Value::Object(obj) = item else {
        return;
    };
    let base = index * DIALOGUE_SPAN;
    obj.entry("start_time").or_insert_with(|| Value::from(base));
    obj.entry("end_time")
        .or_insert_with(|| Value::from(base + DIALOGUE_SPAN));

    if let Some(Value::Array(turns)) = obj.get_mut("dialogue") {
        for (j, turn) in turns.iter_mut().enumerate() {
            if let Value::Object(turn) = turn {
                turn.entry(POSITION_KEY)
                    .or_insert_with(|| Value::from(base + j as u64 * TURN_STEP));
            }
        }
    }
}

fn typed_element<T: serde::de::DeserializeOwned>(item: Value, what: &str) -> Option<T> {
    match serde_json::from_value(item) {
        Ok(typed) => Some(typed),
        Err(e) => {
            log::warn!("dropping malformed {what}: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
