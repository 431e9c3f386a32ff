//! Structured learning content extracted from transcripts.
//!
//! Field names follow the persisted `structured_data.json` layout
//! (`hindi` / `english` / `timestamp` / `is_generated` …) so documents
//! written by earlier tooling load unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::ContentError;

/// Monotonic index or timestamp (seconds) within a transcript.
pub type Position = f64;

// ---------------------------------------------------------------------------
// LanguagePair
// ---------------------------------------------------------------------------

/// A Hindi phrase and its English translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePair {
    #[serde(rename = "hindi")]
    pub source_text: String,
    #[serde(rename = "english")]
    pub target_text: String,
    #[serde(rename = "timestamp", default)]
    pub position: Position,
    #[serde(rename = "is_generated", default)]
    pub generated: bool,
}

impl LanguagePair {
    /// A hand-entered (non-generated) pair.
    pub fn new(source: impl Into<String>, target: impl Into<String>, position: Position) -> Self {
        Self {
            source_text: source.into(),
            target_text: target.into(),
            position,
            generated: false,
        }
    }

    /// Number of whitespace-separated words in the Hindi side.
    pub fn source_word_count(&self) -> usize {
        self.source_text.split_whitespace().count()
    }
}

// ---------------------------------------------------------------------------
// Dialogue
// ---------------------------------------------------------------------------

/// One line of a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub text: String,
    #[serde(rename = "is_hindi")]
    pub is_source_language: bool,
    #[serde(rename = "timestamp", default)]
    pub position: Position,
}

impl DialogueTurn {
    pub fn new(text: impl Into<String>, is_source_language: bool, position: Position) -> Self {
        Self {
            text: text.into(),
            is_source_language,
            position,
        }
    }
}

/// An ordered bilingual conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    #[serde(rename = "dialogue")]
    pub turns: Vec<DialogueTurn>,
    #[serde(rename = "start_time", default)]
    pub start: Position,
    #[serde(rename = "end_time", default)]
    pub end: Position,
    #[serde(rename = "is_generated", default)]
    pub generated: bool,
}

impl Dialogue {
    /// All turn texts joined by newlines.
    pub fn text(&self) -> String {
        self.turns
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `true` when turn positions never decrease.
    pub fn is_ordered(&self) -> bool {
        self.turns.windows(2).all(|w| w[0].position <= w[1].position)
    }

    /// Raise any position lower than its predecessor to the predecessor's.
    pub fn enforce_order(&mut self) {
        enforce_turn_order(&mut self.turns);
    }
}

/// [`Dialogue::enforce_order`] for a bare list of turns.
pub fn enforce_turn_order(turns: &mut [DialogueTurn]) {
    let mut floor = Position::MIN;
    for turn in turns {
        if turn.position < floor {
            turn.position = floor;
        }
        floor = turn.position;
    }
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Hindi word → English meaning.  Keys are unique; inserting an existing
/// key replaces its meaning.
pub type Vocabulary = BTreeMap<String, String>;

/// One vocabulary item, flattened for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub word: String,
    pub meaning: String,
}

/// Flatten `vocabulary` into entries, in key order.
pub fn vocabulary_entries(vocabulary: &Vocabulary) -> Vec<VocabularyEntry> {
    vocabulary
        .iter()
        .map(|(word, meaning)| VocabularyEntry {
            word: word.clone(),
            meaning: meaning.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// StructuredContent
// ---------------------------------------------------------------------------

/// The persisted learning-content document.
///
/// ```rust
/// use hindi_learn::content::{LanguagePair, StructuredContent};
///
/// let mut content = StructuredContent::default();
/// content.language_pairs.push(LanguagePair::new("नमस्ते", "Hello", 0.0));
/// content.vocabulary.insert("पानी".into(), "Water".into());
///
/// let json = content.to_json().unwrap();
/// assert!(json.contains("\"hindi\": \"नमस्ते\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    #[serde(default)]
    pub language_pairs: Vec<LanguagePair>,
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

impl StructuredContent {
    pub fn is_empty(&self) -> bool {
        self.language_pairs.is_empty() && self.dialogues.is_empty() && self.vocabulary.is_empty()
    }

    /// Pretty JSON with non-ASCII text left unescaped.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a document from `path`, enforcing turn order on every dialogue.
    pub fn load_from(path: &Path) -> Result<Self, ContentError> {
        let data = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut content: Self =
            serde_json::from_str(&data).map_err(|source| ContentError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        for dialogue in &mut content.dialogues {
            dialogue.enforce_order();
        }
        Ok(content)
    }

    /// Load from `path`, or return an empty document when it is missing or
    /// unreadable.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("could not load structured content ({e}); starting empty");
                Self::default()
            }
        }
    }

    /// Write the document to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ContentError> {
        let io_err = |source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = self.to_json().map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, data).map_err(io_err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
