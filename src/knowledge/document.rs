//! How each content record type is rendered into an indexed document.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::content::{Dialogue, LanguagePair, VocabularyEntry};
use crate::knowledge::index::Metadata;

/// Metadata key holding the [`RecordType`] name.
pub const TYPE_KEY: &str = "type";

/// Kind of record stored in the knowledge store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    LanguagePair,
    Dialogue,
    Vocabulary,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [
        RecordType::LanguagePair,
        RecordType::Dialogue,
        RecordType::Vocabulary,
    ];

    /// Value of the `type` metadata key.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::LanguagePair => "language_pair",
            RecordType::Dialogue => "dialogue",
            RecordType::Vocabulary => "vocabulary",
        }
    }

    /// Prefix of generated document ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            RecordType::LanguagePair => "pair",
            RecordType::Dialogue => "dialogue",
            RecordType::Vocabulary => "vocab",
        }
    }

    /// Records sent to the index per upsert call.
    pub fn batch_size(self) -> usize {
        match self {
            RecordType::LanguagePair => 100,
            RecordType::Dialogue => 50,
            RecordType::Vocabulary => 200,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown record type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown record type '{0}' (expected language_pair, dialogue or vocabulary)")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownRecordType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Indexable
// ---------------------------------------------------------------------------

/// A record that can be stored in the knowledge store.
pub trait Indexable {
    const RECORD_TYPE: RecordType;

    /// Text that is embedded and returned on retrieval.
    fn document(&self) -> String;

    /// Record-specific metadata; the `type` key is added by the store.
    fn metadata(&self) -> Metadata;
}

impl Indexable for LanguagePair {
    const RECORD_TYPE: RecordType = RecordType::LanguagePair;

    fn document(&self) -> String {
        format!("Hindi: {}\nEnglish: {}", self.source_text, self.target_text)
    }

    fn metadata(&self) -> Metadata {
        Metadata::from([
            ("hindi".to_string(), Value::from(self.source_text.as_str())),
            ("english".to_string(), Value::from(self.target_text.as_str())),
            ("timestamp".to_string(), Value::from(self.position)),
        ])
    }
}

impl Indexable for Dialogue {
    const RECORD_TYPE: RecordType = RecordType::Dialogue;

    fn document(&self) -> String {
        self.text()
    }

    fn metadata(&self) -> Metadata {
        Metadata::from([
            ("start_time".to_string(), Value::from(self.start)),
            ("end_time".to_string(), Value::from(self.end)),
        ])
    }
}

impl Indexable for VocabularyEntry {
    const RECORD_TYPE: RecordType = RecordType::Vocabulary;

    fn document(&self) -> String {
        format!("Hindi word: {}\nEnglish meaning: {}", self.word, self.meaning)
    }

    fn metadata(&self) -> Metadata {
        Metadata::from([
            ("hindi".to_string(), Value::from(self.word.as_str())),
            ("english".to_string(), Value::from(self.meaning.as_str())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DialogueTurn;

    #[test]
    fn record_type_names_round_trip() {
        for t in RecordType::ALL {
            assert_eq!(t.as_str().parse::<RecordType>(), Ok(t));
        }
        let err = "phrase".parse::<RecordType>().unwrap_err();
        assert_eq!(err, UnknownRecordType("phrase".into()));
        assert!(err.to_string().contains("language_pair, dialogue or vocabulary"));
    }

    #[test]
    fn documents_render_both_languages() {
        let pair = LanguagePair::new("पानी", "Water", 20.0);
        assert_eq!(pair.document(), "Hindi: पानी\nEnglish: Water");
        assert_eq!(pair.metadata()["timestamp"], 20.0);

        let entry = VocabularyEntry {
            word: "घर".into(),
            meaning: "House".into(),
        };
        assert_eq!(entry.document(), "Hindi word: घर\nEnglish meaning: House");

        let dialogue = Dialogue {
            turns: vec![
                DialogueTurn::new("नमस्ते", true, 0.0),
                DialogueTurn::new("Hello", false, 10.0),
            ],
            start: 0.0,
            end: 60.0,
            generated: true,
        };
        assert_eq!(dialogue.document(), "नमस्ते\nHello");
        assert_eq!(dialogue.metadata()["end_time"], 60.0);
    }
}
