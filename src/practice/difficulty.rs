//! Learner difficulty levels and their theme keywords.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Learner level an exercise targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Greetings and introductions.
const BEGINNER_KEYWORDS: &[&str] = &[
    "basic",
    "simple",
    "greeting",
    "introduction",
    "नमस्ते",
    "धन्यवाद",
    "hello",
    "thank you",
];

/// Everyday situations.
const INTERMEDIATE_KEYWORDS: &[&str] = &[
    "restaurant",
    "shopping",
    "directions",
    "travel",
    "खाना",
    "यात्रा",
    "food",
    "journey",
];

/// Abstract and cultural topics.
const ADVANCED_KEYWORDS: &[&str] = &[
    "business",
    "politics",
    "philosophy",
    "culture",
    "व्यापार",
    "संस्कृति",
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Lower-case identifier, as persisted and as used in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Capitalised label for exercise titles.
    pub fn title(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Theme keywords used to filter local content and seed prompts.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Difficulty::Beginner => BEGINNER_KEYWORDS,
            Difficulty::Intermediate => INTERMEDIATE_KEYWORDS,
            Difficulty::Advanced => ADVANCED_KEYWORDS,
        }
    }

    /// One-line instruction appended to generation prompts.
    pub fn guidance(self) -> &'static str {
        match self {
            Difficulty::Beginner => {
                "Keep it at beginner level: simple greetings, basic phrases and short sentences."
            }
            Difficulty::Intermediate => {
                "Keep it at intermediate level: everyday situations such as shopping or dining, \
                 with some more complex grammar."
            }
            Difficulty::Advanced => {
                "Keep it at advanced level: business or cultural topics, nuanced vocabulary \
                 and cultural references."
            }
        }
    }

    /// `true` when the lower-cased `text` contains any of this level's keywords.
    pub fn matches(self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords().iter().any(|k| lowered.contains(k))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown difficulty '{0}' (expected beginner, intermediate or advanced)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Beginner".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert_eq!(" advanced ".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn matches_keywords_in_either_script() {
        assert!(Difficulty::Beginner.matches("Hello there"));
        assert!(Difficulty::Beginner.matches("नमस्ते, आप कैसे हैं?"));
        assert!(Difficulty::Intermediate.matches("Let's go to the RESTAURANT"));
        assert!(Difficulty::Advanced.matches("भारतीय संस्कृति"));
        assert!(!Difficulty::Advanced.matches("hello"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
        let back: Difficulty = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(back, Difficulty::Advanced);
    }
}
