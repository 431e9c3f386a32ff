//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::llm::GenerationParams;
use crate::practice::{Difficulty, DistractorPolicy};

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Selects which text-completion backend generates content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Ollama running locally; no authentication required.
    Ollama,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, Together.ai, LM Studio …).
    OpenAiCompatible,
    /// No backend: every generator starts in mock mode.
    Disabled,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Ollama
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection settings for the text-completion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// When `false` the response generator starts in mock mode.
    pub enabled: bool,
    /// Which backend to use.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key; `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"qwen2.5:7b"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Socket-level timeout for a single completion request.
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// `true` when a live backend should be constructed at all.
    pub fn is_live(&self) -> bool {
        self.enabled && self.provider != LlmProvider::Disabled
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: LlmProvider::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:7b".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// PracticeConfig
// ---------------------------------------------------------------------------

/// Defaults for the interactive exercise generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Difficulty used when the caller does not pick one.
    pub default_difficulty: Difficulty,
    /// Number of questions in a vocabulary quiz.
    pub quiz_questions: usize,
    /// How quiz distractors are drawn from local vocabulary.
    pub distractor_policy: DistractorPolicy,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Beginner,
            quiz_questions: 5,
            distractor_policy: DistractorPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Knowledge store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name of the document collection.
    pub collection: String,
    /// Number of documents retrieved for a query when not specified.
    pub n_results: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "hindi-learning-content".into(),
            n_results: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use hindi_learn::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    pub llm: LlmConfig,
    /// Default sampling parameters for every completion.
    pub generation: GenerationParams,
    /// Exercise generator defaults.
    pub practice: PracticeConfig,
    /// Knowledge store settings.
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.provider, loaded.llm.provider);
        assert_eq!(original.generation, loaded.generation);
        assert_eq!(
            original.practice.default_difficulty,
            loaded.practice.default_difficulty
        );
        assert_eq!(original.practice.quiz_questions, loaded.practice.quiz_questions);
        assert_eq!(original.store.collection, loaded.store.collection);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.llm.model, LlmConfig::default().model);
        assert_eq!(config.store.n_results, 3);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.llm.enabled);
        assert!(cfg.llm.is_live());
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.generation.temperature, 0.7);
        assert_eq!(cfg.generation.top_p, 0.9);
        assert_eq!(cfg.generation.max_tokens, 1024);
        assert!(cfg.generation.stop_sequences.is_empty());
        assert_eq!(cfg.practice.default_difficulty, Difficulty::Beginner);
        assert_eq!(cfg.practice.quiz_questions, 5);
        assert_eq!(cfg.practice.distractor_policy, DistractorPolicy::SkipQuestionWords);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.provider = LlmProvider::OpenAiCompatible;
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.generation.temperature = 0.2;
        cfg.generation.stop_sequences = vec!["```".into()];
        cfg.practice.default_difficulty = Difficulty::Advanced;
        cfg.practice.distractor_policy = DistractorPolicy::ExcludeAnswerOnly;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.provider, LlmProvider::OpenAiCompatible);
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.generation.temperature, 0.2);
        assert_eq!(loaded.generation.stop_sequences, vec!["```".to_string()]);
        assert_eq!(loaded.practice.default_difficulty, Difficulty::Advanced);
        assert_eq!(
            loaded.practice.distractor_policy,
            DistractorPolicy::ExcludeAnswerOnly
        );
    }

    #[test]
    fn disabled_provider_is_not_live() {
        let cfg = LlmConfig {
            provider: LlmProvider::Disabled,
            ..LlmConfig::default()
        };
        assert!(!cfg.is_live());
    }
}
