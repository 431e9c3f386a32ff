//! Response generator: wraps any [`CompletionBackend`] and degrades to
//! canned responses once the backend proves unreachable.
//!
//! The generator has exactly one state transition:
//!
//! ```text
//! Live ──connectivity / credential failure──▶ Mocked   (never reversed)
//! ```
//!
//! In `Live` mode a transient failure (timeout, bad payload, HTTP 5xx)
//! yields `None` and leaves the mode untouched; the caller's own fallback
//! chain absorbs it.  In `Mocked` mode the backend is never called again.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;

use crate::config::AppConfig;
use crate::llm::backend::{ApiBackend, CompletionBackend};
use crate::llm::params::GenerationParams;

/// Canned bilingual replies served in mock mode.
pub const MOCK_RESPONSES: &[&str] = &[
    "नमस्ते! मैं आपकी मदद कैसे कर सकता हूँ? (Hello! How can I help you?)",
    "हिंदी एक बहुत ही सुंदर भाषा है। (Hindi is a very beautiful language.)",
    "आपका दिन शुभ हो! (Have a good day!)",
    "हिंदी सीखना बहुत मज़ेदार है। (Learning Hindi is very fun.)",
    "मैं आपके साथ हिंदी अभ्यास कर सकता हूँ। (I can practice Hindi with you.)",
];

// ---------------------------------------------------------------------------
// GeneratorMode
// ---------------------------------------------------------------------------

/// Observable operating mode of a [`ResponseGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorMode {
    /// Completions are requested from the backend.
    Live,
    /// Canned responses only; the backend is no longer contacted.
    Mocked,
}

// ---------------------------------------------------------------------------
// ResponseGenerator
// ---------------------------------------------------------------------------

/// Text generation front-end used by every content generator.
///
/// # Example
/// ```rust
/// use hindi_learn::config::LlmConfig;
/// use hindi_learn::llm::{ApiBackend, GeneratorMode, ResponseGenerator};
///
/// let generator = ResponseGenerator::new(ApiBackend::from_config(&LlmConfig::default()));
/// assert_eq!(generator.mode(), GeneratorMode::Live);
/// ```
pub struct ResponseGenerator {
    backend: Box<dyn CompletionBackend>,
    defaults: GenerationParams,
    mocked: AtomicBool,
}

impl ResponseGenerator {
    /// Wrap `backend` in live mode with default generation parameters.
    pub fn new(backend: impl CompletionBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            defaults: GenerationParams::default(),
            mocked: AtomicBool::new(false),
        }
    }

    /// Wrap `backend` but start directly in mock mode.
    pub fn mocked(backend: impl CompletionBackend + 'static) -> Self {
        let generator = Self::new(backend);
        generator.mocked.store(true, Ordering::Release);
        generator
    }

    /// Build the HTTP-backed generator described by `config`.
    ///
    /// A disabled backend yields a generator that starts in mock mode.
    pub fn from_config(config: &AppConfig) -> Self {
        let backend = ApiBackend::from_config(&config.llm);
        let generator = if config.llm.is_live() {
            Self::new(backend)
        } else {
            log::info!("LLM backend disabled in config; starting in mock mode");
            Self::mocked(backend)
        };
        generator.with_defaults(config.generation.clone())
    }

    /// Replace the parameters used when `generate` is called with `None`.
    pub fn with_defaults(mut self, defaults: GenerationParams) -> Self {
        self.defaults = defaults;
        self
    }

    /// Parameters applied when the caller does not supply any.
    pub fn defaults(&self) -> &GenerationParams {
        &self.defaults
    }

    /// Current operating mode.
    pub fn mode(&self) -> GeneratorMode {
        if self.mocked.load(Ordering::Acquire) {
            GeneratorMode::Mocked
        } else {
            GeneratorMode::Live
        }
    }

    /// Generate a completion for `prompt`.
    ///
    /// Returns `None` only on a transient failure while live.  Connectivity
    /// failures switch the generator to mock mode and return a canned reply.
    pub async fn generate(&self, prompt: &str, params: Option<&GenerationParams>) -> Option<String> {
        if self.mode() == GeneratorMode::Mocked {
            log::debug!("mock mode: returning canned response");
            return Some(canned_response());
        }

        let params = params.unwrap_or(&self.defaults);
        match self.backend.complete(prompt, params).await {
            Ok(text) => Some(text),
            Err(err) if err.is_connectivity() => {
                if !self.mocked.swap(true, Ordering::AcqRel) {
                    log::warn!("LLM backend unavailable ({err}); switching to mock mode");
                }
                Some(canned_response())
            }
            Err(err) => {
                log::warn!("LLM generation failed: {err}");
                None
            }
        }
    }
}

fn canned_response() -> String {
    MOCK_RESPONSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOCK_RESPONSES[0])
        .to_string()
}

// ---------------------------------------------------------------------------
// ScriptedBackend  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays queued results and counts calls.
///
/// Once the queue is exhausted every call fails with `EmptyResponse`.
#[cfg(test)]
pub struct ScriptedBackend {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<String, crate::llm::LlmError>>>,
    calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl ScriptedBackend {
    pub fn new(replies: Vec<Result<String, crate::llm::LlmError>>) -> Self {
        Self {
            replies: std::sync::Mutex::new(replies.into()),
            calls: Default::default(),
        }
    }

    /// Backend that always answers with `text`.
    pub fn always(text: &str) -> Self {
        Self::new((0..64).map(|_| Ok(text.to_string())).collect())
    }

    /// Backend that is unreachable on every call.
    pub fn unreachable() -> Self {
        Self::new(
            (0..64)
                .map(|_| Err(crate::llm::LlmError::Unreachable("connection refused".into())))
                .collect(),
        )
    }

    /// Shared call counter, readable after the backend has been moved.
    pub fn call_counter(&self) -> std::sync::Arc<std::sync::atomic::AtomicUsize> {
        std::sync::Arc::clone(&self.calls)
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, crate::llm::LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(crate::llm::LlmError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[tokio::test]
    async fn passes_through_success() {
        let generator = ResponseGenerator::new(ScriptedBackend::always("ठीक है"));
        assert_eq!(generator.generate("x", None).await.as_deref(), Some("ठीक है"));
        assert_eq!(generator.mode(), GeneratorMode::Live);
    }

    #[tokio::test]
    async fn transient_failure_returns_none_and_stays_live() {
        let backend = ScriptedBackend::new(vec![
            Err(LlmError::Parse("bad json".into())),
            Err(LlmError::Timeout),
            Ok("later".into()),
        ]);
        let calls = backend.call_counter();
        let generator = ResponseGenerator::new(backend);

        assert!(generator.generate("x", None).await.is_none());
        assert!(generator.generate("x", None).await.is_none());
        assert_eq!(generator.mode(), GeneratorMode::Live);
        assert_eq!(generator.generate("x", None).await.as_deref(), Some("later"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn connectivity_failure_switches_to_mock_and_returns_canned() {
        let generator = ResponseGenerator::new(ScriptedBackend::unreachable());
        let reply = generator.generate("x", None).await.expect("canned reply");
        assert!(MOCK_RESPONSES.contains(&reply.as_str()));
        assert_eq!(generator.mode(), GeneratorMode::Mocked);
    }

    #[tokio::test]
    async fn unauthorized_also_switches_to_mock() {
        let backend = ScriptedBackend::new(vec![Err(LlmError::Unauthorized("401".into()))]);
        let generator = ResponseGenerator::new(backend);
        assert!(generator.generate("x", None).await.is_some());
        assert_eq!(generator.mode(), GeneratorMode::Mocked);
    }

    #[tokio::test]
    async fn mock_mode_is_monotonic_and_never_probes_again() {
        let backend = ScriptedBackend::new(vec![
            Err(LlmError::Unreachable("down".into())),
            Ok("recovered".into()),
            Ok("recovered".into()),
        ]);
        let calls = backend.call_counter();
        let generator = ResponseGenerator::new(backend);

        for _ in 0..10 {
            let reply = generator.generate("x", None).await.unwrap();
            assert!(MOCK_RESPONSES.contains(&reply.as_str()));
            assert_eq!(generator.mode(), GeneratorMode::Mocked);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn starting_mocked_never_calls_backend() {
        let backend = ScriptedBackend::always("live");
        let calls = backend.call_counter();
        let generator = ResponseGenerator::mocked(backend);

        let reply = generator.generate("x", None).await.unwrap();
        assert!(MOCK_RESPONSES.contains(&reply.as_str()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disabled_config_starts_mocked() {
        let mut config = AppConfig::default();
        config.llm.enabled = false;
        config.generation.temperature = 0.1;
        let generator = ResponseGenerator::from_config(&config);
        assert_eq!(generator.mode(), GeneratorMode::Mocked);
        assert_eq!(generator.defaults().temperature, 0.1);
    }
}
