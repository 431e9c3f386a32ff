//! Sampling parameters sent with every completion request.

use serde::{Deserialize, Serialize};

/// Generation parameters understood by every [`CompletionBackend`].
///
/// [`CompletionBackend`]: crate::llm::CompletionBackend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Sampling temperature; higher values give more diverse output.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Upper bound on response length in tokens.
    pub max_tokens: u32,
    /// Generation stops at the first occurrence of any of these strings.
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1024,
            stop_sequences: Vec::new(),
        }
    }
}

impl GenerationParams {
    /// Copy of `self` with a different temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Copy of `self` with a different token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
