//! Core `CompletionBackend` trait and `ApiBackend` implementation.
//!
//! `ApiBackend` calls any OpenAI-compatible `/v1/chat/completions` endpoint:
//! Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::llm::params::GenerationParams;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a completion call.
///
/// [`LlmError::is_connectivity`] separates failures that mean "the backend
/// cannot be used at all" from per-call failures.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The endpoint could not be reached (DNS, refused connection, TLS).
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The endpoint rejected our credentials (HTTP 401 / 403).
    #[error("backend rejected credentials: {0}")]
    Unauthorized(String),

    /// The request did not complete within the configured timeout.
    #[error("completion request timed out")]
    Timeout,

    /// Any other transport failure while the backend was reachable.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// Non-success HTTP status other than an auth failure.
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse completion response: {0}")]
    Parse(String),

    /// The backend returned a response with no usable text content.
    #[error("backend returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// `true` for credential and connectivity failures.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, LlmError::Unreachable(_) | LlmError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_connect() {
            LlmError::Unreachable(e.to_string())
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionBackend trait
// ---------------------------------------------------------------------------

/// Async trait for raw text completion.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn CompletionBackend>`).
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiBackend
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiBackend {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiBackend {
    /// Build an `ApiBackend` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body(&self, prompt: &str, params: &GenerationParams) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":      false,
            "temperature": params.temperature,
            "top_p":       params.top_p,
            "max_tokens":  params.max_tokens
        });
        if !params.stop_sequences.is_empty() {
            body["stop"] = serde_json::json!(params.stop_sequences);
        }
        body
    }
}

#[async_trait]
impl CompletionBackend for ApiBackend {
    /// Send `prompt` as a single user message.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!(
            "completion request: model={} prompt_len={} params={:?}",
            self.config.model,
            prompt.len(),
            params
        );

        let mut req = self.client.post(&url).json(&self.request_body(prompt, params));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LlmError::Unauthorized(format!(
                    "HTTP {} from {url}",
                    response.status().as_u16()
                )));
            }
            status if !status.is_success() => return Err(LlmError::Status(status.as_u16())),
            _ => {}
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".into()))?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            enabled: true,
            provider: LlmProvider::OpenAiCompatible,
            base_url: "http://localhost:11434/".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "qwen2.5:7b".into(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_accepts_missing_and_empty_keys() {
        let _ = ApiBackend::from_config(&make_config(None));
        let _ = ApiBackend::from_config(&make_config(Some("")));
        let backend = ApiBackend::from_config(&make_config(Some("sk-test-1234")));
        assert_eq!(backend.model(), "qwen2.5:7b");
    }

    #[test]
    fn body_carries_all_generation_params() {
        let backend = ApiBackend::from_config(&make_config(None));
        let params = GenerationParams {
            temperature: 0.2,
            top_p: 0.5,
            max_tokens: 64,
            stop_sequences: vec!["END".into()],
        };
        let body = backend.request_body("नमस्ते", &params);

        assert_eq!(body["model"], "qwen2.5:7b");
        assert_eq!(body["messages"][0]["content"], "नमस्ते");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["stop"][0], "END");
        assert!((body["top_p"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_stop_sequences_are_omitted() {
        let backend = ApiBackend::from_config(&make_config(None));
        let body = backend.request_body("x", &GenerationParams::default());
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn connectivity_classification() {
        assert!(LlmError::Unreachable("refused".into()).is_connectivity());
        assert!(LlmError::Unauthorized("401".into()).is_connectivity());
        assert!(!LlmError::Timeout.is_connectivity());
        assert!(!LlmError::Status(500).is_connectivity());
        assert!(!LlmError::Parse("bad json".into()).is_connectivity());
        assert!(!LlmError::EmptyResponse.is_connectivity());
    }

    /// Unroutable port on localhost: the connect error must classify as
    /// a connectivity failure.
    #[tokio::test]
    async fn refused_connection_is_connectivity_failure() {
        let mut config = make_config(None);
        config.base_url = "http://127.0.0.1:9".into();
        config.timeout_secs = 2;
        let backend = ApiBackend::from_config(&config);

        let err = backend
            .complete("hello", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(err.is_connectivity() || matches!(err, LlmError::Timeout), "{err:?}");
    }

    #[test]
    fn backend_is_object_safe() {
        let backend: Box<dyn CompletionBackend> =
            Box::new(ApiBackend::from_config(&make_config(None)));
        drop(backend);
    }
}
